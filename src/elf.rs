//! ELF image parsing.
//!
//! Both classes (32/64-bit) and both byte orders are read into one set of
//! 64-bit wide structures. Every table is bounds-checked against the file
//! before any entry is decoded.

use std::fs;
use std::path::Path;

use crate::logging::Logger;
use crate::names::*;
use crate::types::{Error, Result};
use crate::vemit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

impl Class {
    pub fn header_size(self) -> u64 {
        match self {
            Class::Elf32 => 52,
            Class::Elf64 => 64,
        }
    }

    pub fn program_header_size(self) -> u64 {
        match self {
            Class::Elf32 => 32,
            Class::Elf64 => 56,
        }
    }

    pub fn section_header_size(self) -> u64 {
        match self {
            Class::Elf32 => 40,
            Class::Elf64 => 64,
        }
    }

    pub fn symbol_size(self) -> u64 {
        match self {
            Class::Elf32 => 16,
            Class::Elf64 => 24,
        }
    }

    pub fn rel_size(self) -> u64 {
        match self {
            Class::Elf32 => 8,
            Class::Elf64 => 16,
        }
    }

    pub fn rela_size(self) -> u64 {
        match self {
            Class::Elf32 => 12,
            Class::Elf64 => 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Little,
    Big,
}

/// Sequential reader over one record of the file.
struct Fields<'a> {
    data: &'a [u8],
    pos: usize,
    class: Class,
    encoding: Encoding,
    what: &'static str,
}

impl<'a> Fields<'a> {
    fn at(data: &'a [u8], offset: u64, class: Class, encoding: Encoding, what: &'static str) -> Self {
        Self {
            data,
            pos: usize::try_from(offset).unwrap_or(usize::MAX),
            class,
            encoding,
            what,
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self
            .pos
            .checked_add(N)
            .and_then(|end| self.data.get(self.pos..end))
            .ok_or(Error::Truncated {
                what: self.what,
                offset: self.pos as u64,
                len: N as u64,
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos += N;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let buf = self.take()?;
        Ok(match self.encoding {
            Encoding::Little => u16::from_le_bytes(buf),
            Encoding::Big => u16::from_be_bytes(buf),
        })
    }

    fn u32(&mut self) -> Result<u32> {
        let buf = self.take()?;
        Ok(match self.encoding {
            Encoding::Little => u32::from_le_bytes(buf),
            Encoding::Big => u32::from_be_bytes(buf),
        })
    }

    fn u64(&mut self) -> Result<u64> {
        let buf = self.take()?;
        Ok(match self.encoding {
            Encoding::Little => u64::from_le_bytes(buf),
            Encoding::Big => u64::from_be_bytes(buf),
        })
    }

    /// Address-sized field: 4 bytes in ELF32, 8 in ELF64.
    fn addr(&mut self) -> Result<u64> {
        match self.class {
            Class::Elf32 => self.u32().map(u64::from),
            Class::Elf64 => self.u64(),
        }
    }

    fn signed_addr(&mut self) -> Result<i64> {
        match self.class {
            Class::Elf32 => self.u32().map(|v| i64::from(v as i32)),
            Class::Elf64 => self.u64().map(|v| v as i64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub ident: [u8; EI_NIDENT],
    pub class: Class,
    pub encoding: Encoding,
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u64,
    pub e_phoff: u64,
    pub e_shoff: u64,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

impl Header {
    pub fn osabi(&self) -> u8 {
        self.ident[EI_OSABI]
    }

    pub fn abi_version(&self) -> u8 {
        self.ident[EI_ABIVERSION]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramHeader {
    pub p_type: u32,
    pub p_flags: u32,
    pub p_offset: u64,
    pub p_vaddr: u64,
    pub p_paddr: u64,
    pub p_filesz: u64,
    pub p_memsz: u64,
    pub p_align: u64,
}

impl ProgramHeader {
    /// Whether `offset` lies within the bytes this segment maps from the file.
    pub fn contains_offset(&self, offset: u64) -> bool {
        offset >= self.p_offset && offset < self.p_offset.saturating_add(self.p_filesz)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u64,
    pub sh_addr: u64,
    pub sh_offset: u64,
    pub sh_size: u64,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u64,
    pub sh_entsize: u64,
}

impl Section {
    /// File contents of the section; `None` for `NOBITS`.
    pub fn data<'a>(&self, file: &'a [u8]) -> Option<&'a [u8]> {
        if self.sh_type == SHT_NOBITS {
            return None;
        }
        let start = usize::try_from(self.sh_offset).ok()?;
        let end = start.checked_add(usize::try_from(self.sh_size).ok()?)?;
        file.get(start..end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub st_name: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
    pub st_value: u64,
    pub st_size: u64,
}

impl Symbol {
    pub fn sym_type(&self) -> u8 {
        self.st_info & 0xf
    }

    pub fn bind(&self) -> u8 {
        self.st_info >> 4
    }

    pub fn visibility(&self) -> u8 {
        self.st_other & 0x3
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    /// Index of the section holding the table.
    pub section: usize,
    pub name: String,
    pub symbols: Vec<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub r_offset: u64,
    pub r_info: u64,
    pub r_addend: Option<i64>,
    pub r_sym: u32,
    pub r_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationSection {
    pub section: usize,
    pub name: String,
    /// `RELA` sections carry an explicit addend per entry.
    pub explicit_addend: bool,
    pub entries: Vec<Relocation>,
}

#[derive(Debug, Clone)]
pub struct ElfFile {
    pub header: Header,
    pub segments: Vec<ProgramHeader>,
    pub sections: Vec<Section>,
    pub dynsym: Option<SymbolTable>,
    pub symtab: Option<SymbolTable>,
    pub relocations: Vec<RelocationSection>,
    interpreter: Option<String>,
}

impl ElfFile {
    pub fn open<P: AsRef<Path>>(path: P, logger: &Logger) -> Result<Self> {
        let path = path.as_ref();
        vemit!(logger, 1, "Reading ELF file {}", path.display());
        let data = fs::read(path)?;
        vemit!(logger, 2, "Read {} bytes from {}", data.len(), path.display());
        Self::parse(&data, logger)
    }

    pub fn parse(data: &[u8], logger: &Logger) -> Result<Self> {
        let header = parse_header(data)?;
        vemit!(
            logger,
            1,
            "ELF header: {:?} {:?}, {} program headers, {} sections",
            header.class,
            header.encoding,
            header.e_phnum,
            header.e_shnum
        );

        let segments = parse_segments(data, &header, logger)?;
        let sections = parse_sections(data, &header, logger)?;

        let dynsym = parse_symbol_table(data, &header, &sections, SHT_DYNSYM, ".dynstr", logger)?;
        let symtab = parse_symbol_table(data, &header, &sections, SHT_SYMTAB, ".strtab", logger)?;
        let relocations = parse_relocations(data, &header, &sections, logger)?;

        let interpreter = segments
            .iter()
            .find(|segment| segment.p_type == PT_INTERP)
            .and_then(|segment| {
                let start = usize::try_from(segment.p_offset).ok()?;
                let end = start.checked_add(usize::try_from(segment.p_filesz).ok()?)?;
                data.get(start..end).map(|bytes| c_string(bytes, 0))
            });
        if let Some(interp) = &interpreter {
            vemit!(logger, 2, "Program interpreter: {}", interp);
        }

        Ok(Self {
            header,
            segments,
            sections,
            dynsym,
            symtab,
            relocations,
            interpreter,
        })
    }

    pub fn is_32_bit(&self) -> bool {
        self.header.class == Class::Elf32
    }

    pub fn is_64_bit(&self) -> bool {
        self.header.class == Class::Elf64
    }

    pub fn section_name(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|section| section.name.as_str())
    }

    /// Path of the program interpreter named by `PT_INTERP`, if any.
    pub fn interpreter(&self) -> Option<&str> {
        self.interpreter.as_deref()
    }

    /// Names of the sections whose file offset falls inside segment `index`.
    pub fn sections_in_segment(&self, index: usize) -> Vec<&str> {
        let Some(segment) = self.segments.get(index) else {
            return Vec::new();
        };
        self.sections
            .iter()
            .filter(|section| !section.name.is_empty() && segment.contains_offset(section.sh_offset))
            .map(|section| section.name.as_str())
            .collect()
    }
}

/// NUL-terminated string starting at `offset` of `table`; empty when out of range.
fn c_string(table: &[u8], offset: usize) -> String {
    let Some(tail) = table.get(offset..) else {
        return String::new();
    };
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end]).into_owned()
}

fn table_in_bounds(offset: u64, entsize: u64, count: u64, file_size: u64) -> bool {
    entsize
        .checked_mul(count)
        .and_then(|len| len.checked_add(offset))
        .is_some_and(|end| offset <= file_size && end <= file_size)
}

fn parse_header(data: &[u8]) -> Result<Header> {
    if !data.starts_with(&ELFMAG) {
        return Err(Error::BadMagic);
    }

    let mut ident = [0u8; EI_NIDENT];
    let prefix = data.get(..EI_NIDENT).ok_or(Error::Truncated {
        what: "elf identification",
        offset: 0,
        len: EI_NIDENT as u64,
    })?;
    ident.copy_from_slice(prefix);

    let class = match ident[EI_CLASS] {
        ELFCLASS32 => Class::Elf32,
        ELFCLASS64 => Class::Elf64,
        other => return Err(Error::UnsupportedClass(other)),
    };
    let encoding = match ident[EI_DATA] {
        ELFDATA2LSB => Encoding::Little,
        ELFDATA2MSB => Encoding::Big,
        other => return Err(Error::UnsupportedEncoding(other)),
    };

    let file_size = data.len() as u64;
    if file_size < class.header_size() {
        return Err(Error::Truncated {
            what: "elf header",
            offset: 0,
            len: class.header_size(),
        });
    }

    let mut f = Fields::at(data, EI_NIDENT as u64, class, encoding, "elf header");
    let header = Header {
        ident,
        class,
        encoding,
        e_type: f.u16()?,
        e_machine: f.u16()?,
        e_version: f.u32()?,
        e_entry: f.addr()?,
        e_phoff: f.addr()?,
        e_shoff: f.addr()?,
        e_flags: f.u32()?,
        e_ehsize: f.u16()?,
        e_phentsize: f.u16()?,
        e_phnum: f.u16()?,
        e_shentsize: f.u16()?,
        e_shnum: f.u16()?,
        e_shstrndx: f.u16()?,
    };

    if u64::from(header.e_ehsize) > file_size {
        return Err(Error::HeaderOutOfBounds);
    }

    if header.e_phnum > 0 {
        if u64::from(header.e_phentsize) < class.program_header_size() {
            return Err(Error::Truncated {
                what: "program header entry",
                offset: header.e_phoff,
                len: class.program_header_size(),
            });
        }
        let in_bounds = table_in_bounds(
            header.e_phoff,
            u64::from(header.e_phentsize),
            u64::from(header.e_phnum),
            file_size,
        );
        if !in_bounds {
            return Err(Error::ProgramHeaderTableOutOfBounds);
        }
    }

    if header.e_shnum > 0 {
        if u64::from(header.e_shentsize) < class.section_header_size() {
            return Err(Error::Truncated {
                what: "section header entry",
                offset: header.e_shoff,
                len: class.section_header_size(),
            });
        }
        let in_bounds = table_in_bounds(
            header.e_shoff,
            u64::from(header.e_shentsize),
            u64::from(header.e_shnum),
            file_size,
        );
        if !in_bounds {
            return Err(Error::SectionHeaderTableOutOfBounds);
        }
    }

    Ok(header)
}

fn parse_segments(data: &[u8], header: &Header, logger: &Logger) -> Result<Vec<ProgramHeader>> {
    let file_size = data.len() as u64;
    let mut segments = Vec::with_capacity(usize::from(header.e_phnum));
    vemit!(logger, 2, "Program header table at offset {:#x}", header.e_phoff);

    for i in 0..u64::from(header.e_phnum) {
        let offset = header.e_phoff + i * u64::from(header.e_phentsize);
        let mut f = Fields::at(data, offset, header.class, header.encoding, "program header");

        let segment = match header.class {
            Class::Elf32 => {
                let p_type = f.u32()?;
                let p_offset = f.addr()?;
                let p_vaddr = f.addr()?;
                let p_paddr = f.addr()?;
                let p_filesz = f.addr()?;
                let p_memsz = f.addr()?;
                let p_flags = f.u32()?;
                let p_align = f.addr()?;
                ProgramHeader { p_type, p_flags, p_offset, p_vaddr, p_paddr, p_filesz, p_memsz, p_align }
            }
            Class::Elf64 => ProgramHeader {
                p_type: f.u32()?,
                p_flags: f.u32()?,
                p_offset: f.addr()?,
                p_vaddr: f.addr()?,
                p_paddr: f.addr()?,
                p_filesz: f.addr()?,
                p_memsz: f.addr()?,
                p_align: f.addr()?,
            },
        };

        if !table_in_bounds(segment.p_offset, segment.p_filesz, 1, file_size) {
            return Err(Error::SegmentOutOfBounds(segments.len()));
        }
        vemit!(
            logger,
            3,
            "Segment {}: type {:#x} offset {:#x} filesz {:#x}",
            segments.len(),
            segment.p_type,
            segment.p_offset,
            segment.p_filesz
        );
        segments.push(segment);
    }

    Ok(segments)
}

fn parse_sections(data: &[u8], header: &Header, logger: &Logger) -> Result<Vec<Section>> {
    let file_size = data.len() as u64;
    let mut sections = Vec::with_capacity(usize::from(header.e_shnum));
    vemit!(logger, 2, "Section header table at offset {:#x}", header.e_shoff);

    for i in 0..u64::from(header.e_shnum) {
        let offset = header.e_shoff + i * u64::from(header.e_shentsize);
        let mut f = Fields::at(data, offset, header.class, header.encoding, "section header");

        let section = Section {
            name: String::new(),
            sh_name: f.u32()?,
            sh_type: f.u32()?,
            sh_flags: f.addr()?,
            sh_addr: f.addr()?,
            sh_offset: f.addr()?,
            sh_size: f.addr()?,
            sh_link: f.u32()?,
            sh_info: f.u32()?,
            sh_addralign: f.addr()?,
            sh_entsize: f.addr()?,
        };

        if section.sh_type != SHT_NOBITS && !table_in_bounds(section.sh_offset, section.sh_size, 1, file_size) {
            return Err(Error::SectionOutOfBounds(sections.len()));
        }
        sections.push(section);
    }

    let names = sections
        .get(usize::from(header.e_shstrndx))
        .and_then(|strtab| strtab.data(data));
    if let Some(names) = names {
        for section in &mut sections {
            section.name = c_string(names, section.sh_name as usize);
        }
    } else if header.e_shnum > 0 {
        vemit!(logger, 1, "No section name string table (index {})", header.e_shstrndx);
    }

    for (i, section) in sections.iter().enumerate() {
        vemit!(
            logger,
            3,
            "Section {} '{}': type {:#x} offset {:#x} size {:#x}",
            i,
            section.name,
            section.sh_type,
            section.sh_offset,
            section.sh_size
        );
    }

    Ok(sections)
}

/// Number of entries of `min_size` bytes (or `sh_entsize`, if larger) in `section`.
fn entry_layout(section: &Section, min_size: u64) -> (u64, u64) {
    let stride = section.sh_entsize.max(min_size);
    (stride, section.sh_size / stride)
}

/// String table linked from `section`, falling back to the section named `fallback`.
fn linked_strings<'a>(data: &'a [u8], sections: &[Section], section: &Section, fallback: &str) -> Option<&'a [u8]> {
    sections
        .get(section.sh_link as usize)
        .filter(|linked| linked.sh_type == SHT_STRTAB)
        .or_else(|| sections.iter().find(|s| s.name == fallback))
        .and_then(|strtab| strtab.data(data))
}

fn parse_symbol_table(
    data: &[u8],
    header: &Header,
    sections: &[Section],
    sh_type: u32,
    fallback_strtab: &str,
    logger: &Logger,
) -> Result<Option<SymbolTable>> {
    // the last table of a kind wins
    let Some((index, section)) = sections.iter().enumerate().rev().find(|(_, s)| s.sh_type == sh_type) else {
        return Ok(None);
    };

    let strings = linked_strings(data, sections, section, fallback_strtab);
    let (stride, count) = entry_layout(section, header.class.symbol_size());
    let mut symbols = Vec::new();

    for i in 0..count {
        let mut f = Fields::at(data, section.sh_offset + i * stride, header.class, header.encoding, "symbol");
        let mut symbol = match header.class {
            Class::Elf32 => {
                let st_name = f.u32()?;
                let st_value = f.addr()?;
                let st_size = f.addr()?;
                let st_info = f.u8()?;
                let st_other = f.u8()?;
                let st_shndx = f.u16()?;
                Symbol { name: String::new(), st_name, st_info, st_other, st_shndx, st_value, st_size }
            }
            Class::Elf64 => Symbol {
                name: String::new(),
                st_name: f.u32()?,
                st_info: f.u8()?,
                st_other: f.u8()?,
                st_shndx: f.u16()?,
                st_value: f.u64()?,
                st_size: f.u64()?,
            },
        };
        if symbol.st_name != 0 {
            if let Some(strings) = strings {
                symbol.name = c_string(strings, symbol.st_name as usize);
            }
        }
        symbols.push(symbol);
    }

    vemit!(logger, 1, "Found {} section with {} symbols", section.name, symbols.len());
    Ok(Some(SymbolTable {
        section: index,
        name: section.name.clone(),
        symbols,
    }))
}

fn parse_relocations(
    data: &[u8],
    header: &Header,
    sections: &[Section],
    logger: &Logger,
) -> Result<Vec<RelocationSection>> {
    let mut out = Vec::new();

    for (index, section) in sections.iter().enumerate() {
        let explicit_addend = match section.sh_type {
            SHT_REL => false,
            SHT_RELA => true,
            _ => continue,
        };
        let min_size = if explicit_addend {
            header.class.rela_size()
        } else {
            header.class.rel_size()
        };
        let (stride, count) = entry_layout(section, min_size);
        let mut entries = Vec::new();

        for i in 0..count {
            let mut f = Fields::at(data, section.sh_offset + i * stride, header.class, header.encoding, "relocation");
            let r_offset = f.addr()?;
            let r_info = f.addr()?;
            let r_addend = if explicit_addend { Some(f.signed_addr()?) } else { None };
            let (r_sym, r_type) = match header.class {
                Class::Elf32 => ((r_info >> 8) as u32, (r_info & 0xff) as u32),
                Class::Elf64 => ((r_info >> 32) as u32, (r_info & 0xffff_ffff) as u32),
            };
            entries.push(Relocation { r_offset, r_info, r_addend, r_sym, r_type });
        }

        vemit!(logger, 1, "Found reloc section {} with {} relocs", section.name, entries.len());
        out.push(RelocationSection {
            section: index,
            name: section.name.clone(),
            explicit_addend,
            entries,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{sample, SampleLayout};
    use std::io::Write;

    fn parse(data: &[u8]) -> Result<ElfFile> {
        ElfFile::parse(data, &Logger::new())
    }

    fn check_sample(elf: &ElfFile) {
        assert_eq!(elf.header.e_type, ET_DYN);
        assert_eq!(elf.header.e_machine, 183);
        assert_eq!(elf.header.e_entry, 0x1000);
        assert_eq!(elf.header.e_shstrndx, 5);
        assert_eq!(elf.segments.len(), 2);
        assert_eq!(elf.sections.len(), 7);

        let names: Vec<_> = (0..elf.sections.len()).filter_map(|i| elf.section_name(i)).collect();
        assert_eq!(names, ["", ".interp", ".dynsym", ".dynstr", ".rela.dyn", ".shstrtab", ".bss"]);
        assert_eq!(elf.interpreter(), Some("/system/bin/linker64"));

        let dynsym = elf.dynsym.as_ref().unwrap();
        assert_eq!(dynsym.section, 2);
        assert_eq!(dynsym.name, ".dynsym");
        let symbol_names: Vec<_> = dynsym.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(symbol_names, ["", "open", "close"]);

        let close = &dynsym.symbols[2];
        assert_eq!(close.sym_type(), STT_FUNC);
        assert_eq!(close.bind(), STB_WEAK);
        assert_eq!(close.visibility(), STV_HIDDEN);
        assert_eq!(close.st_shndx, 1);
        assert_eq!(close.st_value, 0x1000);
        assert_eq!(close.st_size, 0x20);
        assert_eq!(dynsym.symbols[1].st_shndx, SHN_UNDEF);
        assert!(elf.symtab.is_none());

        assert_eq!(elf.relocations.len(), 1);
        let rela = &elf.relocations[0];
        assert_eq!(rela.name, ".rela.dyn");
        assert!(rela.explicit_addend);
        assert_eq!(rela.entries.len(), 2);
        assert_eq!(rela.entries[0].r_offset, 0x2000);
        assert_eq!(rela.entries[0].r_sym, 1);
        assert_eq!(rela.entries[0].r_type, 7);
        assert_eq!(rela.entries[0].r_addend, Some(-4));
        assert_eq!(rela.entries[1].r_sym, 2);
    }

    #[test]
    fn test_parse_elf64_little_endian() {
        let data = sample(Class::Elf64, Encoding::Little);
        let elf = parse(&data).unwrap();
        assert!(elf.is_64_bit());
        assert!(!elf.is_32_bit());
        assert_eq!(elf.header.encoding, Encoding::Little);
        check_sample(&elf);
    }

    #[test]
    fn test_parse_elf32_big_endian() {
        let data = sample(Class::Elf32, Encoding::Big);
        let elf = parse(&data).unwrap();
        assert!(elf.is_32_bit());
        assert_eq!(elf.header.encoding, Encoding::Big);
        check_sample(&elf);
    }

    #[test]
    fn test_parse_with_verbose_logging() {
        let data = sample(Class::Elf64, Encoding::Little);
        let logger = Logger::from_flags(true, [true, true, true]);
        let elf = ElfFile::parse(&data, &logger).unwrap();
        check_sample(&elf);
    }

    #[test]
    fn test_sections_in_segment() {
        let elf = parse(&sample(Class::Elf64, Encoding::Little)).unwrap();
        assert_eq!(elf.sections_in_segment(0), [".interp"]);
        assert_eq!(
            elf.sections_in_segment(1),
            [".interp", ".dynsym", ".dynstr", ".rela.dyn", ".shstrtab"]
        );
        assert!(elf.sections_in_segment(9).is_empty());
    }

    #[test]
    fn test_nobits_section_not_bounds_checked() {
        let elf = parse(&sample(Class::Elf64, Encoding::Little)).unwrap();
        let bss = &elf.sections[6];
        assert_eq!(bss.sh_type, SHT_NOBITS);
        assert!(bss.sh_offset + bss.sh_size > elf.header.e_shoff + 7 * 64);
        assert_eq!(bss.data(&[]), None);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = sample(Class::Elf64, Encoding::Little);
        data[3] = b'G';
        assert!(matches!(parse(&data), Err(Error::BadMagic)));
        assert!(matches!(parse(b"\x7fEL"), Err(Error::BadMagic)));
    }

    #[test]
    fn test_unsupported_class_and_encoding() {
        let mut data = sample(Class::Elf64, Encoding::Little);
        data[EI_CLASS] = 3;
        assert!(matches!(parse(&data), Err(Error::UnsupportedClass(3))));

        let mut data = sample(Class::Elf64, Encoding::Little);
        data[EI_DATA] = 0;
        assert!(matches!(parse(&data), Err(Error::UnsupportedEncoding(0))));
    }

    #[test]
    fn test_truncated_header() {
        let data = sample(Class::Elf64, Encoding::Little);
        assert!(matches!(parse(&data[..40]), Err(Error::Truncated { what: "elf header", .. })));
        assert!(matches!(parse(&data[..10]), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_section_table_out_of_bounds() {
        let data = sample(Class::Elf64, Encoding::Little);
        let short = &data[..data.len() - 1];
        assert!(matches!(parse(short), Err(Error::SectionHeaderTableOutOfBounds)));
    }

    #[test]
    fn test_program_header_table_out_of_bounds() {
        let mut data = sample(Class::Elf64, Encoding::Little);
        // e_phoff lives at offset 32 in an ELF64 header
        let len = data.len() as u64;
        data[32..40].copy_from_slice(&len.to_le_bytes());
        assert!(matches!(parse(&data), Err(Error::ProgramHeaderTableOutOfBounds)));
    }

    #[test]
    fn test_segment_out_of_bounds() {
        let mut data = sample(Class::Elf64, Encoding::Little);
        let layout = SampleLayout::new(Class::Elf64);
        let filesz = (layout.phoff + 32) as usize;
        data[filesz..filesz + 8].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(parse(&data), Err(Error::SegmentOutOfBounds(0))));
    }

    #[test]
    fn test_section_out_of_bounds() {
        let mut data = sample(Class::Elf64, Encoding::Little);
        let elf = parse(&data).unwrap();
        let size = (elf.header.e_shoff + 64 + 32) as usize;
        let len = data.len() as u64;
        data[size..size + 8].copy_from_slice(&len.to_le_bytes());
        assert!(matches!(parse(&data), Err(Error::SectionOutOfBounds(1))));
    }

    #[test]
    fn test_last_symbol_table_wins() {
        let mut data = sample(Class::Elf64, Encoding::Little);
        let elf = parse(&data).unwrap();
        // retag .rela.dyn (section 4) as a second dynamic symbol table
        let sh_type = (elf.header.e_shoff + 4 * 64 + 4) as usize;
        data[sh_type..sh_type + 4].copy_from_slice(&SHT_DYNSYM.to_le_bytes());

        let elf = parse(&data).unwrap();
        let dynsym = elf.dynsym.as_ref().unwrap();
        assert_eq!(dynsym.section, 4);
        assert_eq!(dynsym.name, ".rela.dyn");
        assert_eq!(dynsym.symbols.len(), 2);
        assert!(elf.relocations.is_empty());
    }

    #[test]
    fn test_open_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&sample(Class::Elf32, Encoding::Little)).unwrap();
        file.flush().unwrap();

        let elf = ElfFile::open(file.path(), &Logger::new()).unwrap();
        check_sample(&elf);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ElfFile::open(dir.path().join("missing.odex"), &Logger::new());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_c_string() {
        assert_eq!(c_string(b"\0open\0close\0", 1), "open");
        assert_eq!(c_string(b"\0open\0close\0", 6), "close");
        assert_eq!(c_string(b"abc", 0), "abc");
        assert_eq!(c_string(b"abc", 10), "");
    }
}
