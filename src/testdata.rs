//! Hand-assembled ELF images for tests.

use crate::elf::{Class, Encoding};
use crate::names::*;

pub(crate) const INTERP: &[u8] = b"/system/bin/linker64\0";
const DYNSTR: &[u8] = b"\0open\0close\0";
const SHSTRTAB: &[u8] = b"\0.interp\0.dynsym\0.dynstr\0.rela.dyn\0.shstrtab\0.bss\0";

struct Builder {
    class: Class,
    encoding: Encoding,
    buf: Vec<u8>,
}

impl Builder {
    fn new(class: Class, encoding: Encoding) -> Self {
        Self { class, encoding, buf: Vec::new() }
    }

    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn u16(&mut self, v: u16) {
        match self.encoding {
            Encoding::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Encoding::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    fn u32(&mut self, v: u32) {
        match self.encoding {
            Encoding::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Encoding::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    fn u64(&mut self, v: u64) {
        match self.encoding {
            Encoding::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Encoding::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    fn addr(&mut self, v: u64) {
        match self.class {
            Class::Elf32 => self.u32(v as u32),
            Class::Elf64 => self.u64(v),
        }
    }

    fn symbol(&mut self, name: u32, info: u8, other: u8, shndx: u16, value: u64, size: u64) {
        self.u32(name);
        match self.class {
            Class::Elf32 => {
                self.addr(value);
                self.addr(size);
                self.u8(info);
                self.u8(other);
                self.u16(shndx);
            }
            Class::Elf64 => {
                self.u8(info);
                self.u8(other);
                self.u16(shndx);
                self.u64(value);
                self.u64(size);
            }
        }
    }

    fn rela(&mut self, offset: u64, sym: u64, kind: u64, addend: i64) {
        let info = match self.class {
            Class::Elf32 => (sym << 8) | kind,
            Class::Elf64 => (sym << 32) | kind,
        };
        self.addr(offset);
        self.addr(info);
        self.addr(addend as u64);
    }

    fn segment(&mut self, p_type: u32, flags: u32, offset: u64, filesz: u64, align: u64) {
        self.u32(p_type);
        if self.class == Class::Elf64 {
            self.u32(flags);
        }
        self.addr(offset);
        self.addr(offset);
        self.addr(offset);
        self.addr(filesz);
        self.addr(filesz);
        if self.class == Class::Elf32 {
            self.u32(flags);
        }
        self.addr(align);
    }

    #[allow(clippy::too_many_arguments)]
    fn section(
        &mut self,
        name: u32,
        sh_type: u32,
        flags: u64,
        offset: u64,
        size: u64,
        link: u32,
        info: u32,
        entsize: u64,
    ) {
        self.u32(name);
        self.u32(sh_type);
        self.addr(flags);
        self.addr(0);
        self.addr(offset);
        self.addr(size);
        self.u32(link);
        self.u32(info);
        self.addr(if entsize > 0 { 8 } else { 1 });
        self.addr(entsize);
    }
}

/// File offsets of the pieces of [`sample`].
pub(crate) struct SampleLayout {
    pub phoff: u64,
    pub interp: u64,
    pub dynsym: u64,
    pub dynstr: u64,
    pub rela: u64,
    pub shstrtab: u64,
    pub shoff: u64,
}

impl SampleLayout {
    pub fn new(class: Class) -> Self {
        let phoff = class.header_size();
        let interp = phoff + 2 * class.program_header_size();
        let dynsym = interp + INTERP.len() as u64;
        let dynstr = dynsym + 3 * class.symbol_size();
        let rela = dynstr + DYNSTR.len() as u64;
        let shstrtab = rela + 2 * class.rela_size();
        let shoff = shstrtab + SHSTRTAB.len() as u64;
        Self { phoff, interp, dynsym, dynstr, rela, shstrtab, shoff }
    }
}

/// A small shared object for AArch64: interpreter, dynamic symbols
/// (`open`, `close`), one RELA section and a trailing `.bss`.
pub(crate) fn sample(class: Class, encoding: Encoding) -> Vec<u8> {
    let layout = SampleLayout::new(class);
    let mut b = Builder::new(class, encoding);

    b.buf.extend_from_slice(&ELFMAG);
    b.u8(match class {
        Class::Elf32 => ELFCLASS32,
        Class::Elf64 => ELFCLASS64,
    });
    b.u8(match encoding {
        Encoding::Little => ELFDATA2LSB,
        Encoding::Big => ELFDATA2MSB,
    });
    b.u8(1);
    b.buf.resize(EI_NIDENT, 0);

    b.u16(ET_DYN);
    b.u16(183);
    b.u32(EV_CURRENT);
    b.addr(0x1000);
    b.addr(layout.phoff);
    b.addr(layout.shoff);
    b.u32(0);
    b.u16(class.header_size() as u16);
    b.u16(class.program_header_size() as u16);
    b.u16(2);
    b.u16(class.section_header_size() as u16);
    b.u16(7);
    b.u16(5);

    b.segment(PT_INTERP, PF_R, layout.interp, INTERP.len() as u64, 1);
    b.segment(PT_LOAD, PF_R | PF_X, 0, layout.shoff, 0x1000);

    b.buf.extend_from_slice(INTERP);
    b.symbol(0, 0, 0, 0, 0, 0);
    b.symbol(1, (STB_GLOBAL << 4) | STT_FUNC, STV_DEFAULT, SHN_UNDEF, 0, 0);
    b.symbol(6, (STB_WEAK << 4) | STT_FUNC, STV_HIDDEN, 1, 0x1000, 0x20);
    b.buf.extend_from_slice(DYNSTR);
    b.rela(0x2000, 1, 7, -4);
    b.rela(0x2008, 2, 7, 0);
    b.buf.extend_from_slice(SHSTRTAB);
    assert_eq!(b.buf.len() as u64, layout.shoff);

    let alloc = SHF_ALLOC;
    b.section(0, SHT_NULL, 0, 0, 0, 0, 0, 0);
    b.section(1, SHT_PROGBITS, alloc, layout.interp, INTERP.len() as u64, 0, 0, 0);
    b.section(9, SHT_DYNSYM, alloc, layout.dynsym, 3 * class.symbol_size(), 3, 1, class.symbol_size());
    b.section(17, SHT_STRTAB, alloc, layout.dynstr, DYNSTR.len() as u64, 0, 0, 0);
    b.section(25, SHT_RELA, alloc, layout.rela, 2 * class.rela_size(), 2, 0, class.rela_size());
    b.section(35, SHT_STRTAB, 0, layout.shstrtab, SHSTRTAB.len() as u64, 0, 0, 0);
    b.section(45, SHT_NOBITS, SHF_WRITE | alloc, layout.shoff, 0x1000, 0, 0, 0);

    b.buf
}
