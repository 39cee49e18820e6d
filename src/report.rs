//! readelf-style text dumps of a parsed [`ElfFile`].

use std::io::{self, Write};

use crate::elf::{Class, ElfFile, Symbol, SymbolTable};
use crate::logging::Logger;
use crate::names::*;

fn field(lines: &mut Vec<String>, label: &str, value: impl std::fmt::Display) {
    lines.push(format!("{:<40}{}", format!("{}:", label), value));
}

pub fn header(elf: &ElfFile) -> String {
    let h = &elf.header;
    let mut lines = vec!["Elf Header".to_string()];

    let magic: Vec<String> = h
        .ident
        .iter()
        .enumerate()
        .map(|(i, &b)| if (1..=3).contains(&i) { (b as char).to_string() } else { format!("{:x}", b) })
        .collect();
    lines.push(format!("Elf magic: {}", magic.join(" ")));

    field(&mut lines, "Elf class", match h.class {
        Class::Elf32 => "ELF32",
        Class::Elf64 => "ELF64",
    });
    let data = h.ident[EI_DATA];
    field(&mut lines, "Elf Data", format!("{} ({})", data, data_encoding_name(data)));
    let spec_version = u32::from(h.ident[EI_VERSION]);
    field(
        &mut lines,
        "Elf Specification Version",
        format!("{} ({})", spec_version, version_name(spec_version)),
    );
    field(&mut lines, "Elf OS/ABI", format!("{} ({})", h.osabi(), osabi_name(h.osabi())));
    field(&mut lines, "Elf ABI Version", h.abi_version());
    field(&mut lines, "Elf type", file_type_name(h.e_type));
    field(&mut lines, "Machine", machine_name(h.e_machine));
    field(&mut lines, "Elf File Version", format!("{} ({})", h.e_version, version_name(h.e_version)));
    field(&mut lines, "Elf Program entry point", format!("{:#x}", h.e_entry));
    field(&mut lines, "Elf Program header Offset", format!("{} (raw offset bytes)", h.e_phoff));
    field(&mut lines, "Elf Section header Offset", format!("{} (raw offset bytes)", h.e_shoff));
    field(&mut lines, "Elf processor flags", format!("{:#x}", h.e_flags));
    field(&mut lines, "Elf header's size", format!("{} (bytes)", h.e_ehsize));
    field(&mut lines, "Elf program header entry size", format!("{} (bytes)", h.e_phentsize));
    field(&mut lines, "Elf program header number of entries", h.e_phnum);
    field(&mut lines, "Elf section header's size", format!("{} (bytes)", h.e_shentsize));
    field(&mut lines, "Elf section header number of entries", h.e_shnum);
    field(&mut lines, "Elf section header string table index", h.e_shstrndx);

    lines.join("\n")
}

pub fn program_headers(elf: &ElfFile) -> String {
    let mut lines = vec![
        "Elf Program Header:".to_string(),
        format!(
            "{:<16}{:<6}{:>18} {:>18} {:>18}\n{:>40} {:>18} {:>10}",
            "TYPE", "FLAGS", "Offset", "V.Addr", "P.Addr", "F.Size", "M.Size", "Align"
        ),
    ];

    for segment in &elf.segments {
        let kind = segment_type_name(segment.p_type)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:X}", segment.p_type));
        lines.push(format!(
            "{:<16}{:<6}{:#018x} {:#018x} {:#018x}",
            kind,
            segment_flags(segment.p_flags),
            segment.p_offset,
            segment.p_vaddr,
            segment.p_paddr
        ));

        let mut sizes = format!(
            "{:>22}{:#018x} {:#018x} {:#x}",
            "", segment.p_filesz, segment.p_memsz, segment.p_align
        );
        match segment.p_type {
            PT_INTERP => {
                if let Some(interp) = elf.interpreter() {
                    sizes.push_str(&format!("\n      [Program Interpreter: {}]", interp));
                }
            }
            PT_LOAD if segment.p_offset == 0 => sizes.push_str("  (TEXT)"),
            PT_LOAD => sizes.push_str("  (DATA)"),
            _ => {}
        }
        lines.push(sizes);
    }

    lines.push(String::new());
    lines.push("Mapping from section to segment:".to_string());
    lines.push("SEGMENT: SECTIONS".to_string());
    for i in 0..elf.segments.len() {
        lines.push(format!("  {:>5}: {}", i, elf.sections_in_segment(i).join(" ")));
    }

    lines.join("\n")
}

pub fn section_headers(elf: &ElfFile) -> String {
    let mut lines = vec![
        "Elf Section header:".to_string(),
        format!(
            "[ID] {:<17}{:<17}{:<13}{:>18} {:>18}\n     {:>18} {:>10} {:>10} {:>10} {:>10}",
            "NAME", "TYPE", "FLAGS", "ADDRESS", "OFFSET", "SIZE", "LINK", "INFO", "ADDRALIGN", "ENTSIZE"
        ),
    ];

    for (i, section) in elf.sections.iter().enumerate() {
        let kind = section_type_name(section.sh_type)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:08x}", section.sh_type));
        lines.push(format!(
            "[{:02}] {:<16} {:<16} {} {:#018x} {:#018x}",
            i,
            section.name,
            kind,
            section_flags(section.sh_flags),
            section.sh_addr,
            section.sh_offset
        ));
        lines.push(format!(
            "     {:#018x} {:>10} {:>10} {:>10} {:>10}",
            section.sh_size, section.sh_link, section.sh_info, section.sh_addralign, section.sh_entsize
        ));
    }

    lines.join("\n")
}

fn symbol_line(index: usize, symbol: &Symbol) -> String {
    let kind = symbol_type_name(symbol.sym_type())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:08x}", symbol.sym_type()));
    let bind = symbol_bind_name(symbol.bind())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:08x}", symbol.bind()));
    let shndx = special_section_name(symbol.st_shndx)
        .map(str::to_string)
        .unwrap_or_else(|| symbol.st_shndx.to_string());

    format!(
        " {:>4}: {:016x} {:016x} {:<8} {:<7} {:<9} {:>5} {}",
        index,
        symbol.st_value,
        symbol.st_size,
        kind,
        bind,
        symbol_visibility_name(symbol.visibility()),
        shndx,
        symbol.name
    )
}

fn symbol_table(lines: &mut Vec<String>, table: &SymbolTable) {
    lines.push(format!("Found {} section symbols with {} symbols", table.name, table.symbols.len()));
    lines.push(format!(
        "   {}: {:>16} {:>16} {:<8} {:<7} {:<9} {:>5} {}",
        "ID", "Value", "Size", "TYPE", "BIND", "VIS", "Ndx", "NAME"
    ));
    lines.extend(table.symbols.iter().enumerate().map(|(i, s)| symbol_line(i, s)));
}

pub fn symbols(elf: &ElfFile) -> String {
    let mut lines = vec!["Elf symbol headers:".to_string()];
    for table in [&elf.dynsym, &elf.symtab].into_iter().flatten() {
        symbol_table(&mut lines, table);
    }
    lines.join("\n")
}

pub fn relocations(elf: &ElfFile) -> String {
    let mut lines = vec!["Elf reloc headers:".to_string()];

    for section in &elf.relocations {
        let name = if section.name.is_empty() { "NONE" } else { section.name.as_str() };
        lines.push(format!("Found reloc section {}, relocs:", name));
        if section.explicit_addend {
            lines.push(format!("{:<16} {:<16} {:<16}", "OFFSET", "INFO", "ADDEND"));
        } else {
            lines.push(format!("{:<16} {:<16}", "OFFSET", "INFO"));
        }
        for reloc in &section.entries {
            match reloc.r_addend {
                Some(addend) => lines.push(format!("{:016x} {:016x} {:016x}", reloc.r_offset, reloc.r_info, addend)),
                None => lines.push(format!("{:016x} {:016x}", reloc.r_offset, reloc.r_info)),
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn all(elf: &ElfFile) -> Vec<String> {
    vec![
        header(elf),
        program_headers(elf),
        section_headers(elf),
        symbols(elf),
        relocations(elf),
    ]
}

/// Print every table through the base gate of `logger`.
pub fn show(logger: &Logger, elf: &ElfFile) {
    for table in all(elf) {
        logger.emit(format!("{}\n", table));
    }
}

pub fn write_to<W: Write + ?Sized>(logger: &Logger, out: &mut W, elf: &ElfFile) -> io::Result<()> {
    for table in all(elf) {
        logger.emit_to(out, format!("{}\n", table))?;
    }
    Ok(())
}
