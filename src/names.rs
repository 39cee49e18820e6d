//! ELF constants and their human readable names.

pub const ELFMAG: [u8; 4] = [0x7f, b'E', b'L', b'F'];
pub const EI_NIDENT: usize = 16;
pub const EI_CLASS: usize = 4;
pub const EI_DATA: usize = 5;
pub const EI_VERSION: usize = 6;
pub const EI_OSABI: usize = 7;
pub const EI_ABIVERSION: usize = 8;

pub const ELFCLASS32: u8 = 1;
pub const ELFCLASS64: u8 = 2;
pub const ELFDATA2LSB: u8 = 1;
pub const ELFDATA2MSB: u8 = 2;
pub const EV_CURRENT: u32 = 1;

pub const ET_NONE: u16 = 0;
pub const ET_REL: u16 = 1;
pub const ET_EXEC: u16 = 2;
pub const ET_DYN: u16 = 3;
pub const ET_CORE: u16 = 4;

pub const PT_NULL: u32 = 0;
pub const PT_LOAD: u32 = 1;
pub const PT_DYNAMIC: u32 = 2;
pub const PT_INTERP: u32 = 3;
pub const PT_NOTE: u32 = 4;
pub const PT_SHLIB: u32 = 5;
pub const PT_PHDR: u32 = 6;
pub const PT_TLS: u32 = 7;
pub const PT_GNU_EH_FRAME: u32 = 0x6474_e550;
pub const PT_GNU_STACK: u32 = 0x6474_e551;
pub const PT_GNU_RELRO: u32 = 0x6474_e552;
pub const PT_LOPROC: u32 = 0x7000_0000;
pub const PT_HIPROC: u32 = 0x7fff_ffff;

pub const PF_X: u32 = 1;
pub const PF_W: u32 = 2;
pub const PF_R: u32 = 4;

pub const SHT_NULL: u32 = 0;
pub const SHT_PROGBITS: u32 = 1;
pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_RELA: u32 = 4;
pub const SHT_HASH: u32 = 5;
pub const SHT_DYNAMIC: u32 = 6;
pub const SHT_NOTE: u32 = 7;
pub const SHT_NOBITS: u32 = 8;
pub const SHT_REL: u32 = 9;
pub const SHT_SHLIB: u32 = 10;
pub const SHT_DYNSYM: u32 = 11;
pub const SHT_INIT_ARRAY: u32 = 14;
pub const SHT_FINI_ARRAY: u32 = 15;
pub const SHT_PREINIT_ARRAY: u32 = 16;
pub const SHT_GROUP: u32 = 17;
pub const SHT_GNU_ATTRIBUTES: u32 = 0x6fff_fff5;
pub const SHT_GNU_HASH: u32 = 0x6fff_fff6;
pub const SHT_GNU_LIBLIST: u32 = 0x6fff_fff7;
pub const SHT_GNU_VERDEF: u32 = 0x6fff_fffd;
pub const SHT_GNU_VERNEED: u32 = 0x6fff_fffe;
pub const SHT_GNU_VERSYM: u32 = 0x6fff_ffff;
pub const SHT_LOPROC: u32 = 0x7000_0000;
pub const SHT_IA_64_UNWIND: u32 = 0x7000_0001;
pub const SHT_HIPROC: u32 = 0x7fff_ffff;
pub const SHT_LOUSER: u32 = 0x8000_0000;
pub const SHT_HIUSER: u32 = 0x8fff_ffff;

pub const SHF_WRITE: u64 = 0x1;
pub const SHF_ALLOC: u64 = 0x2;
pub const SHF_EXECINSTR: u64 = 0x4;
pub const SHF_MERGE: u64 = 0x10;
pub const SHF_STRINGS: u64 = 0x20;
pub const SHF_INFO_LINK: u64 = 0x40;
pub const SHF_LINK_ORDER: u64 = 0x80;
pub const SHF_OS_NONCONFORMING: u64 = 0x100;
pub const SHF_GROUP: u64 = 0x200;
pub const SHF_TLS: u64 = 0x400;
pub const SHF_COMPRESSED: u64 = 0x800;
pub const SHF_EXCLUDE: u64 = 0x8000_0000;

pub const STT_NOTYPE: u8 = 0;
pub const STT_OBJECT: u8 = 1;
pub const STT_FUNC: u8 = 2;
pub const STT_SECTION: u8 = 3;
pub const STT_FILE: u8 = 4;
pub const STT_COMMON: u8 = 5;
pub const STT_TLS: u8 = 6;

pub const STB_LOCAL: u8 = 0;
pub const STB_GLOBAL: u8 = 1;
pub const STB_WEAK: u8 = 2;

pub const STV_DEFAULT: u8 = 0;
pub const STV_INTERNAL: u8 = 1;
pub const STV_HIDDEN: u8 = 2;
pub const STV_PROTECTED: u8 = 3;

pub const SHN_UNDEF: u16 = 0;
pub const SHN_BEFORE: u16 = 0xff00;
pub const SHN_AFTER: u16 = 0xff01;
pub const SHN_ABS: u16 = 0xfff1;
pub const SHN_COMMON: u16 = 0xfff2;

pub fn osabi_name(osabi: u8) -> &'static str {
    match osabi {
        0 => "UNIX System V",
        1 => "HP-UX",
        2 => "NetBSD",
        3 => "Linux",
        6 => "Solaris",
        7 => "IBM AIX",
        8 => "IRIX",
        9 => "FreeBSD",
        10 => "TRU64",
        11 => "Novell Modesto",
        12 => "OpenBSD",
        64 => "ARM EABI",
        97 => "ARM",
        255 => "Embedded",
        _ => "Unknown",
    }
}

pub fn machine_name(machine: u16) -> &'static str {
    match machine {
        0 => "No machine",
        1 => "AT&T WE 32100",
        2 => "Sun Microsystems SPARC",
        3 => "Intel 80386",
        4 => "Motorola 68000 family",
        5 => "Motorola 88000 family",
        7 => "Intel 80860",
        8 => "MIPS RS3000 (big-endian only)",
        9 => "IBM System/370",
        10 => "MIPS R3000 little-endian",
        20 => "PowerPC",
        21 => "PowerPC 64-bit",
        22 => "IBM S/390",
        40 => "ARM",
        42 => "Hitachi SH",
        43 => "SPARC v9 64-bit",
        50 => "Intel Itanium",
        62 => "AMD x86-64",
        183 => "ARM AArch64",
        188 => "Tilera TILEPro",
        189 => "Xilinx MicroBlaze",
        191 => "Tilera TILE-Gx",
        243 => "RISC-V",
        247 => "Linux BPF",
        _ => "Unknown machine",
    }
}

pub fn file_type_name(e_type: u16) -> &'static str {
    match e_type {
        ET_NONE => "Unknown type",
        ET_REL => "REL (Relocatable file)",
        ET_EXEC => "EXEC (Executable file)",
        ET_DYN => "DYN (Shared object file)",
        ET_CORE => "CORE (Core file)",
        _ => "Processor or OS specific",
    }
}

pub fn data_encoding_name(data: u8) -> &'static str {
    match data {
        0 => "Unknown",
        ELFDATA2LSB => "Two's complement, little-endian",
        ELFDATA2MSB => "Two's complement, big-endian",
        _ => "Invalid encoding",
    }
}

pub fn version_name(version: u32) -> &'static str {
    match version {
        0 => "Invalid Version",
        EV_CURRENT => "Current",
        _ => "Unknown Version",
    }
}

pub fn segment_type_name(p_type: u32) -> Option<&'static str> {
    Some(match p_type {
        PT_NULL => "NULL",
        PT_LOAD => "LOAD",
        PT_DYNAMIC => "DYNAMIC",
        PT_INTERP => "INTERP",
        PT_NOTE => "NOTE",
        PT_SHLIB => "SHLIB",
        PT_PHDR => "PHDR",
        PT_TLS => "TLS",
        PT_GNU_EH_FRAME => "GNU_EH_FRAME",
        PT_GNU_STACK => "GNU_STACK",
        PT_GNU_RELRO => "GNU_RELRO",
        PT_LOPROC => "LOPROC",
        PT_HIPROC => "HIPROC",
        _ => return None,
    })
}

/// `RWX` style rendering of segment permissions, blanks for missing bits.
pub fn segment_flags(p_flags: u32) -> String {
    [(PF_R, 'R'), (PF_W, 'W'), (PF_X, 'X')]
        .iter()
        .map(|&(bit, c)| if p_flags & bit != 0 { c } else { ' ' })
        .collect()
}

pub fn section_type_name(sh_type: u32) -> Option<&'static str> {
    Some(match sh_type {
        SHT_NULL => "NULL",
        SHT_PROGBITS => "PROGBITS",
        SHT_SYMTAB => "SYMTAB",
        SHT_STRTAB => "STRTAB",
        SHT_RELA => "RELA",
        SHT_HASH => "HASH",
        SHT_DYNAMIC => "DYNAMIC",
        SHT_NOTE => "NOTE",
        SHT_NOBITS => "NOBITS",
        SHT_REL => "REL",
        SHT_SHLIB => "SHLIB",
        SHT_DYNSYM => "DYNSYM",
        SHT_INIT_ARRAY => "INIT_ARRAY",
        SHT_FINI_ARRAY => "FINI_ARRAY",
        SHT_PREINIT_ARRAY => "PREINIT_ARRAY",
        SHT_GROUP => "GROUP",
        SHT_GNU_ATTRIBUTES => "GNU_ATTRIBUTES",
        SHT_GNU_HASH => "GNU_HASH",
        SHT_GNU_LIBLIST => "GNU_LIBLIST",
        SHT_GNU_VERDEF => "VERDEF",
        SHT_GNU_VERNEED => "VERNEED",
        SHT_GNU_VERSYM => "VERSYM",
        SHT_LOPROC => "LOPROC",
        SHT_IA_64_UNWIND => "IA_64_UNWIND",
        SHT_HIPROC => "HIPROC",
        SHT_LOUSER => "LOUSER",
        SHT_HIUSER => "HIUSER",
        _ => return None,
    })
}

const SECTION_FLAG_LETTERS: [(u64, char); 12] = [
    (SHF_WRITE, 'W'),
    (SHF_ALLOC, 'A'),
    (SHF_EXECINSTR, 'X'),
    (SHF_MERGE, 'M'),
    (SHF_STRINGS, 'S'),
    (SHF_INFO_LINK, 'I'),
    (SHF_LINK_ORDER, 'L'),
    (SHF_OS_NONCONFORMING, 'O'),
    (SHF_GROUP, 'G'),
    (SHF_TLS, 'T'),
    (SHF_EXCLUDE, 'E'),
    (SHF_COMPRESSED, 'C'),
];

/// Letters of the set section flags, padded with `-` to a fixed width of 12.
pub fn section_flags(sh_flags: u64) -> String {
    let mut out: String = SECTION_FLAG_LETTERS
        .iter()
        .filter(|&&(bit, _)| sh_flags & bit != 0)
        .map(|&(_, c)| c)
        .collect();
    while out.len() < SECTION_FLAG_LETTERS.len() {
        out.push('-');
    }
    out
}

pub fn symbol_type_name(st_type: u8) -> Option<&'static str> {
    Some(match st_type {
        STT_NOTYPE => "NOTYPE",
        STT_OBJECT => "OBJECT",
        STT_FUNC => "FUNC",
        STT_SECTION => "SECTION",
        STT_FILE => "FILE",
        STT_COMMON => "COMMON",
        STT_TLS => "TLS",
        13 => "LOPROC",
        15 => "HIPROC",
        _ => return None,
    })
}

pub fn symbol_bind_name(st_bind: u8) -> Option<&'static str> {
    Some(match st_bind {
        STB_LOCAL => "LOCAL",
        STB_GLOBAL => "GLOBAL",
        STB_WEAK => "WEAK",
        _ => return None,
    })
}

pub fn symbol_visibility_name(st_visibility: u8) -> &'static str {
    match st_visibility {
        STV_DEFAULT => "DEFAULT",
        STV_INTERNAL => "INTERNAL",
        STV_HIDDEN => "HIDDEN",
        _ => "PROTECTED",
    }
}

/// Short name for reserved section indices, `None` for ordinary ones.
pub fn special_section_name(shndx: u16) -> Option<&'static str> {
    match shndx {
        SHN_UNDEF => Some("UND"),
        SHN_ABS => Some("ABS"),
        SHN_COMMON => Some("COM"),
        SHN_BEFORE => Some("BEF"),
        SHN_AFTER => Some("AFT"),
        _ => None,
    }
}
