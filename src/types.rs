use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid verbosity level {0}, expected 1, 2 or 3")]
    InvalidLevel(u8),

    #[error("elf incorrect header")]
    BadMagic,

    #[error("elf class ({0}) not supported")]
    UnsupportedClass(u8),

    #[error("elf data encoding ({0}) not supported")]
    UnsupportedEncoding(u8),

    #[error("{what} truncated: need {len} bytes at offset {offset}")]
    Truncated {
        what: &'static str,
        offset: u64,
        len: u64,
    },

    #[error("elf header out of file bound")]
    HeaderOutOfBounds,

    #[error("program header table out of file bound")]
    ProgramHeaderTableOutOfBounds,

    #[error("section header table out of file bound")]
    SectionHeaderTableOutOfBounds,

    #[error("program header {0} is out of file bound")]
    SegmentOutOfBounds(usize),

    #[error("section header {0} is out of file bound")]
    SectionOutOfBounds(usize),
}
