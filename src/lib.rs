//! Support library for the Dextripador odex/dex inspection tool.
//!
//! Output goes through an explicitly created [`Logger`]: a master switch
//! gates everything, and three independent verbosity levels gate diagnostic
//! detail. The [`elf`] and [`report`] modules read and dump the ELF container
//! that odex files are stored in.

pub mod banner;
pub mod elf;
pub mod logging;
pub mod names;
pub mod report;
pub mod types;

#[cfg(test)]
mod testdata;

pub use elf::ElfFile;
pub use logging::{Level, Logger, Switches};
pub use types::{Error, Result};
