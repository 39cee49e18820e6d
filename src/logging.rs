//! Console output gated by a master switch and three verbosity levels.
//!
//! A [`Logger`] is created once and handed by reference to whatever needs to
//! print. Nothing is written unless the master switch is on; verbose messages
//! additionally need their own level switch. The levels are independent of
//! each other: enabling level 3 does not enable levels 1 or 2.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::types::{Error, Result};

/// Verbosity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

    fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(Error::InvalidLevel(other)),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Plain copy of the switch record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Switches {
    pub active: bool,
    pub verbose: [bool; 3],
}

impl Switches {
    pub fn verbose(&self, level: Level) -> bool {
        self.verbose[level.index()]
    }
}

#[derive(Debug, Default)]
pub struct Logger {
    active: AtomicBool,
    verbose: [AtomicBool; 3],
}

impl Logger {
    /// All switches off.
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            verbose: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    pub fn from_flags(active: bool, verbose: [bool; 3]) -> Self {
        let logger = Self::new();
        logger.apply(Switches { active, verbose });
        logger
    }

    pub fn set_active(&self, enabled: bool) {
        self.active.store(enabled, Ordering::Relaxed);
    }

    pub fn set_verbose(&self, level: Level, enabled: bool) {
        self.verbose[level.index()].store(enabled, Ordering::Relaxed);
    }

    /// Overwrite every switch with the values in `switches`.
    pub fn apply(&self, switches: Switches) {
        self.set_active(switches.active);
        for level in Level::ALL {
            self.set_verbose(level, switches.verbose(level));
        }
    }

    pub fn snapshot(&self) -> Switches {
        Switches {
            active: self.is_active(),
            verbose: Level::ALL.map(|level| self.verbose[level.index()].load(Ordering::Relaxed)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// True when a message at `level` would be printed.
    pub fn is_verbose(&self, level: Level) -> bool {
        self.is_active() && self.verbose[level.index()].load(Ordering::Relaxed)
    }

    /// Gate for either path: `None` is the base path, `Some(level)` a verbose one.
    pub fn enabled(&self, level: Option<Level>) -> bool {
        match level {
            None => self.is_active(),
            Some(level) => self.is_verbose(level),
        }
    }

    /// Print `message` on stdout if the master switch is on.
    ///
    /// Write failures on stdout are not recovered from.
    pub fn emit(&self, message: impl Display) {
        if let Err(e) = self.emit_to(&mut io::stdout().lock(), message) {
            panic!("failed printing to stdout: {}", e);
        }
    }

    /// Print `message` on stdout if both the master switch and `level` are on.
    pub fn emit_verbose(&self, message: impl Display, level: Level) {
        if let Err(e) = self.emit_verbose_to(&mut io::stdout().lock(), message, level) {
            panic!("failed printing to stdout: {}", e);
        }
    }

    pub fn emit_to<W: Write + ?Sized>(&self, out: &mut W, message: impl Display) -> io::Result<()> {
        if self.is_active() {
            writeln!(out, "{}", message)?;
        }
        Ok(())
    }

    pub fn emit_verbose_to<W: Write + ?Sized>(
        &self,
        out: &mut W,
        message: impl Display,
        level: Level,
    ) -> io::Result<()> {
        if self.is_verbose(level) {
            writeln!(out, "{}", message)?;
        }
        Ok(())
    }
}

/// Format and print a message through a [`Logger`] when its master switch is on.
///
/// The arguments are only formatted when the message will actually be printed.
#[macro_export]
macro_rules! emit {
    ($logger:expr, $($arg:tt)*) => {{
        let logger: &$crate::logging::Logger = &$logger;
        if logger.is_active() {
            logger.emit(format!($($arg)*));
        }
    }};
}

/// Verbose counterpart of [`emit!`]: `vemit!(logger, 2, "parsed {} sections", n)`.
#[macro_export]
macro_rules! vemit {
    (@level $logger:expr, $level:expr, $($arg:tt)*) => {{
        let logger: &$crate::logging::Logger = &$logger;
        if logger.is_verbose($level) {
            logger.emit_verbose(format!($($arg)*), $level);
        }
    }};
    ($logger:expr, 1, $($arg:tt)*) => {
        $crate::vemit!(@level $logger, $crate::logging::Level::One, $($arg)*)
    };
    ($logger:expr, 2, $($arg:tt)*) => {
        $crate::vemit!(@level $logger, $crate::logging::Level::Two, $($arg)*)
    };
    ($logger:expr, 3, $($arg:tt)*) => {
        $crate::vemit!(@level $logger, $crate::logging::Level::Three, $($arg)*)
    };
}
