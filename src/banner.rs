use crate::logging::Logger;

/// `major.minor` of the crate, the form shown in the banner.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR")
);

const TITLE: &str = r"
██████╗ ███████╗██╗  ██╗████████╗██████╗ ██╗██████╗  █████╗ ██████╗  ██████╗ ██████╗
██╔══██╗██╔════╝╚██╗██╔╝╚══██╔══╝██╔══██╗██║██╔══██╗██╔══██╗██╔══██╗██╔═══██╗██╔══██╗
██║  ██║█████╗   ╚███╔╝    ██║   ██████╔╝██║██████╔╝███████║██║  ██║██║   ██║██████╔╝
██║  ██║██╔══╝   ██╔██╗    ██║   ██╔══██╗██║██╔═══╝ ██╔══██║██║  ██║██║   ██║██╔══██╗
██████╔╝███████╗██╔╝ ██╗   ██║   ██║  ██║██║██║     ██║  ██║██████╔╝╚██████╔╝██║  ██║
╚═════╝ ╚══════╝╚═╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝╚═╝╚═╝     ╚═╝  ╚═╝╚═════╝  ╚═════╝ ╚═╝  ╚═╝";

const ABOUT: &str = "\
Dextripador is a tool aimed to provide parsing of odex files and internal dex files,
with the possibility to extract these latter.

This tool is part of a research made by UC3M COSEC Lab & IMDEA Networks.

Programmers & Ideas:

    - Eduardo Blazquez
    - Julien Gamba

https://androidobservatory.com";

/// Full start-up banner: title art, version line and credits.
pub fn banner() -> String {
    format!("{}\n{:>26}Version {}\n\n{}", TITLE, "", VERSION, ABOUT)
}

/// Print the banner through the base gate of `logger`.
pub fn show(logger: &Logger) {
    logger.emit(banner());
}
