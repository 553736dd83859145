//! Everything that draws on the terminal: the log formatter, the spinner and
//! the print helpers.

pub mod colors;
pub mod format;
pub mod logging;
pub mod print;
pub mod spinner;
