//! Library components of the fmtmap command-line tool.

pub mod logging;
pub mod steps;
pub mod summary;
