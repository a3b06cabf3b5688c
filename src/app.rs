//! Process host: command line and log setup.

pub mod cli;
pub mod logging;
