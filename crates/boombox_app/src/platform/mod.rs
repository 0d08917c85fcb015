//! Process-level wiring: command line, logging, configuration and the run itself.
pub(crate) mod app;
pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod logging;
