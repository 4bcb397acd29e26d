pub mod cleaner;
pub mod common;
pub mod config;
pub mod environment;
pub mod lister;
pub mod packages;
pub mod purger;
pub mod reporter;
pub mod scanner;
pub mod uninstaller;
