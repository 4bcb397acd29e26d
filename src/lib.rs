pub mod commands;
pub mod modules;

pub use modules::common::error::PurgeError;
pub use modules::common::utils;
pub use modules::config::PurgeConfig;
pub use modules::purger::{Backends, Purger};
pub use modules::reporter;
