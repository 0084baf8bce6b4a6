pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod stream;

pub use config::Config;
pub use error::{Error, Result};
