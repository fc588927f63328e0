pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::load_config;
pub use models::{AppConfig, ConfigOverrides};
