pub mod dirs;
pub mod settings;

pub use settings::{ConfigError, Settings, StoreSettings, ViewSettings};
