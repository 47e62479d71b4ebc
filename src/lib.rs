pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::toml_config::TomlConfig;
pub use core::{compose::ComposeGenerator, host::SystemHost};
pub use domain::model::{GeneratedManifest, MountPaths, ServingConfig};
pub use utils::error::{ComposeError, Result};
