pub mod compose;
pub mod host;

pub use crate::domain::model::{GeneratedManifest, MountPaths, ServingConfig};
pub use crate::domain::ports::{HostEnvironment, ServingSpec, Storage};
pub use crate::utils::error::Result;
