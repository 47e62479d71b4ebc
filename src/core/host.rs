use crate::domain::ports::HostEnvironment;
use std::path::Path;

/// Environment variables that select which accelerator a runtime may use.
pub const ACCELERATOR_ENV_VARS: [&str; 11] = [
    "ASAHI_VISIBLE_DEVICES",
    "ASCEND_VISIBLE_DEVICES",
    "CUDA_LAUNCH_BLOCKING",
    "CUDA_VISIBLE_DEVICES",
    "GGML_VK_VISIBLE_DEVICES",
    "HIP_VISIBLE_DEVICES",
    "HSA_OVERRIDE_GFX_VERSION",
    "HSA_VISIBLE_DEVICES",
    "INTEL_VISIBLE_DEVICES",
    "MUSA_VISIBLE_DEVICES",
    "ROCR_VISIBLE_DEVICES",
];

pub const SERVICE_NAME_PREFIX: &str = "ramalama";

/// The machine this process runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostEnvironment for SystemHost {
    fn accelerator_env_vars(&self) -> Vec<(String, String)> {
        ACCELERATOR_ENV_VARS
            .iter()
            .filter_map(|name| {
                std::env::var(name)
                    .ok()
                    .map(|value| (name.to_string(), value))
            })
            .collect()
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.try_exists().unwrap_or(false)
    }

    fn generate_service_name(&self, model_name: &str) -> String {
        format!("{}-{}", SERVICE_NAME_PREFIX, model_name)
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}
