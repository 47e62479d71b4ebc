use crate::domain::model::MountPaths;
use crate::utils::error::Result;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Read-only view of a serving configuration, shared by every manifest dialect.
pub trait ServingSpec: Send + Sync {
    fn model_name(&self) -> &str;
    fn model_paths(&self) -> &MountPaths;
    fn chat_template_paths(&self) -> Option<&MountPaths>;
    fn mmproj_paths(&self) -> Option<&MountPaths>;
    fn image(&self) -> &str;
    fn service_name(&self) -> Option<&str>;
    fn rag_source(&self) -> Option<&str>;
    fn port(&self) -> Option<&str>;
    fn env_overrides(&self) -> &[String];
    fn exec_args(&self) -> &[String];
}

/// What the generator needs to know about the machine it runs on.
pub trait HostEnvironment: Send + Sync {
    /// Accelerator selector variables, in a stable order.
    fn accelerator_env_vars(&self) -> Vec<(String, String)>;
    fn path_exists(&self, path: &Path) -> bool;
    fn generate_service_name(&self, model_name: &str) -> String;
    fn version(&self) -> String;
}
