use crate::core::{GeneratedManifest, Storage};
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    /// Writes the manifest under the base path and returns where it landed.
    pub async fn save_manifest(&self, manifest: &GeneratedManifest) -> Result<String> {
        self.write_file(&manifest.name, manifest.as_bytes()).await?;
        Ok(Path::new(&self.base_path)
            .join(&manifest.name)
            .display()
            .to_string())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
