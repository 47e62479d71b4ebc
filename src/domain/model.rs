use crate::domain::ports::ServingSpec;
use crate::utils::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};

/// File name of every manifest this crate produces.
pub const MANIFEST_FILE_NAME: &str = "docker-compose.yaml";

/// Host path and in-container path of a mounted file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MountPaths {
    pub source: String,
    pub destination: String,
}

impl MountPaths {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Parses `SRC:DEST`, splitting on the last colon.
    pub fn parse(field_name: &str, spec: &str) -> Result<Self> {
        match spec.rsplit_once(':') {
            Some((source, destination)) if !source.is_empty() && !destination.is_empty() => {
                Ok(Self::new(source, destination))
            }
            _ => Err(ComposeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: spec.to_string(),
                reason: "Expected SOURCE:DESTINATION".to_string(),
            }),
        }
    }
}

/// Where the retrieval corpus comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RagSource<'a> {
    /// An OCI image reference given as `oci:<ref>`.
    Image(&'a str),
    HostPath(&'a str),
}

impl<'a> RagSource<'a> {
    pub fn parse(source: &'a str) -> Self {
        match source.strip_prefix("oci:") {
            Some(reference) => RagSource::Image(reference),
            None => RagSource::HostPath(source),
        }
    }
}

/// One published port. Both sides are emitted exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host: String,
    pub container: String,
}

impl PortMapping {
    pub const DEFAULT_PORT: &'static str = "8080";

    /// Parses `PORT` or `HOST:CONTAINER`, splitting on the first colon.
    /// `None` maps to the default port.
    pub fn parse(port: Option<&str>) -> Result<Self> {
        let Some(port) = port else {
            return Ok(Self {
                host: Self::DEFAULT_PORT.to_string(),
                container: Self::DEFAULT_PORT.to_string(),
            });
        };

        if port.trim().is_empty() {
            return Err(ComposeError::InvalidConfigValueError {
                field: "port".to_string(),
                value: port.to_string(),
                reason: "Port cannot be empty when set".to_string(),
            });
        }

        let (host, container) = port.split_once(':').unwrap_or((port, port));
        Ok(Self {
            host: host.to_string(),
            container: container.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    pub key: String,
    pub value: String,
}

impl EnvOverride {
    pub fn parse(entry: &str) -> Result<Self> {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| ComposeError::InvalidConfigValueError {
                field: "env".to_string(),
                value: entry.to_string(),
                reason: "Expected KEY=VALUE".to_string(),
            })?;

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Fully resolved description of one model-serving container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServingConfig {
    pub model_name: String,
    pub model_paths: MountPaths,
    pub chat_template_paths: Option<MountPaths>,
    pub mmproj_paths: Option<MountPaths>,
    pub image: String,
    pub service_name: Option<String>,
    pub rag_source: Option<String>,
    pub port: Option<String>,
    pub env_overrides: Vec<String>,
    pub exec_args: Vec<String>,
}

impl ServingConfig {
    pub fn new(model_name: impl Into<String>, model_paths: MountPaths, image: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            model_paths: strip_oci_scheme(model_paths),
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn with_chat_template(mut self, paths: MountPaths) -> Self {
        self.chat_template_paths = Some(paths);
        self
    }

    pub fn with_mmproj(mut self, paths: MountPaths) -> Self {
        self.mmproj_paths = Some(paths);
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn with_rag_source(mut self, source: impl Into<String>) -> Self {
        self.rag_source = Some(source.into());
        self
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn with_env(mut self, entry: impl Into<String>) -> Self {
        self.env_overrides.push(entry.into());
        self
    }

    pub fn with_exec_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exec_args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl ServingSpec for ServingConfig {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_paths(&self) -> &MountPaths {
        &self.model_paths
    }

    fn chat_template_paths(&self) -> Option<&MountPaths> {
        self.chat_template_paths.as_ref()
    }

    fn mmproj_paths(&self) -> Option<&MountPaths> {
        self.mmproj_paths.as_ref()
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    fn rag_source(&self) -> Option<&str> {
        self.rag_source.as_deref()
    }

    fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    fn env_overrides(&self) -> &[String] {
        &self.env_overrides
    }

    fn exec_args(&self) -> &[String] {
        &self.exec_args
    }
}

fn strip_oci_scheme(mut paths: MountPaths) -> MountPaths {
    if let Some(stripped) = paths.source.strip_prefix("oci://") {
        paths.source = stripped.to_string();
    }
    paths
}

/// A rendered manifest, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedManifest {
    pub name: String,
    pub content: String,
}

impl GeneratedManifest {
    pub fn new(content: String) -> Self {
        Self {
            name: MANIFEST_FILE_NAME.to_string(),
            content,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}
