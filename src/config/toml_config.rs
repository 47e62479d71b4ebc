use crate::domain::model::{MountPaths, ServingConfig};
use crate::utils::error::{ComposeError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_MODEL_DESTINATION: &str = "/mnt/models/model.file";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub model: ModelSection,
    pub container: ContainerSection,
    #[serde(default)]
    pub serve: ServeSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    pub name: String,
    pub source: String,
    #[serde(default = "default_model_destination")]
    pub destination: String,
    pub chat_template: Option<MountPaths>,
    pub mmproj: Option<MountPaths>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSection {
    pub image: String,
    pub name: Option<String>,
    pub port: Option<String>,
    #[serde(default)]
    pub environment: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServeSection {
    pub rag: Option<String>,
    #[serde(default)]
    pub command: Vec<String>,
}

fn default_model_destination() -> String {
    DEFAULT_MODEL_DESTINATION.to_string()
}

impl TomlConfig {
    /// Loads a serving configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ComposeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a serving configuration, expanding `${VAR}` placeholders first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    // Unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn into_serving_config(self) -> ServingConfig {
        let mut config = ServingConfig::new(
            self.model.name,
            MountPaths::new(self.model.source, self.model.destination),
            self.container.image,
        );
        config.chat_template_paths = self.model.chat_template;
        config.mmproj_paths = self.model.mmproj;
        config.service_name = self.container.name;
        config.port = self.container.port;
        config.env_overrides = self.container.environment;
        config.rag_source = self.serve.rag;
        config.exec_args = self.serve.command;
        config
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("model.name", &self.model.name)?;
        validate_path("model.source", &self.model.source)?;
        validate_path("model.destination", &self.model.destination)?;
        validate_non_empty_string("container.image", &self.container.image)?;
        Ok(())
    }
}
