#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{MountPaths, ServingConfig};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_required_field, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::{TomlConfig, DEFAULT_MODEL_DESTINATION};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "ramalama-compose")]
#[command(about = "Generate a docker-compose.yaml that serves a model")]
pub struct CliConfig {
    /// Service key for the model in the manifest
    pub model_name: Option<String>,

    /// Host path of the model file (an oci:// prefix is stripped)
    #[arg(long)]
    pub model_source: Option<String>,

    /// Path of the model inside the container
    #[arg(long)]
    pub model_dest: Option<String>,

    #[arg(long, value_name = "SRC:DEST")]
    pub chat_template: Option<String>,

    /// Multimodal projector file
    #[arg(long, value_name = "SRC:DEST")]
    pub mmproj: Option<String>,

    /// Container image to run
    #[arg(long)]
    pub image: Option<String>,

    /// Container name, defaults to ramalama-<MODEL_NAME>
    #[arg(long)]
    pub name: Option<String>,

    /// RAG corpus: oci:<image reference> or a host path
    #[arg(long)]
    pub rag: Option<String>,

    /// PORT or HOST_PORT:CONTAINER_PORT
    #[arg(long)]
    pub port: Option<String>,

    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// TOML file with the serving configuration
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Print the manifest instead of writing it
    #[arg(long)]
    pub stdout: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Command run inside the container
    #[arg(last = true)]
    pub exec_args: Vec<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Builds the serving configuration, layering command line values over the
    /// optional configuration file.
    pub fn resolve(&self) -> Result<ServingConfig> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file.into_serving_config())
            }
            None => None,
        };
        self.merge(file)
    }

    fn merge(&self, file: Option<ServingConfig>) -> Result<ServingConfig> {
        let base = file.unwrap_or_default();

        let model_name = non_empty(pick(&self.model_name, base.model_name));
        let model_source = pick(&self.model_source, base.model_paths.source);
        let model_dest = match (&self.model_dest, base.model_paths.destination) {
            (Some(dest), _) => dest.clone(),
            (None, dest) if !dest.is_empty() => dest,
            (None, _) => DEFAULT_MODEL_DESTINATION.to_string(),
        };
        let image = non_empty(pick(&self.image, base.image));

        let model_name = validate_required_field("model_name", &model_name)?;
        let image = validate_required_field("image", &image)?;

        let mut config = ServingConfig::new(
            model_name.as_str(),
            MountPaths::new(model_source, model_dest),
            image.as_str(),
        );
        config.chat_template_paths = match &self.chat_template {
            Some(spec) => Some(MountPaths::parse("chat_template", spec)?),
            None => base.chat_template_paths,
        };
        config.mmproj_paths = match &self.mmproj {
            Some(spec) => Some(MountPaths::parse("mmproj", spec)?),
            None => base.mmproj_paths,
        };
        config.service_name = self.name.clone().or(base.service_name);
        config.rag_source = self.rag.clone().or(base.rag_source);
        config.port = self.port.clone().or(base.port);
        config.env_overrides = base.env_overrides;
        config.env_overrides.extend(self.env.iter().cloned());
        config.exec_args = if self.exec_args.is_empty() {
            base.exec_args
        } else {
            self.exec_args.clone()
        };

        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.config.is_none() {
            validate_required_field("model_name", &self.model_name)?;
            validate_required_field("model_source", &self.model_source)?;
            validate_required_field("image", &self.image)?;
        }
        crate::utils::validation::validate_path("output_dir", &self.output_dir)
    }
}

#[cfg(feature = "cli")]
fn pick(flag: &Option<String>, fallback: String) -> String {
    flag.clone().unwrap_or(fallback)
}

#[cfg(feature = "cli")]
fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|v| !v.is_empty())
}
