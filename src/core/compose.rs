//! Renders the compose-file dialect of a serving manifest.
//!
//! Each section is built on its own and may come back empty; the assembled
//! template is then stripped of blank lines so omitted sections leave no gap.

use crate::domain::model::{EnvOverride, GeneratedManifest, PortMapping, RagSource};
use crate::domain::ports::{HostEnvironment, ServingSpec};
use crate::utils::error::{ComposeError, Result};
use crate::utils::validation::validate_path;
use std::path::Path;

/// In-container directory the retrieval corpus is mounted at.
pub const RAG_DIR: &str = "/rag";

/// Host device nodes passed through when present.
pub const DEVICE_PATHS: [&str; 3] = ["/dev/dri", "/dev/kfd", "/dev/accel"];

pub const RESTART_POLICY: &str = "unless-stopped";

pub struct ComposeGenerator<'a, C: ServingSpec, H: HostEnvironment> {
    config: &'a C,
    host: &'a H,
}

impl<'a, C: ServingSpec, H: HostEnvironment> ComposeGenerator<'a, C, H> {
    pub fn new(config: &'a C, host: &'a H) -> Self {
        Self { config, host }
    }

    /// Name the container will run under.
    pub fn container_name(&self) -> String {
        match self.config.service_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.host.generate_service_name(self.config.model_name()),
        }
    }

    pub fn generate(&self) -> Result<GeneratedManifest> {
        let model = self.config.model_paths();
        validate_path("model.source", &model.source)?;
        validate_path("model.destination", &model.destination)?;

        // Everything fallible runs before any text is rendered.
        let port = PortMapping::parse(self.config.port())?;
        let overrides = self
            .config
            .env_overrides()
            .iter()
            .map(|entry| EnvOverride::parse(entry))
            .collect::<Result<Vec<_>>>()?;
        let command = self.gen_command()?;

        let volumes = self.gen_volumes();
        let ports = gen_ports(port);
        let environment = self.gen_environment(&overrides);
        let devices = self.gen_devices();
        let deploy = self.gen_gpu_deployment();

        let content = format!(
            "\
# Save this output to a '{file}' file and run 'docker compose up'.
#
# Created with ramalama-{version}

services:
  {model_name}:
    container_name: {name}
    image: {image}
{volumes}
{ports}
{environment}
{devices}
{deploy}
{command}
    restart: {restart}
",
            file = crate::domain::model::MANIFEST_FILE_NAME,
            version = self.host.version(),
            model_name = self.config.model_name(),
            name = self.container_name(),
            image = self.config.image(),
            restart = RESTART_POLICY,
        );

        let manifest = GeneratedManifest::new(strip_blank_lines(&content));
        tracing::info!("Generating Docker Compose file: {}", manifest.name);
        Ok(manifest)
    }

    fn gen_volumes(&self) -> String {
        let model = self.config.model_paths();
        let mut volumes = String::from("    volumes:");
        volumes.push_str(&bind_mount(&model.source, &model.destination));

        if let Some(source) = self.config.rag_source() {
            volumes.push_str(&self.gen_rag_volume(source));
        }

        for paths in [self.config.chat_template_paths(), self.config.mmproj_paths()]
            .into_iter()
            .flatten()
        {
            if self.host.path_exists(Path::new(&paths.source)) {
                volumes.push_str(&bind_mount(&paths.source, &paths.destination));
            } else {
                tracing::debug!("Skipping mount for missing host path {}", paths.source);
            }
        }

        volumes
    }

    fn gen_rag_volume(&self, source: &str) -> String {
        match RagSource::parse(source) {
            RagSource::Image(reference) => format!(
                "
      - type: image
        source: {reference}
        target: {RAG_DIR}
        image:
          readonly: true"
            ),
            RagSource::HostPath(path) if self.host.path_exists(Path::new(path)) => {
                bind_mount(path, RAG_DIR)
            }
            RagSource::HostPath(path) => {
                tracing::debug!("RAG source {} is neither an OCI image nor an existing path", path);
                String::new()
            }
        }
    }

    fn gen_devices(&self) -> String {
        let present: Vec<&str> = DEVICE_PATHS
            .iter()
            .copied()
            .filter(|dev| self.host.path_exists(Path::new(dev)))
            .collect();

        if present.is_empty() {
            return String::new();
        }

        let mut devices = String::from("    devices:");
        for dev in present {
            devices.push_str(&format!("\n      - \"{dev}:{dev}\""));
        }
        devices
    }

    fn gen_environment(&self, overrides: &[EnvOverride]) -> String {
        let mut env_vars = self.host.accelerator_env_vars();
        for EnvOverride { key, value } in overrides {
            match env_vars.iter_mut().find(|(existing, _)| existing == key) {
                Some(entry) => entry.1 = value.clone(),
                None => env_vars.push((key.clone(), value.clone())),
            }
        }

        if env_vars.is_empty() {
            return String::new();
        }

        let mut environment = String::from("    environment:");
        for (key, value) in &env_vars {
            environment.push_str(&format!("\n      - {key}={value}"));
        }
        environment
    }

    /// Reserves NVIDIA GPUs when the image name mentions `cuda`.
    ///
    /// This only looks at the image reference, so it is approximate: a CUDA
    /// image without `cuda` in its name gets no reservation, and an unrelated
    /// image whose tag happens to contain it does.
    fn gen_gpu_deployment(&self) -> String {
        if !self.config.image().contains("cuda") {
            return String::new();
        }

        "    deploy:
      resources:
        reservations:
          devices:
            - driver: nvidia
              count: all
              capabilities: [gpu]"
            .to_string()
    }

    fn gen_command(&self) -> Result<String> {
        let args = self.config.exec_args();
        if args.is_empty() {
            return Ok(String::new());
        }

        let command = shlex::try_join(args.iter().map(String::as_str)).map_err(|e| {
            ComposeError::InvalidConfigValueError {
                field: "exec_args".to_string(),
                value: args.join(" "),
                reason: e.to_string(),
            }
        })?;
        Ok(format!("    command: {command}"))
    }
}

fn gen_ports(port: PortMapping) -> String {
    format!("    ports:\n      - \"{}:{}\"", port.host, port.container)
}

fn bind_mount(source: &str, destination: &str) -> String {
    format!("\n      - \"{source}:{destination}:ro\"")
}

fn strip_blank_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
