use ramalama_compose::core::HostEnvironment;
use ramalama_compose::{ComposeGenerator, LocalStorage, MountPaths, ServingConfig, TomlConfig};
use std::path::Path;
use tempfile::TempDir;

/// Real filesystem probes, no device nodes and no accelerator variables.
struct TempHost;

impl HostEnvironment for TempHost {
    fn accelerator_env_vars(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn path_exists(&self, path: &Path) -> bool {
        !path.starts_with("/dev") && path.exists()
    }

    fn generate_service_name(&self, model_name: &str) -> String {
        format!("ramalama-{}", model_name)
    }

    fn version(&self) -> String {
        "1.2.3".to_string()
    }
}

fn model_config(dir: &TempDir) -> ServingConfig {
    let model = dir.path().join("granite.gguf");
    std::fs::write(&model, b"GGUF").unwrap();
    ServingConfig::new(
        "granite",
        MountPaths::new(model.to_str().unwrap(), "/mnt/models/model.file"),
        "quay.io/ramalama/ramalama:latest",
    )
}

#[test]
fn test_model_only_manifest_has_single_volume() {
    let dir = TempDir::new().unwrap();
    let config = model_config(&dir);

    let manifest = ComposeGenerator::new(&config, &TempHost).generate().unwrap();

    assert_eq!(manifest.name, "docker-compose.yaml");
    assert_eq!(manifest.content.matches(":ro\"").count(), 1);
    for section in ["devices:", "deploy:", "environment:", "command:"] {
        assert!(!manifest.content.contains(section), "unexpected {}", section);
    }
    assert!(manifest.content.contains("# Created with ramalama-1.2.3"));
    assert!(manifest.content.ends_with("    restart: unless-stopped"));
}

#[test]
fn test_full_manifest_is_deterministic_and_has_no_blank_lines() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("chat.jinja");
    std::fs::write(&template, "{{ messages }}").unwrap();
    let corpus = dir.path().join("corpus");
    std::fs::create_dir(&corpus).unwrap();

    let config = model_config(&dir)
        .with_chat_template(MountPaths::new(
            template.to_str().unwrap(),
            "/mnt/models/chat_template",
        ))
        .with_mmproj(MountPaths::new(
            dir.path().join("missing-mmproj.gguf").to_str().unwrap(),
            "/mnt/models/mmproj.file",
        ))
        .with_rag_source(corpus.to_str().unwrap())
        .with_port("9090:8080")
        .with_env("LLAMA_ARG_THREADS=8")
        .with_exec_args(["llama-server", "--model", "/mnt/models/model.file"]);

    let first = ComposeGenerator::new(&config, &TempHost).generate().unwrap();
    let second = ComposeGenerator::new(&config, &TempHost).generate().unwrap();
    assert_eq!(first, second);

    let content = &first.content;
    assert!(content.lines().all(|line| !line.trim().is_empty()));
    assert_eq!(content.matches(":ro\"").count(), 3);
    assert!(content.contains(&format!("      - \"{}:/rag:ro\"", corpus.display())));
    assert!(!content.contains("mmproj"));
    assert!(content.contains("      - \"9090:8080\""));
    assert!(content.contains("      - LLAMA_ARG_THREADS=8"));
    assert!(content.contains("    command: llama-server --model /mnt/models/model.file"));

    let order: Vec<usize> = ["volumes:", "ports:", "environment:", "command:", "restart:"]
        .iter()
        .map(|section| content.find(section).unwrap())
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_missing_rag_path_emits_no_corpus_mount() {
    let dir = TempDir::new().unwrap();
    let config = model_config(&dir).with_rag_source(dir.path().join("nope").to_str().unwrap());

    let manifest = ComposeGenerator::new(&config, &TempHost).generate().unwrap();
    assert!(!manifest.content.contains("/rag"));
}

#[tokio::test]
async fn test_toml_config_to_saved_manifest() {
    let dir = TempDir::new().unwrap();
    let toml_content = r#"
[model]
name = "tinyllama"
source = "oci:///models/tinyllama"

[container]
image = "quay.io/ramalama/cuda:latest"
name = "llm"

[serve]
rag = "oci:quay.io/org/corpus:v1"
command = ["llama-server", "--alias", "tiny llama"]
"#;

    let config = TomlConfig::from_toml_str(toml_content)
        .unwrap()
        .into_serving_config();
    let manifest = ComposeGenerator::new(&config, &TempHost).generate().unwrap();

    assert!(manifest.content.contains("    container_name: llm"));
    assert!(manifest.content.contains("      - \"/models/tinyllama:/mnt/models/model.file:ro\""));
    assert!(manifest.content.contains("        source: quay.io/org/corpus:v1"));
    assert!(manifest.content.contains("              count: all"));

    let command = manifest
        .content
        .lines()
        .find_map(|line| line.strip_prefix("    command: "))
        .unwrap();
    assert_eq!(
        shlex::split(command).unwrap(),
        vec!["llama-server", "--alias", "tiny llama"]
    );

    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    let saved = storage.save_manifest(&manifest).await.unwrap();
    let written = std::fs::read_to_string(saved).unwrap();
    assert_eq!(written, manifest.content);
}
