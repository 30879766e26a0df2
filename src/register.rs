//! Provider and definition registration for Switchyard.
//!
//! Definitions come from an explicit list compiled into the binary plus any
//! JSON catalogs named in the configuration or on the command line.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};

use switchyard_config::Config;
use switchyard_core::Registry;
use switchyard_protocols::{
    ActionDefinition, Condition, ConditionSet, Definition, DispatchError, GenerationProvider,
    JobHandle, LocalAction, ModelDefinition, ProviderError, Route, RunOptions, SkillDefinition,
    StatusReport, Step,
};

/// Name of the built-in provider.
pub(crate) const ECHO_PROVIDER: &str = "echo";

/// Provider that completes inside `submit` and returns its inputs.
pub(crate) struct EchoProvider;

#[async_trait]
impl GenerationProvider for EchoProvider {
    fn name(&self) -> &str {
        ECHO_PROVIDER
    }

    async fn submit(&self, _model_id: &str, inputs: &Value) -> Result<JobHandle, ProviderError> {
        Ok(JobHandle::immediate(inputs.clone()))
    }

    async fn get_status(&self, job_id: &str) -> Result<StatusReport, ProviderError> {
        Err(ProviderError::JobNotFound(job_id.to_string()))
    }

    async fn get_result(&self, job_id: &str) -> Result<Value, ProviderError> {
        Err(ProviderError::JobNotFound(job_id.to_string()))
    }
}

/// Writes `text` to `<output_dir>/<filename>` and reports the path.
struct SaveTextAction;

#[async_trait]
impl LocalAction for SaveTextAction {
    async fn execute(&self, inputs: Value, options: &RunOptions) -> Result<Value, DispatchError> {
        let fail = |message: String| DispatchError::Action {
            name: "save-text".to_string(),
            message,
        };

        let text = inputs["text"]
            .as_str()
            .ok_or_else(|| fail("text must be a string".to_string()))?;
        let filename = inputs["filename"].as_str().unwrap_or("output.txt");
        if !is_contained(Path::new(filename)) {
            return Err(fail(format!(
                "filename must be a relative path inside the output directory: {}",
                filename
            )));
        }
        let dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| fail(format!("cannot create {}: {}", dir.display(), e)))?;
        let path = dir.join(filename);
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| fail(format!("cannot write {}: {}", path.display(), e)))?;

        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(json!({ "path": path.display().to_string(), "bytes": text.len() }))
    }
}

/// True for a non-empty relative path with no `..` or root components.
fn is_contained(path: &Path) -> bool {
    path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

fn text_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "text": { "type": "string" } },
        "required": ["text"]
    })
}

/// Definitions shipped with the binary.
pub(crate) fn builtin_definitions() -> Vec<Definition> {
    vec![
        ModelDefinition::new("echo", ECHO_PROVIDER)
            .with_description("Return the inputs unchanged")
            .with_types("text", "text")
            .into(),
        ActionDefinition::new("uppercase")
            .with_description("Uppercase the text input")
            .with_input_schema(text_schema())
            .with_types("text", "text")
            .with_execute_fn(|inputs: Value| {
                let text = inputs["text"].as_str().ok_or("text must be a string")?;
                Ok(json!({ "text": text.to_uppercase() }))
            })
            .into(),
        ActionDefinition::new("save-text")
            .with_description("Write text to a file in the output directory")
            .with_input_schema(text_schema())
            .with_types("text", "file")
            .with_execute(Arc::new(SaveTextAction))
            .into(),
        ActionDefinition::new("say")
            .with_description("Echo text, shouting when loud is set")
            .with_input_schema(text_schema())
            .with_types("text", "text")
            .with_route(
                Route::new("uppercase")
                    .when(ConditionSet::new().with("loud", Condition::Eq(json!(true))))
                    .with_priority(10),
            )
            .with_route(Route::new("echo"))
            .into(),
        SkillDefinition::new("shout-and-save")
            .with_description("Uppercase text and save it to a file")
            .with_input_schema(text_schema())
            .with_types("text", "file")
            .with_step(Step::new("shout", "uppercase").with_input("text", json!("$inputs.text")))
            .with_step(
                Step::new("save", "save-text")
                    .with_input("text", json!("$shout.text"))
                    .with_input("filename", json!("$inputs.filename")),
            )
            .into(),
    ]
}

/// Read a JSON array of definitions.
pub(crate) fn load_catalog(path: &Path) -> anyhow::Result<Vec<Definition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let definitions: Vec<Definition> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid catalog {}", path.display()))?;
    Ok(definitions)
}

/// Register the built-in provider, the built-in definitions and every catalog.
pub(crate) fn register_all(
    registry: &Registry,
    config: &Config,
    extra_catalogs: &[PathBuf],
) -> anyhow::Result<()> {
    registry.register_provider(Arc::new(EchoProvider));

    let count = registry.register_all(builtin_definitions())?;
    debug!("Registered {} built-in definitions", count);

    for path in config.registry.catalogs.iter().chain(extra_catalogs) {
        let definitions = load_catalog(path)?;
        let count = registry
            .register_all(definitions)
            .with_context(|| format!("Failed to register catalog {}", path.display()))?;
        info!("Registered {} definitions from {}", count, path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use switchyard_protocols::DefinitionKind;
    use switchyard_runtime::Executor;
    use tempfile::NamedTempFile;

    fn registry() -> Arc<Registry> {
        let registry = Arc::new(Registry::new());
        register_all(&registry, &Config::default(), &[]).unwrap();
        registry
    }

    #[test]
    fn test_builtins_register() {
        let registry = registry();
        assert_eq!(registry.len(), builtin_definitions().len());
        assert_eq!(registry.provider_names(), vec![ECHO_PROVIDER]);
        assert!(registry.get(DefinitionKind::Skill, "shout-and-save").is_some());
    }

    #[test]
    fn test_load_catalog() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"kind": "model", "name": "flux", "default_provider": "echo"}},
                {{"kind": "action", "name": "loud-echo",
                  "routes": [{{"target": "uppercase", "when": {{"loud": true}}}}]}}
            ]"#
        )
        .unwrap();

        let definitions = load_catalog(file.path()).unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[1].kind(), DefinitionKind::Action);

        let registry = Arc::new(Registry::new());
        register_all(&registry, &Config::default(), &[file.path().to_path_buf()]).unwrap();
        assert!(registry.contains("flux"));
    }

    #[test]
    fn test_missing_catalog_fails() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }

    #[tokio::test]
    async fn test_echo_model_completes_immediately() {
        let executor = Executor::new(registry());
        let result = executor
            .run("echo", json!({"text": "hi"}), &RunOptions::default())
            .await
            .unwrap();
        assert_eq!(result.output, json!({"text": "hi"}));
        assert_eq!(result.provider, ECHO_PROVIDER);
        assert!(result.job_id.is_some());
    }

    #[tokio::test]
    async fn test_say_routes_on_loud() {
        let executor = Executor::new(registry());
        let quiet = executor
            .run("say", json!({"text": "hi"}), &RunOptions::default())
            .await
            .unwrap();
        let loud = executor
            .run("say", json!({"text": "hi", "loud": true}), &RunOptions::default())
            .await
            .unwrap();
        assert_eq!(quiet.output["text"], json!("hi"));
        assert_eq!(loud.output, json!({"text": "HI"}));
    }

    #[tokio::test]
    async fn test_shout_and_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::new(registry());
        let options = RunOptions::new().with_output_dir(dir.path());

        let result = executor
            .run("shout-and-save", json!({"text": "hi", "filename": "out.txt"}), &options)
            .await
            .unwrap();

        assert_eq!(result.output["bytes"], json!(2));
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "HI");
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained(Path::new("out.txt")));
        assert!(is_contained(Path::new("nested/out.txt")));
        assert!(!is_contained(Path::new("")));
        assert!(!is_contained(Path::new("../out.txt")));
        assert!(!is_contained(Path::new("nested/../../out.txt")));
        assert!(!is_contained(Path::new("/tmp/out.txt")));
    }

    #[tokio::test]
    async fn test_save_text_rejects_escaping_filename() {
        let root = tempfile::tempdir().unwrap();
        let output_dir = root.path().join("out");
        let options = RunOptions::new().with_output_dir(&output_dir);

        for filename in ["../escaped.txt", "/tmp/escaped.txt"] {
            let err = SaveTextAction
                .execute(json!({"text": "hi", "filename": filename}), &options)
                .await
                .unwrap_err();
            assert!(err.to_string().contains("relative path"));
        }
        assert!(!root.path().join("escaped.txt").exists());
        assert!(!output_dir.exists());
    }
}
