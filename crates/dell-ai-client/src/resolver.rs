//! Model/platform compatibility checks and snippet rendering.
//!
//! Everything here is pure: no network, no clock, no randomness. The same
//! inputs always produce byte-identical output.

use std::collections::HashSet;

use serde_json::Value;

use dell_ai_common::{
    find_declared, AppComponent, ContainerEngine, Declared, DeployConfig, HubError, Model,
    ParamType, Result, UserConfigEntry,
};

/// Registry for the default image when a configuration does not name one.
pub const DEFAULT_REGISTRY: &str = "registry.dell.huggingface.co";
pub const HELM_REPO: &str = "dell-ai";

const IMAGE_KEYS: [&str; 2] = ["image", "container_image"];
const SERVICE_PORT: u16 = 80;

/// All configurations `model` declares for `platform_id`, in upstream order.
pub fn platform_configs<'a>(model: &'a Model, platform_id: &str) -> Result<&'a [DeployConfig]> {
    model
        .configs_deploy
        .get(platform_id)
        .map(Vec::as_slice)
        .ok_or_else(|| HubError::ModelPlatformIncompatible {
            model_id: model.id().to_string(),
            platform_id: platform_id.to_string(),
        })
}

/// Distinct GPU counts, ascending.
pub fn valid_gpu_counts(configs: &[DeployConfig]) -> Vec<u32> {
    let mut counts: Vec<u32> = configs.iter().map(|c| c.num_gpus).collect();
    counts.sort_unstable();
    counts.dedup();
    counts
}

/// Pick the first configuration for `platform_id` that needs exactly `num_gpus`.
pub fn resolve_config<'a>(
    model: &'a Model,
    platform_id: &str,
    num_gpus: u32,
) -> Result<&'a DeployConfig> {
    let configs = platform_configs(model, platform_id)?;
    configs
        .iter()
        .find(|c| c.num_gpus == num_gpus)
        .ok_or_else(|| HubError::InvalidGpuCount {
            model_id: model.id().to_string(),
            platform_id: platform_id.to_string(),
            requested: num_gpus,
            valid: valid_gpu_counts(configs),
        })
}

/// Values shared by every model snippet format. Both renderers read only
/// from here, so docker and kubernetes output cannot disagree.
struct DeploymentValues<'a> {
    model_id: &'a str,
    sku_id: &'a str,
    name: String,
    image: String,
    num_gpus: u32,
    num_replicas: u32,
    env: Vec<(String, String)>,
}

impl<'a> DeploymentValues<'a> {
    fn new(model_id: &'a str, sku_id: &'a str, config: &DeployConfig, num_replicas: u32) -> Self {
        let image = IMAGE_KEYS
            .iter()
            .find_map(|k| config.extra_str(k))
            .map(str::to_string)
            .unwrap_or_else(|| default_image(model_id));

        let mut env = vec![
            ("MODEL_ID".to_string(), model_id.to_string()),
            ("NUM_SHARD".to_string(), config.num_gpus.to_string()),
        ];
        let limits = [
            ("MAX_INPUT_TOKENS", config.max_input_tokens()),
            ("MAX_TOTAL_TOKENS", config.max_total_tokens()),
            ("MAX_BATCH_PREFILL_TOKENS", config.max_batch_prefill_tokens()),
        ];
        for (key, value) in limits {
            if let Some(v) = value {
                env.push((key.to_string(), v.to_string()));
            }
        }
        for (key, value) in &config.extra {
            if IMAGE_KEYS.contains(&key.as_str()) {
                continue;
            }
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                // nested values stay in the config but have no env form
                _ => continue,
            };
            let key = env_key(key);
            if env.iter().any(|(k, _)| *k == key) {
                tracing::debug!(key = %key, "extra field shadows an existing env var, skipped");
                continue;
            }
            env.push((key, rendered));
        }

        Self {
            model_id,
            sku_id,
            name: resource_name(model_id),
            image,
            num_gpus: config.num_gpus,
            num_replicas,
            env,
        }
    }
}

/// Render a deployment snippet for an already-resolved configuration.
pub fn render_model_snippet(
    model_id: &str,
    sku_id: &str,
    config: &DeployConfig,
    engine: ContainerEngine,
    num_replicas: u32,
) -> Result<String> {
    if num_replicas == 0 {
        return Err(HubError::Validation(
            "number of replicas must be a positive integer".to_string(),
        ));
    }
    let values = DeploymentValues::new(model_id, sku_id, config, num_replicas);
    Ok(match engine {
        ContainerEngine::Docker => render_docker(&values),
        ContainerEngine::Kubernetes => render_kubernetes(&values),
    })
}

fn render_docker(v: &DeploymentValues<'_>) -> String {
    let mut parts: Vec<String> = vec![
        "docker run -d".to_string(),
        format!("--name {}", v.name),
        format!("--gpus {}", v.num_gpus),
        "--shm-size 1g".to_string(),
        format!("-p {SERVICE_PORT}:{SERVICE_PORT}"),
        format!("--label {}", shell_quote(&format!("dell-ai.sku={}", v.sku_id))),
        format!("--label dell-ai.replicas={}", v.num_replicas),
    ];
    for (key, value) in &v.env {
        parts.push(format!("-e {}", shell_quote(&format!("{key}={value}"))));
    }
    parts.push(shell_quote(&v.image));
    parts.join(" ")
}

fn render_kubernetes(v: &DeploymentValues<'_>) -> String {
    let mut env = String::new();
    for (key, value) in &v.env {
        env.push_str(&format!(
            "        - name: {key}\n          value: {}\n",
            yaml_str(value)
        ));
    }

    format!(
        "apiVersion: apps/v1
kind: Deployment
metadata:
  name: {name}
  labels:
    app: {name}
  annotations:
    dell-ai/model: {model}
    dell-ai/sku: {sku}
spec:
  replicas: {replicas}
  selector:
    matchLabels:
      app: {name}
  template:
    metadata:
      labels:
        app: {name}
    spec:
      containers:
      - name: {name}
        image: {image}
        ports:
        - containerPort: {port}
        env:
{env}        resources:
          limits:
            nvidia.com/gpu: {gpus}
        volumeMounts:
        - name: dshm
          mountPath: /dev/shm
      volumes:
      - name: dshm
        emptyDir:
          medium: Memory
          sizeLimit: 1Gi
---
apiVersion: v1
kind: Service
metadata:
  name: {name}
spec:
  selector:
    app: {name}
  ports:
  - port: {port}
    targetPort: {port}
",
        name = v.name,
        model = yaml_str(v.model_id),
        sku = yaml_str(v.sku_id),
        replicas = v.num_replicas,
        image = yaml_str(&v.image),
        port = SERVICE_PORT,
        env = env,
        gpus = v.num_gpus,
    )
}

/// Validate `user_config` against the app's declared parameters and secrets
/// and render a `helm install` command with one override per line.
///
/// Paths no component declares are passed through untouched.
pub fn render_app_snippet(
    app_id: &str,
    components: &[AppComponent],
    user_config: &[UserConfigEntry],
) -> Result<String> {
    for entry in user_config {
        match find_declared(components, &entry.path) {
            Some(declared) => check_entry(declared, entry)?,
            None => {
                tracing::debug!(path = %entry.path, "override for undeclared path passed through")
            }
        }
    }

    let supplied: HashSet<&str> = user_config.iter().map(|e| e.path.as_str()).collect();
    for component in components.iter().filter(|c| c.required) {
        for param in component.config.iter().filter(|p| p.required) {
            if param.default.is_none() && !supplied.contains(param.helm_path.as_str()) {
                return Err(HubError::MissingRequiredConfig {
                    component: component.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }
        for secret in component.secrets.iter().filter(|s| s.required) {
            if !supplied.contains(secret.helm_path.as_str()) {
                return Err(HubError::MissingRequiredConfig {
                    component: component.name.clone(),
                    parameter: secret.name.clone(),
                });
            }
        }
    }

    let mut out = format!("helm install {app_id} {HELM_REPO}/{app_id}");
    for entry in user_config {
        let path = &entry.path;
        let flag = match &entry.value {
            Value::String(s) => {
                format!("--set-string {}", shell_quote(&format!("{path}={}", helm_escape(s))))
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {
                let text = entry.value.to_string();
                format!("--set {}", shell_quote(&format!("{path}={}", helm_escape(&text))))
            }
            other => format!("--set-json {}", shell_quote(&format!("{path}={other}"))),
        };
        out.push_str(" \\\n  ");
        out.push_str(&flag);
    }
    Ok(out)
}

fn check_entry(declared: Declared<'_>, entry: &UserConfigEntry) -> Result<()> {
    let expected = declared.param_type();
    if let ParamType::Other(tag) = expected {
        tracing::warn!(
            path = %entry.path,
            param_type = %tag,
            "unknown parameter type, value not validated"
        );
        return Ok(());
    }
    if &entry.param_type != expected || !expected.accepts(&entry.value) {
        return Err(HubError::InvalidConfigValue {
            path: entry.path.clone(),
            expected: expected.to_string(),
        });
    }
    let options = declared.options();
    if *expected == ParamType::Enum && !options.is_empty() && !options.contains(&entry.value) {
        let allowed: Vec<String> = options.iter().map(|o| o.to_string()).collect();
        return Err(HubError::InvalidConfigValue {
            path: entry.path.clone(),
            expected: format!("one of {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Escape a `--set`/`--set-string` value: helm splits pairs on unescaped commas.
fn helm_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace(',', "\\,")
}

fn default_image(model_id: &str) -> String {
    format!(
        "{DEFAULT_REGISTRY}/enterprise-dell-inference-{}",
        model_id.to_ascii_lowercase().replace('/', "-")
    )
}

/// DNS-1035 label derived from the model id, e.g. "org/Model_7B" -> "org-model-7b".
///
/// Services require a leading letter, so ids starting with a digit get an
/// "m-" prefix.
fn resource_name(model_id: &str) -> String {
    let mut name = String::with_capacity(model_id.len() + 2);
    for ch in model_id.chars() {
        if ch.is_ascii_alphanumeric() {
            name.push(ch.to_ascii_lowercase());
        } else if !name.ends_with('-') {
            name.push('-');
        }
    }
    let name = name.trim_matches('-');
    if name.is_empty() {
        return "model".to_string();
    }
    let name = if name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.to_string()
    } else {
        format!("m-{name}")
    };
    let name: String = name.chars().take(63).collect();
    name.trim_end_matches('-').to_string()
}

fn env_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Double-quoted YAML scalar; JSON string syntax is valid YAML.
fn yaml_str(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
