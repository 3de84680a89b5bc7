use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A model published on the Hub, e.g. "meta-llama/Llama-3.1-8B-Instruct".
///
/// Immutable snapshot of the `/models/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// `org/name` identifier. Case-sensitive.
    pub repo_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub license: String,

    /// "organization" or "user".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_type: Option<String>,

    /// Parameter count.
    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub has_system_prompt: bool,

    #[serde(default)]
    pub is_multimodal: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Platform SKU -> deployable configurations, in upstream order.
    #[serde(default)]
    pub configs_deploy: BTreeMap<String, Vec<DeployConfig>>,
}

impl Model {
    pub fn id(&self) -> &str {
        &self.repo_name
    }
}

/// One deployable configuration of a model on a platform.
///
/// Only meaningful together with the (model, platform) key it was listed
/// under. Fields the client does not know about are kept in `extra` and
/// written back out unchanged.
///
/// Token limits are `None` when absent and `Some(None)` when the Hub sent an
/// explicit `null`, so both forms survive re-serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployConfig {
    pub num_gpus: u32,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub max_input_tokens: Option<Option<u64>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub max_total_tokens: Option<Option<u64>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub max_batch_prefill_tokens: Option<Option<u64>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeployConfig {
    pub fn new(num_gpus: u32) -> Self {
        Self {
            num_gpus,
            max_input_tokens: None,
            max_total_tokens: None,
            max_batch_prefill_tokens: None,
            extra: Map::new(),
        }
    }

    pub fn max_input_tokens(&self) -> Option<u64> {
        self.max_input_tokens.flatten()
    }

    pub fn max_total_tokens(&self) -> Option<u64> {
        self.max_total_tokens.flatten()
    }

    pub fn max_batch_prefill_tokens(&self) -> Option<u64> {
        self.max_batch_prefill_tokens.flatten()
    }

    /// Look up an extra string field, e.g. a container image override.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Present keys, including `null`, deserialize to `Some`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        serde_json::json!({
            "repoName": "dell/llama2-7b",
            "description": "7B parameter Llama 2 model",
            "license": "llama2",
            "creatorType": "organization",
            "size": 7000000000u64,
            "hasSystemPrompt": true,
            "isMultimodal": false,
            "status": "active",
            "configsDeploy": {
                "dell-xe9640": [
                    {
                        "max_batch_prefill_tokens": 2048,
                        "max_input_tokens": 4096,
                        "max_total_tokens": 4096,
                        "num_gpus": 1
                    }
                ]
            }
        })
    }

    #[test]
    fn test_model_from_hub_json() {
        let model: Model = serde_json::from_value(sample()).unwrap();
        assert_eq!(model.id(), "dell/llama2-7b");
        assert_eq!(model.size, 7_000_000_000);
        assert!(model.has_system_prompt);
        assert!(!model.is_multimodal);
        let configs = &model.configs_deploy["dell-xe9640"];
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].num_gpus, 1);
        assert_eq!(configs[0].max_batch_prefill_tokens(), Some(2048));
        assert!(configs[0].extra.is_empty());
    }

    #[test]
    fn test_model_rejects_non_numeric_size() {
        let mut raw = sample();
        raw["size"] = Value::String("not a number".into());
        assert!(serde_json::from_value::<Model>(raw).is_err());
    }

    #[test]
    fn test_deploy_config_rejects_non_numeric_gpus() {
        let raw = serde_json::json!({ "num_gpus": "not a number" });
        assert!(serde_json::from_value::<DeployConfig>(raw).is_err());
    }

    #[test]
    fn test_deploy_config_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "num_gpus": 4,
            "max_input_tokens": 2048,
            "quantization": "awq",
            "tensor_parallel": { "degree": 4 }
        });
        let config: DeployConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(config.extra_str("quantization"), Some("awq"));
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn test_deploy_config_keeps_explicit_null_limits() {
        let raw = serde_json::json!({
            "num_gpus": 4,
            "max_input_tokens": null,
            "quant": "awq"
        });
        let config: DeployConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(config.max_input_tokens, Some(None));
        assert_eq!(config.max_input_tokens(), None);
        assert_eq!(config.max_total_tokens, None);
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }
}
