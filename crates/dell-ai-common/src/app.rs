use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A deployable application (Helm chart) listed on the Hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub license: String,

    #[serde(default, alias = "docsUrl", skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Model ids, in the Hub's order of preference.
    #[serde(default)]
    pub recommended_models: Vec<String>,

    #[serde(default)]
    pub components: Vec<AppComponent>,
}

impl App {
    /// What the app declares at `path`, across all components.
    pub fn find_declared(&self, path: &str) -> Option<Declared<'_>> {
        find_declared(&self.components, path)
    }
}

/// A value declared at a helm path: a config parameter or a secret.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Declared<'a> {
    Param(&'a AppConfigParam),
    Secret(&'a AppConfigSecret),
}

impl<'a> Declared<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Param(p) => &p.name,
            Self::Secret(s) => &s.name,
        }
    }

    pub fn param_type(&self) -> &'a ParamType {
        match self {
            Self::Param(p) => &p.param_type,
            Self::Secret(s) => &s.param_type,
        }
    }

    /// Allowed values for enum parameters; secrets never restrict.
    pub fn options(&self) -> &'a [Value] {
        match self {
            Self::Param(p) => &p.options,
            Self::Secret(_) => &[],
        }
    }
}

/// Find the parameter or secret injected at `path`. Parameters are searched
/// before secrets.
pub fn find_declared<'a>(components: &'a [AppComponent], path: &str) -> Option<Declared<'a>> {
    let param = components
        .iter()
        .flat_map(|c| c.config.iter())
        .find(|p| p.helm_path == path)
        .map(Declared::Param);
    param.or_else(|| {
        components
            .iter()
            .flat_map(|c| c.secrets.iter())
            .find(|s| s.helm_path == path)
            .map(Declared::Secret)
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppComponent {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub config: Vec<AppConfigParam>,

    #[serde(default)]
    pub secrets: Vec<AppConfigSecret>,
}

/// One configurable value of an app component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigParam {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type")]
    pub param_type: ParamType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Allowed values when `param_type` is [`ParamType::Enum`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,

    /// Dotted location of this value in the chart's values, e.g. "main.config.modelId".
    pub helm_path: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigSecret {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "secret_type", rename = "type")]
    pub param_type: ParamType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    pub helm_path: String,
}

fn secret_type() -> ParamType {
    ParamType::String
}

/// Declared type of an app parameter.
///
/// Tags the client does not know are kept verbatim in `Other` and are not
/// validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Enum,
    Other(String),
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Other(tag) => tag,
        }
    }

    /// Whether `value` has the JSON shape this type requires.
    /// `Other` accepts anything.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String | Self::Enum => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Other(_) => true,
        }
    }

    /// Best guess for a value whose path no component declares.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            _ => Self::String,
        }
    }
}

impl From<String> for ParamType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "enum" | "enumeration" => Self::Enum,
            _ => Self::Other(tag),
        }
    }
}

impl From<ParamType> for String {
    fn from(t: ParamType) -> Self {
        match t {
            ParamType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A caller-supplied override for an app parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserConfigEntry {
    pub path: String,

    #[serde(rename = "type")]
    pub param_type: ParamType,

    pub value: Value,
}

impl UserConfigEntry {
    pub fn new(path: impl Into<String>, param_type: ParamType, value: Value) -> Self {
        Self {
            path: path.into(),
            param_type,
            value,
        }
    }
}
