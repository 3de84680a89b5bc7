use serde_json::Value;

use dell_ai_common::{App, HubError, ParamType, UserConfigEntry};

/// Turn repeated `--set PATH=VALUE` flags into typed overrides.
///
/// Declared string/enum parameters and secrets take the raw text. Everything
/// else is read as JSON when it parses (`8`, `true`, `[1,2]`) and as a string
/// otherwise.
pub fn build_user_config(app: &App, sets: &[String]) -> Result<Vec<UserConfigEntry>, HubError> {
    sets.iter()
        .map(|raw| {
            let (path, text) = raw.split_once('=').ok_or_else(|| {
                HubError::Validation(format!("expected PATH=VALUE, got '{raw}'"))
            })?;
            let path = path.trim();
            if path.is_empty() {
                return Err(HubError::Validation(format!("empty path in '{raw}'")));
            }

            let declared = app.find_declared(path).map(|d| d.param_type().clone());
            let value = match declared {
                Some(ParamType::String | ParamType::Enum) => Value::String(text.to_string()),
                _ => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
            };
            let param_type = declared.unwrap_or_else(|| ParamType::infer(&value));
            Ok(UserConfigEntry::new(path, param_type, value))
        })
        .collect()
}

/// Reject zero and negative counts before anything is sent.
pub fn positive(name: &str, value: i64) -> Result<u32, HubError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            HubError::Validation(format!("{name} must be a positive integer, got {value}"))
        })
}
