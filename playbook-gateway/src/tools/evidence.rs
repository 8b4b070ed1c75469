//! Shared JSON shape of the evidence-returning tools.

use playbook_knowledge::Presentation;
use serde_json::{Map, Value, json};

pub(crate) const EXPERT_MANUAL: &str = "expert_manual";

/// `{<label_key>, use_case, sections, evidence_level}` when something was
/// found, `{<label_key>, sections: [], message}` otherwise.
pub(crate) fn evidence_output(
    label_key: &str,
    use_case: &str,
    presentation: Presentation,
) -> Result<Value, String> {
    let mut output = Map::new();
    output.insert(label_key.to_string(), Value::String(presentation.label));

    if presentation.sections.is_empty() {
        output.insert("sections".to_string(), json!([]));
        output.insert(
            "message".to_string(),
            Value::String(presentation.message.unwrap_or_default()),
        );
    } else {
        let sections = serde_json::to_value(&presentation.sections).map_err(|e| e.to_string())?;
        output.insert("use_case".to_string(), Value::String(use_case.to_string()));
        output.insert("sections".to_string(), sections);
        output.insert(
            "evidence_level".to_string(),
            Value::String(EXPERT_MANUAL.to_string()),
        );
    }

    Ok(Value::Object(output))
}

pub(crate) fn render(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}
