//! Typed JSON-schema descriptors for structured completions.
//!
//! Each response type declares its own schema next to its definition, so the
//! request format and the deserialisation target can never drift apart.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

/// A response type the model can be constrained to.
pub trait StructuredOutput: DeserializeOwned {
    /// Schema name sent with the request.
    const SCHEMA_NAME: &'static str;

    fn json_schema() -> Value;

    /// Post-processing applied after a successful parse.
    fn sanitize(self) -> Self;
}

/// Shape of a single schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
    NonNegativeNumber,
}

impl FieldKind {
    fn schema(self) -> Value {
        match self {
            FieldKind::Text => json!({ "type": "string" }),
            FieldKind::TextList => json!({ "type": "array", "items": { "type": "string" } }),
            FieldKind::NonNegativeNumber => json!({ "type": "number", "minimum": 0 }),
        }
    }
}

/// Closed object schema: every field is required and nothing else is allowed,
/// as strict mode demands.
pub fn object_schema(fields: &[(&str, FieldKind)]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|(name, kind)| (name.to_string(), kind.schema()))
        .collect();
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_schema_requires_every_field() {
        let schema = object_schema(&[
            ("summary", FieldKind::Text),
            ("skills", FieldKind::TextList),
            ("years", FieldKind::NonNegativeNumber),
        ]);
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], json!(["summary", "skills", "years"]));
        assert_eq!(schema["properties"]["skills"]["items"]["type"], "string");
        assert_eq!(schema["properties"]["years"]["minimum"], 0);
    }
}
