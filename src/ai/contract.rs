//! Response Contracts
//!
//! A [`ResponseContract`] describes the JSON object the endpoint is asked to
//! produce: an ordered set of named fields, each either a string or a list of
//! strings, one of which is the designated answer text.
//!
//! The contract renders to the endpoint's response schema and validates a
//! parsed answer explicitly. A syntactically valid JSON value with the wrong
//! shape is rejected just like unparseable text.
//!
//! Validation rules:
//! - the answer must be a JSON object
//! - every `Text` field must be present and a string
//! - `TextList` fields may be absent or `null` (read as empty) but, when
//!   present, must be an array of strings
//! - fields not named by the contract are ignored

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use thiserror::Error;

use super::validation::strip_code_fences;

/// Shape of one contract field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single string
    Text,
    /// An array of strings
    TextList,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Text => write!(f, "string"),
            FieldKind::TextList => write!(f, "array of strings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ContractField {
    name: String,
    kind: FieldKind,
    description: Option<String>,
}

/// Expected shape of a structured answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseContract {
    fields: Vec<ContractField>,
    text_field: String,
}

impl ResponseContract {
    /// Create a contract whose answer text lives in `name`
    pub fn with_text_field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            fields: vec![ContractField {
                name: name.clone(),
                kind: FieldKind::Text,
                description: None,
            }],
            text_field: name,
        }
    }

    /// Add a string field
    pub fn text_field(self, name: impl Into<String>) -> Self {
        self.field(name.into(), FieldKind::Text)
    }

    /// Add a list-of-strings field
    pub fn list_field(self, name: impl Into<String>) -> Self {
        self.field(name.into(), FieldKind::TextList)
    }

    /// Attach a description that is forwarded in the schema
    pub fn describe(mut self, name: &str, description: impl Into<String>) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.description = Some(description.into());
        }
        self
    }

    fn field(mut self, name: String, kind: FieldKind) -> Self {
        // The designated text field always stays a string.
        if name == self.text_field {
            return self;
        }
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.kind = kind,
            None => self.fields.push(ContractField {
                name,
                kind,
                description: None,
            }),
        }
        self
    }

    /// Name of the field holding the answer text
    pub fn text_field_name(&self) -> &str {
        &self.text_field
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Render as the endpoint's response schema (OBJECT with ordered properties)
    pub fn to_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut property = match field.kind {
                FieldKind::Text => json!({ "type": "STRING" }),
                FieldKind::TextList => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
            };
            if let (Some(description), Some(obj)) = (&field.description, property.as_object_mut())
            {
                obj.insert("description".to_string(), json!(description));
            }
            properties.insert(field.name.clone(), property);
        }

        json!({
            "type": "OBJECT",
            "properties": properties,
            "propertyOrdering": self.field_names().collect::<Vec<_>>(),
        })
    }

    /// Parse answer text (optionally wrapped in a code fence) against the contract
    pub fn parse(&self, text: &str) -> Result<StructuredFields, ContractViolation> {
        let value: Value = serde_json::from_str(strip_code_fences(text))
            .map_err(|e| ContractViolation::InvalidJson(e.to_string()))?;
        self.validate(&value)
    }

    /// Validate an already-parsed answer
    pub fn validate(&self, value: &Value) -> Result<StructuredFields, ContractViolation> {
        let object = value.as_object().ok_or(ContractViolation::NotAnObject)?;
        let mut fields = StructuredFields::default();

        for field in &self.fields {
            let raw = object.get(&field.name).filter(|v| !v.is_null());
            let parsed = match (field.kind, raw) {
                (FieldKind::Text, Some(Value::String(s))) => FieldValue::Text(s.clone()),
                (FieldKind::Text, None) => {
                    return Err(ContractViolation::MissingField(field.name.clone()));
                }
                (FieldKind::TextList, None) => FieldValue::TextList(Vec::new()),
                (FieldKind::TextList, Some(Value::Array(items))) => {
                    let strings = items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| ContractViolation::wrong_type(field))?;
                    FieldValue::TextList(strings)
                }
                (_, Some(_)) => return Err(ContractViolation::wrong_type(field)),
            };
            fields.values.insert(field.name.clone(), parsed);
        }

        Ok(fields)
    }
}

/// Why an answer did not satisfy its contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("answer is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("answer is not a JSON object")]
    NotAnObject,

    #[error("required field '{0}' is missing")]
    MissingField(String),

    #[error("field '{field}' is not {expected}")]
    WrongType { field: String, expected: FieldKind },
}

impl ContractViolation {
    fn wrong_type(field: &ContractField) -> Self {
        ContractViolation::WrongType {
            field: field.name.clone(),
            expected: field.kind,
        }
    }
}

/// Value of one validated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
}

/// Validated contract fields, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredFields {
    values: BTreeMap<String, FieldValue>,
}

impl StructuredFields {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// String value of a `Text` field
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Items of a `TextList` field
    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name) {
            Some(FieldValue::TextList(items)) => Some(items),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation_contract() -> ResponseContract {
        ResponseContract::with_text_field("text")
            .list_field("mentionedIds")
            .describe("text", "Short conversational answer")
    }

    #[test]
    fn test_schema_shape_and_ordering() {
        let schema = recommendation_contract().to_schema();

        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["text"]["type"], "STRING");
        assert_eq!(
            schema["properties"]["text"]["description"],
            "Short conversational answer"
        );
        assert_eq!(schema["properties"]["mentionedIds"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["mentionedIds"]["items"]["type"], "STRING");
        assert_eq!(schema["propertyOrdering"], json!(["text", "mentionedIds"]));
    }

    #[test]
    fn test_text_field_cannot_be_redeclared_as_list() {
        let contract = ResponseContract::with_text_field("text").list_field("text");
        assert_eq!(contract.field_names().count(), 1);
        assert_eq!(contract.to_schema()["properties"]["text"]["type"], "STRING");
    }

    #[test]
    fn test_parse_valid_answer() {
        let fields = recommendation_contract()
            .parse(r#"{"text":"Try Bean & Co.","mentionedIds":["3","7"]}"#)
            .unwrap();

        assert_eq!(fields.text("text"), Some("Try Bean & Co."));
        assert_eq!(
            fields.list("mentionedIds"),
            Some(&["3".to_string(), "7".to_string()][..])
        );
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_parse_strips_code_fence() {
        let fields = recommendation_contract()
            .parse("```json\n{\"text\":\"ok\",\"mentionedIds\":[]}\n```")
            .unwrap();
        assert_eq!(fields.text("text"), Some("ok"));
    }

    #[test]
    fn test_missing_list_reads_as_empty() {
        let fields = recommendation_contract()
            .parse(r#"{"text":"Nothing fits.","mentionedIds":null}"#)
            .unwrap();
        assert_eq!(fields.list("mentionedIds"), Some(&[][..]));
    }

    #[test]
    fn test_rejects_plain_text() {
        let err = recommendation_contract().parse("Sorry, no data.").unwrap_err();
        assert!(matches!(err, ContractViolation::InvalidJson(_)));
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        let contract = recommendation_contract();

        assert_eq!(
            contract.parse("[1, 2]").unwrap_err(),
            ContractViolation::NotAnObject
        );
        assert_eq!(
            contract.parse(r#"{"mentionedIds":[]}"#).unwrap_err(),
            ContractViolation::MissingField("text".to_string())
        );
        assert_eq!(
            contract.parse(r#"{"text":"hi","mentionedIds":[3]}"#).unwrap_err(),
            ContractViolation::WrongType {
                field: "mentionedIds".to_string(),
                expected: FieldKind::TextList,
            }
        );
        assert!(matches!(
            contract.parse(r#"{"text":42}"#).unwrap_err(),
            ContractViolation::WrongType { .. }
        ));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let fields = recommendation_contract()
            .parse(r#"{"text":"hi","mentionedIds":[],"mood":"cozy"}"#)
            .unwrap();
        assert!(fields.get("mood").is_none());
    }
}
