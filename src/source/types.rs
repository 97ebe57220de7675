//! Wire types served by the record source
//!
//! These mirror the JSON bodies of `/iterations/meta` and `/iteration/{idx}`.
//! Unknown fields are ignored so the service can grow its records without
//! breaking the viewer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection metadata from `/iterations/meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationMeta {
    /// Number of iterations in the collection, equal to the number of pages
    pub total_pages: u32,
}

/// Identifier of an iteration
///
/// The service is free to use numeric or string ids; both render the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IterationId {
    /// Numeric id, e.g. `17`
    Number(i64),
    /// String id, e.g. `"iter-17"`
    Text(String),
}

impl fmt::Display for IterationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for IterationId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for IterationId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Prompt and completion token counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    /// Tokens sent to the model
    #[serde(rename = "in", default)]
    pub input: u64,
    /// Tokens generated by the model
    #[serde(rename = "out", default)]
    pub output: u64,
}

/// One record of the collection, as displayed on a single page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    /// Record identifier
    pub id: IterationId,
    /// Prompt that produced this iteration
    #[serde(default)]
    pub prompt: String,
    /// Token usage for the iteration
    #[serde(default)]
    pub tokens: TokenCounts,
    /// Generated text
    pub text: String,
    /// Dollar cost of the call, when the producer recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Wall-clock runtime of the call, when the producer recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_runtime_seconds: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_deserialize() {
        let meta: IterationMeta = serde_json::from_str(r#"{"total_pages": 42}"#).unwrap();
        assert_eq!(meta.total_pages, 42);
    }

    #[test]
    fn test_meta_rejects_negative_count() {
        assert!(serde_json::from_str::<IterationMeta>(r#"{"total_pages": -1}"#).is_err());
    }

    #[test]
    fn test_iteration_deserialize_full_record() {
        let json = r#"{
            "id": 3,
            "prompt": "What are 3 overlooked ways to get rich in tech?",
            "tokens": {"in": 812, "out": 344},
            "text": "1. Developer tooling...",
            "cost": 0.00042,
            "total_runtime_seconds": 2.5,
            "summary": "ignored by the viewer"
        }"#;
        let it: Iteration = serde_json::from_str(json).unwrap();
        assert_eq!(it.id, IterationId::Number(3));
        assert_eq!(it.tokens.input, 812);
        assert_eq!(it.tokens.output, 344);
        assert_eq!(it.cost, Some(0.00042));
        assert_eq!(it.total_runtime_seconds, Some(2.5));
    }

    #[test]
    fn test_iteration_optional_fields_absent() {
        let json = r#"{"id": "iter-9", "prompt": "p", "tokens": {"in": 1, "out": 2}, "text": "t"}"#;
        let it: Iteration = serde_json::from_str(json).unwrap();
        assert_eq!(it.id.to_string(), "iter-9");
        assert!(it.cost.is_none());
        assert!(it.total_runtime_seconds.is_none());
    }

    #[test]
    fn test_iteration_null_cost_is_absent() {
        let json = r#"{"id": 1, "text": "t", "cost": null}"#;
        let it: Iteration = serde_json::from_str(json).unwrap();
        assert!(it.cost.is_none());
        assert_eq!(it.tokens, TokenCounts::default());
    }

    #[test]
    fn test_iteration_missing_text_is_error() {
        assert!(serde_json::from_str::<Iteration>(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn test_token_counts_serialize_with_wire_names() {
        let value = serde_json::to_value(TokenCounts {
            input: 5,
            output: 7,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"in": 5, "out": 7}));
    }
}
