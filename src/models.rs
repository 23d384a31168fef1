use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form description of a bid submitted for evaluation.
///
/// The only shape rule is that the payload is a JSON object. Strings,
/// numbers, arrays, booleans and `null` are rejected at deserialization time,
/// so a `BidData` value that exists has already passed validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidData(Map<String, Value>);

impl BidData {
    /// Looks up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for BidData {
    type Error = Value;

    /// Accepts objects, hands any other value back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// Body of `POST /api/evaluate`.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    #[serde(rename = "bidData")]
    pub bid_data: BidData,
}

/// Success envelope returned by `POST /api/evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub success: bool,
    pub score: Value,
}

impl EvaluateResponse {
    pub fn scored(score: Value) -> Self {
        Self {
            success: true,
            score,
        }
    }
}

/// Failure envelope shared by every error path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Liveness payload for `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
