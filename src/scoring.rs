use crate::circuit_breaker::{create_scoring_circuit_breaker, ScoringCircuitBreaker};
use crate::models::BidData;
use async_trait::async_trait;
use failsafe::futures::CircuitBreaker;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Ways a scoring call can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// The scorer refused the bid itself (bad shape, missing fields).
    InvalidBid(String),
    /// The scorer accepted the bid but failed while computing the score.
    Failed(String),
    /// The scorer could not be reached, timed out, or the circuit is open.
    Unavailable(String),
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::InvalidBid(msg) => write!(f, "Bid rejected by scorer: {}", msg),
            ScoringError::Failed(msg) => write!(f, "Scoring failed: {}", msg),
            ScoringError::Unavailable(msg) => write!(f, "Scorer unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ScoringError {}

impl ScoringError {
    /// Whether this outcome says something about the scorer's health.
    /// A rejected bid is the caller's problem and must not open the circuit.
    pub fn is_scorer_fault(&self) -> bool {
        !matches!(self, ScoringError::InvalidBid(_))
    }
}

/// Computes an evaluation score for a bid.
///
/// Implementations are opaque: the score may be a number or any structured
/// JSON value, and the router forwards it untouched.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, bid: &BidData) -> Result<Value, ScoringError>;
}

/// Scorer backed by a remote scoring service.
///
/// The bid object is POSTed as the JSON body and the full JSON response body
/// is taken as the score.
pub struct HttpScorer {
    client: Client,
    endpoint: String,
    breaker: ScoringCircuitBreaker,
}

impl HttpScorer {
    /// Creates a new `HttpScorer`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the remote scoring endpoint.
    /// * `timeout` - Per-call timeout, covering connect and response body.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ScoringError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ScoringError::Unavailable(format!("Failed to create scoring client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint,
            breaker: create_scoring_circuit_breaker(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request_score(&self, bid: &BidData) -> Result<Value, ScoringError> {
        tracing::debug!("Requesting score from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(bid)
            .send()
            .await
            .map_err(|e| ScoringError::Unavailable(format!("Scoring request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, error_text));
        }

        response.json::<Value>().await.map_err(|e| {
            ScoringError::Failed(format!("Failed to parse scoring response: {}", e))
        })
    }
}

/// Only 400 and 422 blame the bid. Throttling and request timeouts mean the
/// scorer is busy; any other status (404, 401, 5xx) is a scorer or
/// configuration fault and counts toward opening the circuit.
fn classify_status(status: StatusCode, body: String) -> ScoringError {
    let message = format!("Scoring service returned {}: {}", status, body);
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ScoringError::InvalidBid(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            ScoringError::Unavailable(message)
        }
        _ => ScoringError::Failed(message),
    }
}

#[async_trait]
impl Scorer for HttpScorer {
    async fn score(&self, bid: &BidData) -> Result<Value, ScoringError> {
        let outcome = self
            .breaker
            .call_with(
                |e: &ScoringError| e.is_scorer_fault(),
                self.request_score(bid),
            )
            .await;

        match outcome {
            Ok(score) => Ok(score),
            Err(failsafe::Error::Inner(e)) => Err(e),
            Err(failsafe::Error::Rejected) => {
                tracing::warn!("Scoring circuit open, failing fast");
                Err(ScoringError::Unavailable(
                    "Scoring service temporarily disabled after repeated failures".to_string(),
                ))
            }
        }
    }
}
