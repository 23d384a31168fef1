//! External service integrations.

pub mod scoring_service {
    pub use crate::circuit_breaker::create_scoring_circuit_breaker;
    pub use crate::scoring::HttpScorer;
}
