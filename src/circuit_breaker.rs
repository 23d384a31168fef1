use failsafe::{backoff, failure_policy, Config, StateMachine};
use std::time::Duration;

/// Breaker type guarding the remote scoring service.
pub type ScoringCircuitBreaker =
    StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Consecutive failures that open the breaker.
pub const FAILURE_THRESHOLD: u32 = 5;

/// Creates a circuit breaker for scoring calls so a dead scoring service
/// fails fast instead of tying up every request until the client timeout.
///
/// # Configuration
///
/// - **Failure threshold**: 5 consecutive failures triggers OPEN state.
/// - **Backoff**: Exponential backoff from 10s to 60s before attempting recovery.
///
/// # States
///
/// - **CLOSED**: Normal operation, requests pass through.
/// - **OPEN**: Too many failures, requests fail fast.
/// - **HALF_OPEN**: Testing if service recovered.
///
/// # Example
///
/// ```rust
/// use failsafe::futures::CircuitBreaker;
/// use tenderchain_api::circuit_breaker::create_scoring_circuit_breaker;
///
/// let breaker = create_scoring_circuit_breaker();
/// assert!(breaker.is_call_permitted());
/// ```
pub fn create_scoring_circuit_breaker() -> ScoringCircuitBreaker {
    let backoff_strategy = backoff::exponential(
        Duration::from_secs(10), // Initial delay
        Duration::from_secs(60), // Maximum delay
    );

    let failure_policy = failure_policy::consecutive_failures(FAILURE_THRESHOLD, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}
