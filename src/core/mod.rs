// Domain-layer modules and shared errors/models
pub mod models {
    pub use crate::models::*;
}

pub mod scoring {
    pub use crate::scoring::{Scorer, ScoringError};
}

pub mod errors {
    pub use crate::errors::*;
}
