//! Answering agent implementations

mod direct_agent;
mod prompts;
mod react_agent;

pub use direct_agent::DirectAgent;
pub use react_agent::ReactAgent;

use crate::domain::DomainError;

/// Stops the model before it invents its own observation
pub(crate) const REACT_STOP: [&str; 1] = ["\nObservation:"];

/// Model failures while answering surface as generation errors
pub(crate) fn as_generation_error(error: DomainError) -> DomainError {
    error.into_generation()
}
