pub mod cli;
pub mod command;
pub mod error;
pub mod forge;
pub mod orchestrator;
pub mod result;
pub mod updater;
pub mod webhook;

pub use error::PropagatorError;
pub use orchestrator::{Propagator, event::ReleaseEvent, summary::Summary};
pub use result::Result;

#[cfg(test)]
pub mod test_helpers;
