//! Text generation implementations.

mod http;
#[cfg(test)]
mod mock;

pub use http::{GenerationProvider, HttpGenerator};
#[cfg(test)]
pub use mock::MockGenerator;
