pub mod error;
pub mod ingest;
pub mod retry;
pub mod search;

pub use error::{DomainError, Result};
