//! Generation-driven ingestion.
//!
//! New documents are produced by a text-generation provider, optionally
//! embedded, and written to the ingestion index one at a time.

mod pipeline;
mod traits;

pub mod generator;

pub use generator::{GenerationProvider, HttpGenerator};
pub use pipeline::{IngestionConfig, IngestionPipeline};
pub use traits::Generator;
