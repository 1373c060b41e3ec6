//! Document store implementations.

mod elastic;
#[cfg(test)]
mod mock;

pub use elastic::ElasticStore;
#[cfg(test)]
pub use mock::MockDocumentStore;
