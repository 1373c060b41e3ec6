mod client;
mod elastic_url;
mod response;

pub(crate) use elastic_url::*;

pub use client::*;
pub use response::*;
