pub(crate) mod error;
pub(crate) mod generate;
pub(crate) mod health;
pub(crate) mod search;

pub(crate) use error::ApiError;
