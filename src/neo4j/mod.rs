//! Neo4j session layer the rendered statements are handed to

pub mod client;
pub mod traits;

pub use client::{ConnectionUrl, GraphClient};
pub use traits::GraphSession;

#[cfg(test)]
pub(crate) mod mock;
