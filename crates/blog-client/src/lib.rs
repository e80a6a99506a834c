//! # Blog Client
//!
//! Thin async wrapper over the `/api/posts` endpoints. Non-success responses
//! become [`ClientError::Api`] carrying the server's `{message}`.

mod client;
mod error;

pub use client::PostsClient;
pub use error::ClientError;
