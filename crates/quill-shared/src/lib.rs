//! # Quill Shared
//!
//! Wire types of the HTTP API: request bodies, response payloads and the
//! `{status, result}` envelope.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorBody, ErrorResponse, ResponseStatus};
