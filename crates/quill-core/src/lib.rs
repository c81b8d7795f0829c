//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains the entities, ports and services; it has zero
//! infrastructure dependencies.

pub mod context;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use context::RequestContext;
pub use error::{DomainError, DomainResult, ErrorKind};
