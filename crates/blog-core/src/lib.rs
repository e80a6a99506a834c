//! # Blog Core
//!
//! The domain layer of the blog backend.
//! Pure business logic: the `Post` entity, input validation, the error
//! taxonomy and the repository ports. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::{DomainError, RepoError, ValidationError};
