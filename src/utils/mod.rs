//! Shared utilities.
//!
//! - [`errors`]: application error types and HTTP mapping
//! - [`extract`]: resource id path extraction
//! - [`file_storage`]: attachment blob storage backends
//! - [`jwt`]: token creation and verification
//! - [`pagination`]: page/limit query handling
//! - [`password`]: password hashing and verification
//! - [`response`]: success response envelope

pub mod errors;
pub mod extract;
pub mod file_storage;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod response;
