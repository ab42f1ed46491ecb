//! Request middleware and extractors.
//!
//! # Authentication flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the token, reloads the account, and
//!    rejects disabled or deleted accounts with 401
//! 3. [`role::RequireAdmin`] / [`role::RequireSuperadmin`] reject
//!    insufficient roles with 403
//! 4. The handler receives the sanitized acting user

pub mod auth;
pub mod role;
