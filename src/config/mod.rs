//! Application configuration, loaded from environment variables.
//!
//! Each submodule owns one concern and exposes a `from_env()` constructor
//! with sensible development defaults. See the submodules for the exact
//! variable names.

pub mod cors;
pub mod database;
pub mod jwt;
pub mod storage;
