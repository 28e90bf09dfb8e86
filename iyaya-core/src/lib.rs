//! iyaya-core: Shared infrastructure for Iyaya backend services.
pub mod config;
pub mod error;
pub mod observability;
