//! stowage_server: REST surface for storage location layouts.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
