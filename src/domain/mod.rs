//! Domain layer - Key generation and cache abstractions

pub mod cache;
pub mod error;

pub use error::DomainError;
