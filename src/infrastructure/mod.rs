//! Infrastructure layer - Backing stores and process wiring

pub mod cache;
pub mod logging;
