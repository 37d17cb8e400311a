//! Modules layer - Infrastructure components
//!
//! Contains the persistence adapters behind the feature services.

pub mod storage;
