//! # CMS Core
//! 
//! Menu domain entities, tree invariants, services, and repository traits.

pub mod domain;
pub mod tree;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
