//! # CMS API
//! 
//! HTTP handlers, middleware, DTOs, and the router of the menu service.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
