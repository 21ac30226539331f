//! # CMS Security
//! 
//! JWT verification for the admin API. Tokens are issued by the auth service.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};
