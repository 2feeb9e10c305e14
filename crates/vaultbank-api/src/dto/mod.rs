//! Data Transfer Objects
//!
//! Request and response structures for the API.

pub mod auth;
pub mod common;
pub mod user;
pub mod wallet;

pub use auth::*;
pub use common::*;
pub use user::*;
pub use wallet::*;
