//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod hello;
pub mod payload;
pub mod schemas;

pub use error::HeaderValidationFailure;
pub use payload::MessagePayload;
