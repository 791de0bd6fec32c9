//! HTTP handlers for the qisa service.

pub mod health;
pub mod responder;
