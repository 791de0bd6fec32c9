//! qisa-service: answers customer questions about a single store.
//!
//! A request carries the store profile, its product list and a question.
//! The service turns the profile into an instruction block, asks the
//! configured text provider and relays the trimmed answer.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
