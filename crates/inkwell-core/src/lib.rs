//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the slug algorithm, validation rules, ports, and the services that
//! enforce post ownership.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
