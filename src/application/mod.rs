//! Application layer: request validation, assembly, submission and response
//! classification.
//!
//! [`service::CreditService`] is the entry point. Each operation is a builder
//! from [`builders`] that validates itself, hydrates a request tree through
//! [`hydrate`], and hands it to the service, which runs the
//! [`classifier`] saga over the response.

pub mod builders;
pub mod classifier;
pub mod hydrate;
pub mod service;
pub mod validation;
