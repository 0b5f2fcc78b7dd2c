//! Domain layer: value objects, the element tree, response objects and the
//! ports the application layer talks to.

pub mod card;
pub mod currency;
pub mod element;
pub mod market;
pub mod outcome;
pub mod payment_data;
pub mod ports;
pub mod response;
pub mod transaction;
