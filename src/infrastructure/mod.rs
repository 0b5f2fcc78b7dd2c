//! Adapters behind the domain ports plus the gateway code tables.

pub mod codes;
pub mod in_memory;
pub mod xml;
