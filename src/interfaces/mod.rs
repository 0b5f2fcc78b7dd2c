pub mod batch;
pub mod csv;
