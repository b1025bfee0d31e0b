//! Request handlers, one module per resource.

pub mod batches;
pub mod garments;
pub mod tryon;
pub mod uploads;
