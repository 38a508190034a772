//! Solution document model and the errors raised around it.

pub mod errors;
pub mod model;
