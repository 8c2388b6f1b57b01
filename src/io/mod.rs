//! Input/output helpers.
//!
//! - point exports (CSV) (`export`)
//! - series JSON read/write (`series`)

pub mod export;
pub mod series;

pub use export::*;
pub use series::*;
