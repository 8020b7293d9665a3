//! State account structures

pub mod registry;
pub mod bank;
pub mod position;
pub mod debt_mask;

pub use registry::*;
pub use bank::*;
pub use position::*;
pub use debt_mask::*;
