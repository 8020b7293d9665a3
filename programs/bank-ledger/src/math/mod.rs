//! Math library modules for safe arithmetic operations

pub mod safe_math;
pub mod mul_div;
pub mod shares;
pub mod interest;

pub use safe_math::*;
pub use mul_div::*;
pub use shares::*;
pub use interest::*;
