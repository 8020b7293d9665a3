//! Instruction handlers for the bank ledger

pub mod admin;
pub mod bank;
pub mod position;
pub mod accrue;
pub mod borrow;
pub mod repay;
pub mod views;
pub mod reserve;
pub mod utils;

pub use admin::*;
pub use bank::*;
pub use position::*;
pub use accrue::*;
pub use borrow::*;
pub use repay::*;
pub use views::*;
pub use reserve::*;
