//! Debt share accounting
//!
//! A position owns shares of a bank's total debt. Interest raises the
//! bank's `total_debt` without touching `total_share`, so every share
//! becomes worth more underlying units at once.
//!
//! ## Rounding Rules (Always favor protocol)
//!
//! | Operation | Convert        | Rounding | Reason                          |
//! |-----------|----------------|----------|---------------------------------|
//! | Borrow    | debt → shares  | UP       | Borrower owes more shares       |
//! | Read debt | shares → debt  | UP       | Obligation is never understated |
//! | Repay     | debt → shares  | DOWN     | Fewer shares burned per unit    |

use anchor_lang::prelude::*;
use super::mul_div::{mul_div_down, mul_div_up};

/// Shares minted for a BORROW of `amount` underlying units
///
/// The first borrower of a bank gets shares 1:1.
///
/// Formula: shares = ceil(amount * totalShare / totalDebt)
pub fn borrow_shares_up(
    amount: u128,
    total_debt: u128,
    total_share: u128,
) -> Result<u128> {
    if total_share == 0 {
        return Ok(amount);
    }
    mul_div_up(amount, total_share, total_debt)
}

/// Outstanding debt represented by `share`
///
/// Rounding: UP (position's obligation is never understated)
///
/// Formula: debt = ceil(share * totalDebt / totalShare)
pub fn debt_from_shares_up(
    share: u128,
    total_debt: u128,
    total_share: u128,
) -> Result<u128> {
    if share == 0 || total_debt == 0 {
        return Ok(0);
    }
    mul_div_up(share, total_debt, total_share)
}

/// Shares burned by a partial REPAY of `paid` underlying units
///
/// Rounding: DOWN (burns fewer shares, protects other share-holders)
///
/// Formula: shares = floor(paid * totalShare / totalDebt)
pub fn repay_shares_down(
    paid: u128,
    total_debt: u128,
    total_share: u128,
) -> Result<u128> {
    mul_div_down(paid, total_share, total_debt)
}
