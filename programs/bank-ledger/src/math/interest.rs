//! Interest accrual arithmetic
//!
//! The external market is the source of truth for how much the protocol
//! owes. Accrual compares its figure against the bank's recorded
//! `total_debt`, takes a protocol fee from any increase, and treats that
//! fee as borrowed in the same step.

use anchor_lang::prelude::*;
use crate::constants::BPS;
use super::safe_math::{checked_add, checked_sub};
use super::mul_div::mul_div_down;

/// Result of interest accrual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AnchorSerialize, AnchorDeserialize)]
pub struct AccrualResult {
    /// Interest observed since last accrual (in underlying units)
    pub interest: u128,
    /// Fee credited to the bank reserve (and borrowed from the market)
    pub fee: u128,
    /// Bank `total_debt` after accrual
    pub total_debt: u128,
}

/// Compute the accrual of a bank whose recorded debt is `total_debt`
/// given the market's authoritative `observed_debt`.
///
/// - `observed > recorded`: interest = observed - recorded,
///   fee = floor(interest * fee_bps / BPS), new total = observed + fee
/// - otherwise: new total = observed, no fee
pub fn compute_accrual(
    total_debt: u128,
    observed_debt: u128,
    fee_bps: u64,
) -> Result<AccrualResult> {
    if observed_debt <= total_debt {
        return Ok(AccrualResult {
            interest: 0,
            fee: 0,
            total_debt: observed_debt,
        });
    }

    let interest = checked_sub(observed_debt, total_debt)?;
    let fee = mul_div_down(interest, fee_bps as u128, BPS as u128)?;

    Ok(AccrualResult {
        interest,
        fee,
        total_debt: checked_add(observed_debt, fee)?,
    })
}
