//! Checked u128 arithmetic mapped onto ledger error codes.
//!
//! Share and debt math runs in u128; amounts leave the ledger as u64
//! through [`safe_u128_to_u64`].

use anchor_lang::prelude::*;
use crate::errors::LedgerError;
use crate::constants::MAX_U64;

/// Narrow a ledger amount for a token transfer or market CPI
#[inline]
pub fn safe_u128_to_u64(value: u128) -> Result<u64> {
    if value > MAX_U64 {
        return Err(LedgerError::AmountOverflow.into());
    }
    Ok(value as u64)
}

#[inline]
pub fn checked_add(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or_else(|| LedgerError::ArithmeticOverflow.into())
}

/// `MathUnderflow` when `b > a`
#[inline]
pub fn checked_sub(a: u128, b: u128) -> Result<u128> {
    a.checked_sub(b).ok_or_else(|| LedgerError::MathUnderflow.into())
}

#[inline]
pub fn checked_mul(a: u128, b: u128) -> Result<u128> {
    a.checked_mul(b).ok_or_else(|| LedgerError::ArithmeticOverflow.into())
}

#[inline]
pub fn checked_div(a: u128, b: u128) -> Result<u128> {
    if b == 0 {
        return Err(LedgerError::DivisionByZero.into());
    }
    Ok(a / b)
}
