//! Overflow-checked multiply-then-divide primitives
//!
//! All share/debt conversions go through these two functions so the
//! rounding direction of every conversion is explicit at the call site.

use anchor_lang::prelude::*;
use crate::errors::LedgerError;
use super::safe_math::checked_mul;

/// Multiply then divide, rounding DOWN
/// Order: (a * b) / c
///
/// # Arguments
/// * `a` - First multiplicand
/// * `b` - Second multiplicand
/// * `c` - Divisor (must be non-zero)
pub fn mul_div_down(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(LedgerError::DivisionByZero.into());
    }

    if a == 0 || b == 0 {
        return Ok(0);
    }

    let product = checked_mul(a, b)?;
    Ok(product / c)
}

/// Multiply then divide, rounding UP
/// Order: ceil((a * b) / c)
///
/// The remainder test avoids the `product + c - 1` overflow at the top
/// of the u128 range.
pub fn mul_div_up(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(LedgerError::DivisionByZero.into());
    }

    if a == 0 || b == 0 {
        return Ok(0);
    }

    let product = checked_mul(a, b)?;
    let quotient = product / c;
    if product % c == 0 {
        Ok(quotient)
    } else {
        Ok(quotient + 1)
    }
}

/// Ceiling division of two already-computed values
#[inline]
pub fn ceil_div(a: u128, b: u128) -> Result<u128> {
    mul_div_up(a, 1, b)
}
