//! Borrowing against a bank

use anchor_lang::prelude::*;
use crate::errors::LedgerError;
use crate::interfaces::{ExternalMarket, Recipient};
use crate::math::{borrow_shares_up, checked_add};
use crate::state::Position;
use super::{accrue, serialized, BankHandle};

/// Borrow `amount` from the handle's bank on behalf of `position`.
///
/// Returns the debt shares minted. The bank is accrued first so the new
/// shares are priced against current debt.
pub fn borrow<M: ExternalMarket>(
    handle: &mut BankHandle<'_, M>,
    position: &mut Position,
    amount: u128,
    fee_bps: u64,
) -> Result<u128> {
    require!(amount > 0, LedgerError::ZeroAmount);
    require!(!position.is_locked(), LedgerError::PositionLocked);

    accrue(handle.bank, &mut handle.market, fee_bps)?;

    let market = &mut handle.market;
    serialized(handle.bank, position, |bank, position| {
        let share = borrow_shares_up(amount, bank.total_debt, bank.total_share)?;

        bank.total_share = checked_add(bank.total_share, share)?;
        bank.total_debt = checked_add(bank.total_debt, amount)?;
        position.credit_share(bank.index, share)?;

        let disbursed = market.borrow(amount, Recipient::Position)?;
        require!(disbursed == amount, LedgerError::ExternalMarketFailure);

        Ok(share)
    })
}
