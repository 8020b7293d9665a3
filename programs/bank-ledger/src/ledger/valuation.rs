//! Read-side debt aggregation
//!
//! Every read accrues the bank first, so no figure is older than the
//! market's current debt. Enumeration walks only the position's mask bits.

use anchor_lang::prelude::*;
use crate::errors::LedgerError;
use crate::interfaces::{DebtOracle, ExternalMarket};
use crate::math::checked_add;
use crate::state::Position;
use super::{accrue, BankHandle};

/// One active debt of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct DebtEntry {
    pub bank: Pubkey,
    pub index: u8,
    pub amount: u128,
}

/// Outstanding debt of `position` in the handle's bank, after accrual
pub fn debt_of<M: ExternalMarket>(
    handle: &mut BankHandle<'_, M>,
    position: &Position,
    fee_bps: u64,
) -> Result<u128> {
    accrue(handle.bank, &mut handle.market, fee_bps)?;
    handle.bank.debt_for(position.share_of(handle.bank.index))
}

/// Every active debt of `position`, in ascending bank index order.
///
/// `handles` must name exactly the banks set in the position's mask, in
/// the same order.
pub fn list_debts<M: ExternalMarket>(
    position: &Position,
    handles: &mut [BankHandle<'_, M>],
    fee_bps: u64,
) -> Result<Vec<DebtEntry>> {
    require!(
        handles.len() == position.debt_mask.count(),
        LedgerError::InvalidBankAccount
    );

    let mut debts = Vec::with_capacity(handles.len());
    for (index, handle) in position.active_banks().zip(handles.iter_mut()) {
        require!(handle.bank.index == index, LedgerError::InvalidBankAccount);
        let amount = debt_of(handle, position, fee_bps)?;
        debts.push(DebtEntry { bank: handle.key, index, amount });
    }
    Ok(debts)
}

/// Sum of the position's debts valued by `oracle` in its common unit
pub fn total_borrow_value<M: ExternalMarket, O: DebtOracle>(
    position: &Position,
    handles: &mut [BankHandle<'_, M>],
    oracle: &mut O,
    fee_bps: u64,
) -> Result<u128> {
    let debts = list_debts(position, handles, fee_bps)?;

    let mut total = 0u128;
    for (entry, handle) in debts.iter().zip(handles.iter()) {
        let value = oracle.value_in_common_unit(
            &handle.bank.underlying_mint,
            entry.amount,
            &position.owner,
        )?;
        total = checked_add(total, value)?;
    }
    Ok(total)
}
