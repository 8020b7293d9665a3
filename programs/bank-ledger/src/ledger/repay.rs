//! Repayment by the owner or a liquidator

use anchor_lang::prelude::*;
use crate::constants::REPAY_ALL;
use crate::errors::LedgerError;
use crate::interfaces::ExternalMarket;
use crate::math::{checked_sub, debt_from_shares_up, repay_shares_down};
use crate::state::Position;
use super::{accrue, serialized, BankHandle};

/// What a repayment settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AnchorSerialize, AnchorDeserialize)]
pub struct RepayOutcome {
    /// Underlying units repaid to the market
    pub paid: u128,
    /// Debt shares burned from the position
    pub share: u128,
}

/// Repay `amount` of the position's debt to the handle's bank.
///
/// `REPAY_ALL` repays exactly the outstanding debt and burns every share,
/// even when that debt has been written down to zero.
pub fn repay<M: ExternalMarket>(
    handle: &mut BankHandle<'_, M>,
    position: &mut Position,
    amount: u128,
    fee_bps: u64,
) -> Result<RepayOutcome> {
    settle(handle, position, amount, fee_bps)
}

/// Repay on behalf of a third party.
///
/// Health checks and the collateral bounty belong to the caller; the
/// ledger applies the same bounds and share arithmetic as [`repay`].
pub fn liquidation_repay<M: ExternalMarket>(
    handle: &mut BankHandle<'_, M>,
    position: &mut Position,
    amount: u128,
    fee_bps: u64,
) -> Result<RepayOutcome> {
    settle(handle, position, amount, fee_bps)
}

fn settle<M: ExternalMarket>(
    handle: &mut BankHandle<'_, M>,
    position: &mut Position,
    amount: u128,
    fee_bps: u64,
) -> Result<RepayOutcome> {
    require!(!position.is_locked(), LedgerError::PositionLocked);

    accrue(handle.bank, &mut handle.market, fee_bps)?;

    let market = &mut handle.market;
    serialized(handle.bank, position, |bank, position| {
        let (total_debt, total_share) = (bank.total_debt, bank.total_share);
        let old_share = position.share_of(bank.index);
        let old_debt = debt_from_shares_up(old_share, total_debt, total_share)?;

        let paid = if amount == REPAY_ALL { old_debt } else { amount };
        require!(paid <= old_debt, LedgerError::OverRepayment);
        require!(amount > 0 && old_share > 0, LedgerError::ZeroAmount);

        let less_share = if paid == old_debt {
            old_share
        } else {
            repay_shares_down(paid, total_debt, total_share)?
        };

        position.debit_share(bank.index, less_share)?;
        bank.total_share = checked_sub(total_share, less_share)?;
        bank.total_debt = checked_sub(total_debt, paid)?;

        // Shares left behind by a downward resync are burned at no cost
        if paid > 0 {
            let applied = market.repay(paid)?;
            require!(applied == paid, LedgerError::ExternalMarketFailure);
        }

        Ok(RepayOutcome { paid, share: less_share })
    })
}
