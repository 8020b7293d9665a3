//! Debt ledger operations
//!
//! Everything here is generic over the [`ExternalMarket`] and
//! [`DebtOracle`](crate::interfaces::DebtOracle) capabilities, so the same
//! code runs behind the program's CPI adapters and in-process against mocks.
//!
//! Every mutating operation follows checks → effects → interactions and
//! runs under [`serialized`]: the position and bank are locked for its
//! duration, and if anything fails after state was touched the touched
//! fields are restored before the error is returned.

use anchor_lang::prelude::*;
use crate::errors::LedgerError;
use crate::interfaces::ExternalMarket;
use crate::state::{Bank, DebtMask, Position};

pub mod accrue;
pub mod borrow;
pub mod repay;
pub mod valuation;

pub use accrue::*;
pub use borrow::*;
pub use repay::*;
pub use valuation::*;

/// A listed bank together with the market it borrows from
pub struct BankHandle<'a, M: ExternalMarket> {
    /// Bank identifier (the bank account address)
    pub key: Pubkey,
    pub bank: &'a mut Bank,
    pub market: M,
}

/// Fields of a bank/position pair that a ledger operation may touch
struct Checkpoint {
    total_debt: u128,
    total_share: u128,
    reserve: u128,
    share: u128,
    mask: DebtMask,
}

impl Checkpoint {
    fn capture(bank: &Bank, position: &Position) -> Self {
        Self {
            total_debt: bank.total_debt,
            total_share: bank.total_share,
            reserve: bank.reserve,
            share: position.share_of(bank.index),
            mask: position.debt_mask,
        }
    }

    fn restore(self, bank: &mut Bank, position: &mut Position) {
        bank.total_debt = self.total_debt;
        bank.total_share = self.total_share;
        bank.reserve = self.reserve;
        position.debt_shares[bank.index as usize] = self.share;
        position.debt_mask = self.mask;
    }
}

/// Run `op` with exclusive hold of `bank` and `position`.
///
/// Nested entry on either is rejected. Both locks are released on every
/// exit path; on error the touched state is rolled back.
pub(crate) fn serialized<T>(
    bank: &mut Bank,
    position: &mut Position,
    op: impl FnOnce(&mut Bank, &mut Position) -> Result<T>,
) -> Result<T> {
    require!(bank.listed, LedgerError::UnknownBank);
    require!(!position.is_locked(), LedgerError::PositionLocked);
    require!(!bank.is_locked(), LedgerError::BankLocked);

    let checkpoint = Checkpoint::capture(bank, position);
    position.lock = 1;
    bank.lock = 1;

    let result = op(bank, position);
    if result.is_err() {
        checkpoint.restore(bank, position);
    }

    position.lock = 0;
    bank.lock = 0;
    result
}
