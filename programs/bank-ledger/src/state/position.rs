//! Position state account
//!
//! One account per user position. Debt shares are stored densely by bank
//! index; the debt mask mirrors which of those entries are nonzero.

use anchor_lang::prelude::*;
use crate::constants::{MAX_BANKS, PROGRAM_SEED_PREFIX};
use crate::math::{checked_add, checked_sub};
use super::debt_mask::{DebtMask, DebtMaskIter};

/// User position across every listed bank
///
/// PDA Seeds: [PROGRAM_SEED_PREFIX, b"position", owner, position_id]
///
/// Zero-copy: the share table alone is 4 KiB. Field order leaves no
/// implicit padding.
#[account(zero_copy)]
#[derive(Debug)]
pub struct Position {
    /// Position owner
    pub owner: Pubkey,

    /// Collateral token backing this position (managed outside the ledger)
    pub collateral_ref: Pubkey,

    /// Owner-chosen discriminator allowing several positions per owner
    pub position_id: u64,

    /// Bit `i` set iff `debt_shares[i] != 0`
    pub debt_mask: DebtMask,

    /// PDA bump seed
    pub bump: u8,

    /// Non-zero while an operation holds this position
    pub lock: u8,

    pub padding: [u8; 6],

    /// Collateral amount (managed outside the ledger)
    pub collateral_amount: u128,

    /// Debt shares keyed by bank index
    pub debt_shares: [u128; MAX_BANKS],

    /// Reserved for future use
    pub reserved: [u8; 32],
}

impl Position {
    pub const SEED: &'static [u8] = b"position";

    pub fn space() -> usize {
        8 + std::mem::size_of::<Position>()
    }

    pub fn new(bump: u8, owner: Pubkey, position_id: u64) -> Self {
        Self {
            owner,
            collateral_ref: Pubkey::default(),
            position_id,
            debt_mask: DebtMask::default(),
            bump,
            lock: 0,
            padding: [0u8; 6],
            collateral_amount: 0,
            debt_shares: [0u128; MAX_BANKS],
            reserved: [0u8; 32],
        }
    }

    pub fn share_of(&self, bank_index: u8) -> u128 {
        self.debt_shares[bank_index as usize]
    }

    /// Add `share` to the bank's entry; returns the new share.
    pub fn credit_share(&mut self, bank_index: u8, share: u128) -> Result<u128> {
        let slot = &mut self.debt_shares[bank_index as usize];
        *slot = checked_add(*slot, share)?;
        if *slot != 0 {
            self.debt_mask.set(bank_index);
        }
        Ok(*slot)
    }

    /// Remove `share` from the bank's entry; returns the new share.
    pub fn debit_share(&mut self, bank_index: u8, share: u128) -> Result<u128> {
        let slot = &mut self.debt_shares[bank_index as usize];
        *slot = checked_sub(*slot, share)?;
        if *slot == 0 {
            self.debt_mask.clear(bank_index);
        }
        Ok(*slot)
    }

    /// Bank indices with nonzero debt share, ascending
    pub fn active_banks(&self) -> DebtMaskIter {
        self.debt_mask.iter()
    }

    pub fn has_debt(&self) -> bool {
        !self.debt_mask.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.lock != 0
    }

    /// Whether the debt mask agrees with the share entries
    pub fn mask_is_consistent(&self) -> bool {
        (0..=u8::MAX).all(|i| self.debt_mask.test(i) == (self.share_of(i) != 0))
    }
}

/// Derive position PDA
pub fn derive_position(
    program_id: &Pubkey,
    owner: &Pubkey,
    position_id: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PROGRAM_SEED_PREFIX,
            Position::SEED,
            owner.as_ref(),
            &position_id.to_le_bytes(),
        ],
        program_id,
    )
}
