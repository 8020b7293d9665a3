//! Bank state account
//!
//! One account per external lending market. The bank records what the
//! protocol as a whole owes that market and how the debt is split into
//! shares across positions.

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::math::debt_from_shares_up;

/// Aggregate debt bookkeeping for one external market
///
/// PDA Seeds: [PROGRAM_SEED_PREFIX, b"bank", market_ref]
#[account]
#[derive(Default, Debug)]
pub struct Bank {
    /// PDA bump seed
    pub bump: u8,

    /// Set once by registration, never cleared
    pub listed: bool,

    /// Registration order; bit position in every position's debt mask
    pub index: u8,

    /// External market state account this bank borrows from
    pub market_ref: Pubkey,

    /// Program owning `market_ref`
    pub market_program: Pubkey,

    /// Underlying token lent by the market
    pub underlying_mint: Pubkey,

    /// Bump for the reserve vault PDA
    pub reserve_vault_bump: u8,

    /// Protocol-owned fee balance (underlying units)
    pub reserve: u128,

    /// Debt owed to the market across all positions, as of last accrual
    pub total_debt: u128,

    /// Sum of all positions' debt shares
    pub total_share: u128,

    /// Non-zero while an operation holds this bank
    pub lock: u8,

    /// Reserved for future use
    pub reserved: [u8; 32],
}

impl Bank {
    pub const SEED: &'static [u8] = b"bank";
    pub const RESERVE_VAULT_SEED: &'static [u8] = b"reserve_vault";

    pub fn space() -> usize {
        8 +     // discriminator
        1 +     // bump
        1 +     // listed
        1 +     // index
        32 +    // market_ref
        32 +    // market_program
        32 +    // underlying_mint
        1 +     // reserve_vault_bump
        16 +    // reserve
        16 +    // total_debt
        16 +    // total_share
        1 +     // lock
        32      // reserved
    }

    /// Debt represented by `share` at the current ratio (rounded up)
    pub fn debt_for(&self, share: u128) -> Result<u128> {
        debt_from_shares_up(share, self.total_debt, self.total_share)
    }

    pub fn is_locked(&self) -> bool {
        self.lock != 0
    }
}

/// Derive bank PDA
pub fn derive_bank(program_id: &Pubkey, market_ref: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PROGRAM_SEED_PREFIX, Bank::SEED, market_ref.as_ref()],
        program_id,
    )
}

/// Derive reserve vault PDA
pub fn derive_reserve_vault(program_id: &Pubkey, market_ref: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PROGRAM_SEED_PREFIX, Bank::RESERVE_VAULT_SEED, market_ref.as_ref()],
        program_id,
    )
}
