//! Bank registry account
//!
//! Single global account holding the governor, the protocol fee and the
//! number of listed banks. Bank indices are handed out sequentially and
//! never reused.

use anchor_lang::prelude::*;
use crate::constants::{MAX_BANKS, MAX_FEE_BPS, PROGRAM_SEED_PREFIX};
use crate::errors::LedgerError;
use crate::state::Bank;

/// Protocol-wide registry account
///
/// PDA Seeds: [PROGRAM_SEED_PREFIX, b"registry"]
#[account]
#[derive(Default, Debug)]
pub struct BankRegistry {
    /// PDA bump seed
    pub bump: u8,

    /// May list banks, change the fee, pause borrowing, withdraw reserves
    pub governor: Pubkey,

    /// Share of accrued interest taken as protocol fee (basis points)
    pub fee_bps: u64,

    /// Blocks new borrows; repay and liquidation stay open
    pub paused: bool,

    /// Number of banks listed so far (next index to assign)
    pub bank_count: u16,

    /// Reserved for future upgrades
    pub reserved: [u8; 32],
}

/// Immutable parameters of a newly registered bank
#[derive(Debug, Clone, Copy)]
pub struct BankParams {
    pub bump: u8,
    pub market_ref: Pubkey,
    pub market_program: Pubkey,
    pub underlying_mint: Pubkey,
    pub reserve_vault_bump: u8,
}

impl BankRegistry {
    pub const SEED: &'static [u8] = b"registry";

    pub fn space() -> usize {
        8 +     // discriminator
        1 +     // bump
        32 +    // governor
        8 +     // fee_bps
        1 +     // paused
        2 +     // bank_count
        32      // reserved
    }

    pub fn new(bump: u8, governor: Pubkey, fee_bps: u64) -> Result<Self> {
        require!(fee_bps <= MAX_FEE_BPS, LedgerError::FeeTooHigh);
        Ok(Self {
            bump,
            governor,
            fee_bps,
            ..Default::default()
        })
    }

    pub fn is_full(&self) -> bool {
        self.bank_count as usize >= MAX_BANKS
    }

    pub fn set_fee(&mut self, fee_bps: u64) -> Result<()> {
        require!(fee_bps <= MAX_FEE_BPS, LedgerError::FeeTooHigh);
        self.fee_bps = fee_bps;
        Ok(())
    }

    /// List `bank` under the next free index.
    ///
    /// `bank` is the (possibly freshly zeroed) account bound to
    /// `params.market_ref`; a bank that is already listed means the market
    /// is taken.
    pub fn register_bank(&mut self, bank: &mut Bank, params: BankParams) -> Result<u8> {
        require!(!bank.listed, LedgerError::DuplicateMarket);
        require!(!self.is_full(), LedgerError::CapacityExceeded);

        let index = self.bank_count as u8;
        *bank = Bank {
            bump: params.bump,
            listed: true,
            index,
            market_ref: params.market_ref,
            market_program: params.market_program,
            underlying_mint: params.underlying_mint,
            reserve_vault_bump: params.reserve_vault_bump,
            ..Default::default()
        };
        self.bank_count += 1;

        Ok(index)
    }
}

/// Derive registry PDA
pub fn derive_registry(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        program_id,
    )
}
