//! External lending market interface
//!
//! The ledger never holds the borrowed liquidity itself: each bank borrows
//! from an external market program on behalf of all its positions. The
//! market is reached through CPI and answers through return data
//! (u64, little-endian).
//!
//! | Entry          | Accounts                                                  | Data        |
//! |----------------|-----------------------------------------------------------|-------------|
//! | `borrow`       | market (w), bank (signer), destination (w), token program | disc, u64   |
//! | `repay`        | market (w), bank, source (w), payer (signer), token prog. | disc, u64   |
//! | `current_debt` | market, bank                                              | disc        |

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::{get_return_data, invoke, invoke_signed};
use crate::constants::{
    MARKET_BORROW_IX, MARKET_CURRENT_DEBT_IX, MARKET_REPAY_IX, PROGRAM_SEED_PREFIX,
};
use crate::errors::LedgerError;
use crate::math::safe_u128_to_u64;
use crate::state::Bank;

/// Where borrowed liquidity is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// The bank's reserve vault (fee borrows during accrual)
    Reserve,
    /// The account named by the borrowing position's owner
    Position,
}

/// Capabilities the ledger consumes from an external lending market
pub trait ExternalMarket {
    /// Authoritative outstanding debt of the bank, interest included
    fn current_debt(&mut self) -> Result<u128>;

    /// Borrow `amount` from the market; returns the amount actually disbursed
    fn borrow(&mut self, amount: u128, to: Recipient) -> Result<u128>;

    /// Repay `amount` to the market; returns the amount actually applied
    fn repay(&mut self, amount: u128) -> Result<u128>;
}

impl<M: ExternalMarket + ?Sized> ExternalMarket for &mut M {
    fn current_debt(&mut self) -> Result<u128> {
        (**self).current_debt()
    }

    fn borrow(&mut self, amount: u128, to: Recipient) -> Result<u128> {
        (**self).borrow(amount, to)
    }

    fn repay(&mut self, amount: u128) -> Result<u128> {
        (**self).repay(amount)
    }
}

/// First 8 bytes of sha256 of the entrypoint preimage
pub fn market_discriminator(preimage: &str) -> [u8; 8] {
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    disc
}

/// CPI-backed market for one bank
pub struct CpiMarket<'info> {
    /// External market program
    pub program: AccountInfo<'info>,
    /// External market state (`bank.market_ref`)
    pub market: AccountInfo<'info>,
    /// Bank PDA, the borrower of record
    pub bank: AccountInfo<'info>,
    /// Bank PDA seed material
    pub market_ref: Pubkey,
    pub bank_bump: u8,
    /// Receives fee borrows
    pub reserve_vault: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    /// Receives position borrows / funds repays
    pub user_token_account: Option<AccountInfo<'info>>,
    /// Signer authorizing repays from `user_token_account`
    pub payer: Option<AccountInfo<'info>>,
}

impl<'info> CpiMarket<'info> {
    fn call(&self, ix: Instruction, infos: &[AccountInfo<'info>], signed: bool) -> Result<u64> {
        if signed {
            let bump = [self.bank_bump];
            let seeds: &[&[u8]] = &[
                PROGRAM_SEED_PREFIX,
                Bank::SEED,
                self.market_ref.as_ref(),
                &bump,
            ];
            invoke_signed(&ix, infos, &[seeds])?;
        } else {
            invoke(&ix, infos)?;
        }
        self.read_return()
    }

    fn read_return(&self) -> Result<u64> {
        let (from, data) = get_return_data().ok_or(LedgerError::ExternalMarketFailure)?;
        require_keys_eq!(from, self.program.key(), LedgerError::ExternalMarketFailure);
        let bytes: [u8; 8] = data
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .ok_or(LedgerError::ExternalMarketFailure)?;
        Ok(u64::from_le_bytes(bytes))
    }

    fn data(preimage: &str, amount: Option<u64>) -> Vec<u8> {
        let mut data = market_discriminator(preimage).to_vec();
        if let Some(amount) = amount {
            data.extend_from_slice(&amount.to_le_bytes());
        }
        data
    }
}

impl<'info> ExternalMarket for CpiMarket<'info> {
    fn current_debt(&mut self) -> Result<u128> {
        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new_readonly(self.market.key(), false),
                AccountMeta::new_readonly(self.bank.key(), false),
            ],
            data: Self::data(MARKET_CURRENT_DEBT_IX, None),
        };
        let infos = [self.market.clone(), self.bank.clone(), self.program.clone()];
        Ok(self.call(ix, &infos, false)? as u128)
    }

    fn borrow(&mut self, amount: u128, to: Recipient) -> Result<u128> {
        let destination = match to {
            Recipient::Reserve => self.reserve_vault.clone(),
            Recipient::Position => self
                .user_token_account
                .clone()
                .ok_or(LedgerError::ExternalMarketFailure)?,
        };
        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.market.key(), false),
                AccountMeta::new_readonly(self.bank.key(), true),
                AccountMeta::new(destination.key(), false),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data: Self::data(MARKET_BORROW_IX, Some(safe_u128_to_u64(amount)?)),
        };
        let infos = [
            self.market.clone(),
            self.bank.clone(),
            destination,
            self.token_program.clone(),
            self.program.clone(),
        ];
        Ok(self.call(ix, &infos, true)? as u128)
    }

    fn repay(&mut self, amount: u128) -> Result<u128> {
        let source = self
            .user_token_account
            .clone()
            .ok_or(LedgerError::ExternalMarketFailure)?;
        let payer = self.payer.clone().ok_or(LedgerError::ExternalMarketFailure)?;
        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.market.key(), false),
                AccountMeta::new_readonly(self.bank.key(), false),
                AccountMeta::new(source.key(), false),
                AccountMeta::new_readonly(payer.key(), true),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data: Self::data(MARKET_REPAY_IX, Some(safe_u128_to_u64(amount)?)),
        };
        let infos = [
            self.market.clone(),
            self.bank.clone(),
            source,
            payer,
            self.token_program.clone(),
            self.program.clone(),
        ];
        Ok(self.call(ix, &infos, false)? as u128)
    }
}
