//! Oracle interface
//!
//! Converts an amount of a bank's underlying token into the common valuation
//! unit. The oracle program answers a `get_price(token, owner)` CPI with a
//! 16-byte serialized `rust_decimal::Decimal` price per underlying unit;
//! the owner is forwarded so the oracle can apply per-owner borrow factors.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::{get_return_data, invoke};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use crate::constants::ORACLE_GET_PRICE_IX;
use crate::errors::LedgerError;
use super::market::market_discriminator;

/// Capability the ledger consumes for debt valuation
pub trait DebtOracle {
    /// Value of `amount` units of `token` owed by `owner`, in the common unit
    fn value_in_common_unit(&mut self, token: &Pubkey, amount: u128, owner: &Pubkey) -> Result<u128>;
}

impl<O: DebtOracle + ?Sized> DebtOracle for &mut O {
    fn value_in_common_unit(&mut self, token: &Pubkey, amount: u128, owner: &Pubkey) -> Result<u128> {
        (**self).value_in_common_unit(token, amount, owner)
    }
}

/// floor(amount * price), rejecting negative prices
pub fn value_at_price(amount: u128, price: Decimal) -> Result<u128> {
    require!(!price.is_sign_negative(), LedgerError::OracleFailure);
    if amount == 0 {
        return Ok(0);
    }
    let amount = Decimal::from_u128(amount).ok_or(LedgerError::ArithmeticOverflow)?;
    amount
        .checked_mul(price)
        .ok_or(LedgerError::ArithmeticOverflow)?
        .floor()
        .to_u128()
        .ok_or_else(|| LedgerError::ArithmeticOverflow.into())
}

/// CPI-backed oracle
pub struct CpiOracle<'info> {
    pub program: AccountInfo<'info>,
    /// Oracle state/feed account
    pub feed: AccountInfo<'info>,
}

impl<'info> CpiOracle<'info> {
    fn price(&self, token: &Pubkey, owner: &Pubkey) -> Result<Decimal> {
        let mut data = market_discriminator(ORACLE_GET_PRICE_IX).to_vec();
        data.extend_from_slice(token.as_ref());
        data.extend_from_slice(owner.as_ref());

        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![AccountMeta::new_readonly(self.feed.key(), false)],
            data,
        };
        invoke(&ix, &[self.feed.clone(), self.program.clone()])?;

        let (from, ret) = get_return_data().ok_or(LedgerError::OracleFailure)?;
        require_keys_eq!(from, self.program.key(), LedgerError::OracleFailure);
        let bytes: [u8; 16] = ret
            .get(..16)
            .and_then(|b| b.try_into().ok())
            .ok_or(LedgerError::OracleFailure)?;
        Ok(Decimal::deserialize(bytes))
    }
}

impl<'info> DebtOracle for CpiOracle<'info> {
    fn value_in_common_unit(&mut self, token: &Pubkey, amount: u128, owner: &Pubkey) -> Result<u128> {
        let price = self.price(token, owner)?;
        value_at_price(amount, price)
    }
}
