//! Borrow instruction
//!
//! CEI Pattern: Checks → Effects → Interactions

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::events;
use crate::ledger::{self, BankHandle};
use crate::state::{Bank, BankRegistry, Position};
use super::utils::MarketAccounts;

#[derive(Accounts)]
pub struct Borrow<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, BankRegistry>,

    #[account(
        mut,
        constraint = position.load()?.owner == owner.key() @ LedgerError::Unauthorized,
    )]
    pub position: AccountLoader<'info, Position>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bank::SEED, bank.market_ref.as_ref()],
        bump = bank.bump,
        constraint = bank.listed @ LedgerError::UnknownBank,
    )]
    pub bank: Account<'info, Bank>,

    /// CHECK: Must be the program recorded at registration
    #[account(address = bank.market_program @ LedgerError::InvalidBankAccount)]
    pub market_program: UncheckedAccount<'info>,

    /// CHECK: Must be the market state recorded at registration
    #[account(mut, address = bank.market_ref @ LedgerError::InvalidBankAccount)]
    pub market_state: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bank::RESERVE_VAULT_SEED, bank.market_ref.as_ref()],
        bump = bank.reserve_vault_bump,
    )]
    pub reserve_vault: InterfaceAccount<'info, TokenAccount>,

    /// Receives the borrowed liquidity
    #[account(
        mut,
        constraint = receiver_token_account.mint == bank.underlying_mint,
    )]
    pub receiver_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn borrow(ctx: Context<Borrow>, amount: u128) -> Result<u128> {
    // ===== CHECKS =====
    require!(!ctx.accounts.registry.paused, LedgerError::ProtocolPaused);
    let fee_bps = ctx.accounts.registry.fee_bps;
    let accounts = &mut *ctx.accounts;

    let mut market = MarketAccounts {
        bank: &accounts.bank,
        market_program: &accounts.market_program,
        market_state: &accounts.market_state,
        reserve_vault: &accounts.reserve_vault,
        token_program: &accounts.token_program,
    }
    .cpi_market();
    market.user_token_account = Some(accounts.receiver_token_account.to_account_info());

    // ===== EFFECTS + INTERACTIONS =====
    let mut handle = BankHandle {
        key: accounts.bank.key(),
        bank: &mut accounts.bank,
        market,
    };
    let share = {
        let mut position = accounts.position.load_mut()?;
        ledger::borrow(&mut handle, &mut position, amount, fee_bps)?
    };

    emit!(events::Borrow {
        bank: handle.key,
        position: accounts.position.key(),
        amount,
        share,
    });

    Ok(share)
}
