//! Debt read instructions
//!
//! Results are returned through return data. Each read accrues the banks
//! it touches, so bank accounts must be passed writable.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::interfaces::CpiOracle;
use crate::ledger::{self, BankHandle, DebtEntry};
use crate::state::{Bank, BankRegistry, Position};
use super::utils::{handles, load_banks, save_banks, MarketAccounts};

// ============================================================================
// Debt Of
// ============================================================================

#[derive(Accounts)]
pub struct DebtOf<'info> {
    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, BankRegistry>,

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

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn debt_of(ctx: Context<DebtOf>) -> Result<u128> {
    let fee_bps = ctx.accounts.registry.fee_bps;
    let accounts = &mut *ctx.accounts;

    let market = MarketAccounts {
        bank: &accounts.bank,
        market_program: &accounts.market_program,
        market_state: &accounts.market_state,
        reserve_vault: &accounts.reserve_vault,
        token_program: &accounts.token_program,
    }
    .cpi_market();

    let mut handle = BankHandle {
        key: accounts.bank.key(),
        bank: &mut accounts.bank,
        market,
    };
    ledger::debt_of(&mut handle, &*accounts.position.load()?, fee_bps)
}

// ============================================================================
// List Debts / Total Borrow Value
// ============================================================================

/// Remaining accounts: one group of four per set bit of the position's
/// debt mask, in ascending bank index order
#[derive(Accounts)]
pub struct ListDebts<'info> {
    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, BankRegistry>,

    pub position: AccountLoader<'info, Position>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn list_debts<'info>(
    ctx: Context<'_, '_, 'info, 'info, ListDebts<'info>>,
) -> Result<Vec<DebtEntry>> {
    let fee_bps = ctx.accounts.registry.fee_bps;
    let token_program = ctx.accounts.token_program.to_account_info();

    let mut loaded = load_banks(ctx.remaining_accounts, &token_program)?;
    let debts = {
        let mut handles = handles(&mut loaded);
        ledger::list_debts(&*ctx.accounts.position.load()?, &mut handles, fee_bps)?
    };
    save_banks(&loaded)?;

    Ok(debts)
}

/// Same remaining accounts as [`ListDebts`]
#[derive(Accounts)]
pub struct TotalBorrowValue<'info> {
    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, BankRegistry>,

    pub position: AccountLoader<'info, Position>,

    /// CHECK: Oracle program answering `get_price`
    #[account(executable)]
    pub oracle_program: UncheckedAccount<'info>,

    /// CHECK: Oracle feed/state account, interpreted by the oracle program
    pub oracle_feed: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn total_borrow_value<'info>(
    ctx: Context<'_, '_, 'info, 'info, TotalBorrowValue<'info>>,
) -> Result<u128> {
    let fee_bps = ctx.accounts.registry.fee_bps;
    let token_program = ctx.accounts.token_program.to_account_info();
    let mut oracle = CpiOracle {
        program: ctx.accounts.oracle_program.to_account_info(),
        feed: ctx.accounts.oracle_feed.to_account_info(),
    };

    let mut loaded = load_banks(ctx.remaining_accounts, &token_program)?;
    let value = {
        let mut handles = handles(&mut loaded);
        let position = ctx.accounts.position.load()?;
        ledger::total_borrow_value(&position, &mut handles, &mut oracle, fee_bps)?
    };
    save_banks(&loaded)?;

    Ok(value)
}
