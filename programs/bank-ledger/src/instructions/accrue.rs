//! Interest accrual instructions (permissionless)

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::events::InterestAccrued;
use crate::ledger;
use crate::math::AccrualResult;
use crate::state::{Bank, BankRegistry};
use super::utils::{handles, load_banks, save_banks, MarketAccounts};

// ============================================================================
// Accrue
// ============================================================================

#[derive(Accounts)]
pub struct Accrue<'info> {
    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, BankRegistry>,

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

pub fn accrue(ctx: Context<Accrue>) -> Result<AccrualResult> {
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

    let bank = &mut accounts.bank;
    let result = ledger::accrue(bank, &mut market, fee_bps)?;

    emit!(InterestAccrued {
        bank: bank.key(),
        interest: result.interest,
        fee: result.fee,
        total_debt: bank.total_debt,
        reserve: bank.reserve,
    });
    Ok(result)
}

// ============================================================================
// Accrue Many
// ============================================================================

/// Banks are passed as remaining accounts, four per bank
#[derive(Accounts)]
pub struct AccrueMany<'info> {
    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, BankRegistry>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn accrue_many<'info>(
    ctx: Context<'_, '_, 'info, 'info, AccrueMany<'info>>,
) -> Result<Vec<AccrualResult>> {
    let fee_bps = ctx.accounts.registry.fee_bps;
    let token_program = ctx.accounts.token_program.to_account_info();

    let mut loaded = load_banks(ctx.remaining_accounts, &token_program)?;
    let results = {
        let mut handles = handles(&mut loaded);
        ledger::accrue_many(&mut handles, fee_bps)?
    };
    save_banks(&loaded)?;

    for (result, entry) in results.iter().zip(loaded.iter()) {
        emit!(InterestAccrued {
            bank: entry.bank.key(),
            interest: result.interest,
            fee: result.fee,
            total_debt: entry.bank.total_debt,
            reserve: entry.bank.reserve,
        });
    }
    Ok(results)
}
