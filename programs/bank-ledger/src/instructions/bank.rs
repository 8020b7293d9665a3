//! Bank registration

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::events::BankRegistered;
use crate::state::{Bank, BankParams, BankRegistry};

#[derive(Accounts)]
#[instruction(market_ref: Pubkey)]
pub struct RegisterBank<'info> {
    #[account(mut)]
    pub governor: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
        constraint = registry.governor == governor.key() @ LedgerError::Unauthorized,
    )]
    pub registry: Box<Account<'info, BankRegistry>>,

    /// An already-listed bank here means `market_ref` is taken
    #[account(
        init_if_needed,
        payer = governor,
        space = Bank::space(),
        seeds = [PROGRAM_SEED_PREFIX, Bank::SEED, market_ref.as_ref()],
        bump,
        constraint = !bank.listed @ LedgerError::DuplicateMarket,
    )]
    pub bank: Box<Account<'info, Bank>>,

    /// CHECK: External market program, recorded for later CPI validation
    #[account(executable)]
    pub market_program: UncheckedAccount<'info>,

    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = governor,
        token::mint = underlying_mint,
        token::authority = bank,
        token::token_program = token_program,
        seeds = [PROGRAM_SEED_PREFIX, Bank::RESERVE_VAULT_SEED, market_ref.as_ref()],
        bump,
    )]
    pub reserve_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Returns the bank identifier (the bank account address)
pub fn register_bank(ctx: Context<RegisterBank>, market_ref: Pubkey) -> Result<Pubkey> {
    let params = BankParams {
        bump: ctx.bumps.bank,
        market_ref,
        market_program: ctx.accounts.market_program.key(),
        underlying_mint: ctx.accounts.underlying_mint.key(),
        reserve_vault_bump: ctx.bumps.reserve_vault,
    };

    let accounts = &mut *ctx.accounts;
    let index = accounts.registry.register_bank(&mut accounts.bank, params)?;
    let bank = accounts.bank.key();

    emit!(BankRegistered {
        bank,
        index,
        market_ref,
        market_program: params.market_program,
        underlying_mint: params.underlying_mint,
    });
    Ok(bank)
}
