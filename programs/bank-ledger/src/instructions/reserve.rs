//! Reserve withdrawal (governor only)

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::events::{InterestAccrued, ReserveWithdrawn};
use crate::ledger;
use crate::math::{checked_sub, safe_u128_to_u64};
use crate::state::{Bank, BankRegistry};
use super::utils::MarketAccounts;

#[derive(Accounts)]
pub struct WithdrawReserve<'info> {
    pub governor: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
        constraint = registry.governor == governor.key() @ LedgerError::Unauthorized,
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

    #[account(address = bank.underlying_mint)]
    pub underlying_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = receiver_token_account.mint == bank.underlying_mint,
    )]
    pub receiver_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn withdraw_reserve(ctx: Context<WithdrawReserve>, amount: u128) -> Result<()> {
    // ===== CHECKS =====
    require!(amount > 0, LedgerError::ZeroAmount);
    let fee_bps = ctx.accounts.registry.fee_bps;

    let mut market = MarketAccounts {
        bank: &ctx.accounts.bank,
        market_program: &ctx.accounts.market_program,
        market_state: &ctx.accounts.market_state,
        reserve_vault: &ctx.accounts.reserve_vault,
        token_program: &ctx.accounts.token_program,
    }
    .cpi_market();

    // Fees collected up to now become withdrawable
    let accrued = ledger::accrue(&mut ctx.accounts.bank, &mut market, fee_bps)?;
    if accrued.fee > 0 {
        emit!(InterestAccrued {
            bank: ctx.accounts.bank.key(),
            interest: accrued.interest,
            fee: accrued.fee,
            total_debt: ctx.accounts.bank.total_debt,
            reserve: ctx.accounts.bank.reserve,
        });
    }

    let bank = &mut ctx.accounts.bank;
    require!(amount <= bank.reserve, LedgerError::InsufficientReserve);

    // ===== EFFECTS =====
    bank.reserve = checked_sub(bank.reserve, amount)?;

    // ===== INTERACTIONS =====
    let market_ref = bank.market_ref;
    let bump = [bank.bump];
    let seeds: &[&[u8]] = &[
        PROGRAM_SEED_PREFIX,
        Bank::SEED,
        market_ref.as_ref(),
        &bump,
    ];

    transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.reserve_vault.to_account_info(),
                to: ctx.accounts.receiver_token_account.to_account_info(),
                authority: ctx.accounts.bank.to_account_info(),
                mint: ctx.accounts.underlying_mint.to_account_info(),
            },
            &[seeds],
        ),
        safe_u128_to_u64(amount)?,
        ctx.accounts.underlying_mint.decimals,
    )?;

    emit!(ReserveWithdrawn {
        bank: ctx.accounts.bank.key(),
        amount,
        reserve: ctx.accounts.bank.reserve,
    });
    Ok(())
}
