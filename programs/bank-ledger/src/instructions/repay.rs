//! Repay and liquidation-repay instructions
//!
//! Anyone may repay a position's debt; the payer funds the repayment from
//! their own token account. Liquidation eligibility is decided by the
//! calling program before it reaches `liquidation_repay`.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::events;
use crate::interfaces::CpiMarket;
use crate::ledger::{self, BankHandle, RepayOutcome};
use crate::state::{Bank, BankRegistry, Position};
use super::utils::MarketAccounts;

#[derive(Accounts)]
pub struct Repay<'info> {
    pub payer: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, BankRegistry>,

    #[account(mut)]
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

    /// Funds the repayment
    #[account(
        mut,
        constraint = payer_token_account.mint == bank.underlying_mint,
        constraint = payer_token_account.owner == payer.key() @ LedgerError::Unauthorized,
    )]
    pub payer_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> Repay<'info> {
    fn market(&self) -> CpiMarket<'info> {
        let mut market = MarketAccounts {
            bank: &self.bank,
            market_program: &self.market_program,
            market_state: &self.market_state,
            reserve_vault: &self.reserve_vault,
            token_program: &self.token_program,
        }
        .cpi_market();
        market.user_token_account = Some(self.payer_token_account.to_account_info());
        market.payer = Some(self.payer.to_account_info());
        market
    }
}

/// Settle through `op` with the accounts wired to the bank's market
fn settle<'info>(
    accounts: &mut Repay<'info>,
    op: impl FnOnce(&mut BankHandle<'_, CpiMarket<'info>>, &mut Position) -> Result<RepayOutcome>,
) -> Result<RepayOutcome> {
    let market = accounts.market();
    let mut position = accounts.position.load_mut()?;
    let mut handle = BankHandle {
        key: accounts.bank.key(),
        bank: &mut accounts.bank,
        market,
    };
    op(&mut handle, &mut *position)
}

pub fn repay(ctx: Context<Repay>, amount: u128) -> Result<RepayOutcome> {
    let fee_bps = ctx.accounts.registry.fee_bps;
    let outcome = settle(ctx.accounts, |handle, position| {
        ledger::repay(handle, position, amount, fee_bps)
    })?;

    emit!(events::Repay {
        bank: ctx.accounts.bank.key(),
        position: ctx.accounts.position.key(),
        payer: ctx.accounts.payer.key(),
        paid: outcome.paid,
        share: outcome.share,
    });
    Ok(outcome)
}

pub fn liquidation_repay(ctx: Context<Repay>, amount: u128) -> Result<RepayOutcome> {
    let fee_bps = ctx.accounts.registry.fee_bps;
    let outcome = settle(ctx.accounts, |handle, position| {
        ledger::liquidation_repay(handle, position, amount, fee_bps)
    })?;

    emit!(events::LiquidationRepay {
        bank: ctx.accounts.bank.key(),
        position: ctx.accounts.position.key(),
        liquidator: ctx.accounts.payer.key(),
        paid: outcome.paid,
        share: outcome.share,
    });
    Ok(outcome)
}
