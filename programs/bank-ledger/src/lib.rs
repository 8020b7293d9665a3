//! Multi-Bank Debt Ledger on Solana
//!
//! Tracks how much every position owes to each of up to 256 external
//! lending markets ("banks"). The ledger borrows from the markets on the
//! positions' behalf and splits each bank's debt into shares.
//!
//! ## Features
//! - Share-based debt accounting, rounding always in the protocol's favor
//! - Interest pulled from the external market, with a protocol fee
//!   collected into a per-bank reserve
//! - 256-bit active-debt mask per position for O(k) enumeration
//! - Oracle-valued total debt across banks
//! - CEI pattern plus per-position/per-bank locks against re-entry
//! - Governor-controlled fee, borrow pause and reserve withdrawal

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod state;
pub mod interfaces;
pub mod ledger;
pub mod instructions;

use instructions::*;
use ledger::{DebtEntry, RepayOutcome};
use math::AccrualResult;

declare_id!("58mSV18PzCf9K1eP5w7YdW68mfMrodEaqHxCqo9DBzcw");

#[program]
pub mod bank_ledger {
    use super::*;

    // =========================================================================
    // Admin Instructions
    // =========================================================================

    pub fn initialize_registry(
        ctx: Context<InitializeRegistry>,
        governor: Pubkey,
        fee_bps: u64,
    ) -> Result<()> {
        instructions::admin::initialize_registry(ctx, governor, fee_bps)
    }

    pub fn set_fee(ctx: Context<GovernRegistry>, fee_bps: u64) -> Result<()> {
        instructions::admin::set_fee(ctx, fee_bps)
    }

    pub fn set_paused(ctx: Context<GovernRegistry>, paused: bool) -> Result<()> {
        instructions::admin::set_paused(ctx, paused)
    }

    pub fn register_bank(ctx: Context<RegisterBank>, market_ref: Pubkey) -> Result<Pubkey> {
        instructions::bank::register_bank(ctx, market_ref)
    }

    pub fn withdraw_reserve(ctx: Context<WithdrawReserve>, amount: u128) -> Result<()> {
        instructions::reserve::withdraw_reserve(ctx, amount)
    }

    // =========================================================================
    // Position Instructions
    // =========================================================================

    pub fn create_position(ctx: Context<CreatePosition>, position_id: u64) -> Result<()> {
        instructions::position::create_position(ctx, position_id)
    }

    pub fn close_position(ctx: Context<ClosePosition>) -> Result<()> {
        instructions::position::close_position(ctx)
    }

    // =========================================================================
    // Accrual Instructions
    // =========================================================================

    pub fn accrue(ctx: Context<Accrue>) -> Result<AccrualResult> {
        instructions::accrue::accrue(ctx)
    }

    pub fn accrue_many<'info>(
        ctx: Context<'_, '_, 'info, 'info, AccrueMany<'info>>,
    ) -> Result<Vec<AccrualResult>> {
        instructions::accrue::accrue_many(ctx)
    }

    // =========================================================================
    // Borrow / Repay Instructions
    // =========================================================================

    pub fn borrow(ctx: Context<Borrow>, amount: u128) -> Result<u128> {
        instructions::borrow::borrow(ctx, amount)
    }

    pub fn repay(ctx: Context<Repay>, amount: u128) -> Result<RepayOutcome> {
        instructions::repay::repay(ctx, amount)
    }

    pub fn liquidation_repay(ctx: Context<Repay>, amount: u128) -> Result<RepayOutcome> {
        instructions::repay::liquidation_repay(ctx, amount)
    }

    // =========================================================================
    // Read Instructions
    // =========================================================================

    pub fn debt_of(ctx: Context<DebtOf>) -> Result<u128> {
        instructions::views::debt_of(ctx)
    }

    pub fn list_debts<'info>(
        ctx: Context<'_, '_, 'info, 'info, ListDebts<'info>>,
    ) -> Result<Vec<DebtEntry>> {
        instructions::views::list_debts(ctx)
    }

    pub fn total_borrow_value<'info>(
        ctx: Context<'_, '_, 'info, 'info, TotalBorrowValue<'info>>,
    ) -> Result<u128> {
        instructions::views::total_borrow_value(ctx)
    }
}
