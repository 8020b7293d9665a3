//! Registry administration
//!
//! - Initialize the registry
//! - Fee configuration
//! - Borrow pause

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::events::*;
use crate::state::BankRegistry;

// ============================================================================
// Initialize
// ============================================================================

#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = BankRegistry::space(),
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump,
    )]
    pub registry: Account<'info, BankRegistry>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_registry(
    ctx: Context<InitializeRegistry>,
    governor: Pubkey,
    fee_bps: u64,
) -> Result<()> {
    let registry = BankRegistry::new(ctx.bumps.registry, governor, fee_bps)?;
    ctx.accounts.registry.set_inner(registry);

    emit!(RegistryInitialized { governor, fee_bps });
    Ok(())
}

// ============================================================================
// Governor Controls
// ============================================================================

#[derive(Accounts)]
pub struct GovernRegistry<'info> {
    pub governor: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, BankRegistry::SEED],
        bump = registry.bump,
        constraint = registry.governor == governor.key() @ LedgerError::Unauthorized,
    )]
    pub registry: Account<'info, BankRegistry>,
}

pub fn set_fee(ctx: Context<GovernRegistry>, fee_bps: u64) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    let old_fee_bps = registry.fee_bps;
    registry.set_fee(fee_bps)?;

    emit!(FeeSet {
        old_fee_bps,
        new_fee_bps: fee_bps,
    });
    Ok(())
}

pub fn set_paused(ctx: Context<GovernRegistry>, paused: bool) -> Result<()> {
    ctx.accounts.registry.paused = paused;

    emit!(PausedSet { paused });
    Ok(())
}
