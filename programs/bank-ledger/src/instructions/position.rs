//! Position management instructions (create, close)

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::events::{PositionClosed, PositionCreated};
use crate::state::Position;

// ============================================================================
// Create Position
// ============================================================================

#[derive(Accounts)]
#[instruction(position_id: u64)]
pub struct CreatePosition<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: Position owner - can be any account
    pub owner: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        space = Position::space(),
        seeds = [
            PROGRAM_SEED_PREFIX,
            Position::SEED,
            owner.key().as_ref(),
            &position_id.to_le_bytes(),
        ],
        bump,
    )]
    pub position: AccountLoader<'info, Position>,

    pub system_program: Program<'info, System>,
}

pub fn create_position(ctx: Context<CreatePosition>, position_id: u64) -> Result<()> {
    // Freshly created: shares, mask and lock are already zero
    let owner = ctx.accounts.owner.key();
    {
        let mut position = ctx.accounts.position.load_init()?;
        position.bump = ctx.bumps.position;
        position.owner = owner;
        position.position_id = position_id;
    }

    emit!(PositionCreated {
        position: ctx.accounts.position.key(),
        owner,
        position_id,
    });
    Ok(())
}

// ============================================================================
// Close Position
// ============================================================================

#[derive(Accounts)]
pub struct ClosePosition<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: Rent receiver - can be any account
    #[account(mut)]
    pub rent_receiver: UncheckedAccount<'info>,

    #[account(
        mut,
        close = rent_receiver,
        constraint = position.load()?.owner == owner.key() @ LedgerError::Unauthorized,
        constraint = !position.load()?.has_debt() @ LedgerError::PositionHasDebt,
    )]
    pub position: AccountLoader<'info, Position>,
}

pub fn close_position(ctx: Context<ClosePosition>) -> Result<()> {
    emit!(PositionClosed {
        position: ctx.accounts.position.key(),
        owner: ctx.accounts.owner.key(),
    });
    Ok(())
}
