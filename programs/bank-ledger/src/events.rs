use anchor_lang::prelude::*;

// === Registry Events ===

#[event]
pub struct RegistryInitialized {
    pub governor: Pubkey,
    pub fee_bps: u64,
}

#[event]
pub struct FeeSet {
    pub old_fee_bps: u64,
    pub new_fee_bps: u64,
}

#[event]
pub struct PausedSet {
    pub paused: bool,
}

#[event]
pub struct BankRegistered {
    pub bank: Pubkey,
    pub index: u8,
    pub market_ref: Pubkey,
    pub market_program: Pubkey,
    pub underlying_mint: Pubkey,
}

// === Position Events ===

#[event]
pub struct PositionCreated {
    pub position: Pubkey,
    pub owner: Pubkey,
    pub position_id: u64,
}

#[event]
pub struct PositionClosed {
    pub position: Pubkey,
    pub owner: Pubkey,
}

// === Ledger Events ===

#[event]
pub struct InterestAccrued {
    pub bank: Pubkey,
    pub interest: u128,
    pub fee: u128,
    pub total_debt: u128,
    pub reserve: u128,
}

#[event]
pub struct Borrow {
    pub bank: Pubkey,
    pub position: Pubkey,
    pub amount: u128,
    pub share: u128,
}

#[event]
pub struct Repay {
    pub bank: Pubkey,
    pub position: Pubkey,
    pub payer: Pubkey,
    pub paid: u128,
    pub share: u128,
}

#[event]
pub struct LiquidationRepay {
    pub bank: Pubkey,
    pub position: Pubkey,
    pub liquidator: Pubkey,
    pub paid: u128,
    pub share: u128,
}

#[event]
pub struct ReserveWithdrawn {
    pub bank: Pubkey,
    pub amount: u128,
    pub reserve: u128,
}
