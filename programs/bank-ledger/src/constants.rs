//! Protocol constants and configuration parameters

/// Program-specific seed prefix for all PDAs
pub const PROGRAM_SEED_PREFIX: &[u8] = b"bank_ledger_v1";

// === Registry Limits ===

/// Maximum number of banks that can ever be listed.
/// Also the width of the per-position active-debt bitmask.
pub const MAX_BANKS: usize = 256;

/// Number of u64 words backing the active-debt bitmask
pub const DEBT_MASK_WORDS: usize = MAX_BANKS / 64;

// === Fee Constants ===

/// Basis points denominator
pub const BPS: u64 = 10_000;

/// Default protocol fee taken from accrued interest (10%)
pub const DEFAULT_FEE_BPS: u64 = 1_000;

/// Maximum protocol fee (25% = 2500 basis points)
pub const MAX_FEE_BPS: u64 = 2_500;

// === Repayment ===

/// Sentinel amount meaning "repay the whole outstanding debt"
pub const REPAY_ALL: u128 = u128::MAX;

// === Safe Math Constants ===

/// Maximum value that fits in u64
pub const MAX_U64: u128 = u64::MAX as u128;

// === External Market Interface ===

/// Instruction discriminator for the external market's `borrow` entrypoint
/// (first 8 bytes of sha256("global:borrow"))
pub const MARKET_BORROW_IX: &str = "global:borrow";

/// Instruction discriminator preimage for the external market's `repay` entrypoint
pub const MARKET_REPAY_IX: &str = "global:repay";

/// Instruction discriminator preimage for the external market's `current_debt` view
pub const MARKET_CURRENT_DEBT_IX: &str = "global:current_debt";

/// Instruction discriminator preimage for the oracle's `get_price` view
pub const ORACLE_GET_PRICE_IX: &str = "global:get_price";
