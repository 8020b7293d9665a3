use anchor_lang::prelude::*;

#[error_code]
pub enum LedgerError {
    // === Authorization Errors (6000-6009) ===
    #[msg("Caller is not authorized to perform this action")]
    Unauthorized = 6000,

    // === Input Validation Errors (6010-6029) ===
    #[msg("Amount must be greater than zero")]
    ZeroAmount = 6010,

    #[msg("Fee exceeds maximum allowed (25%)")]
    FeeTooHigh = 6011,

    #[msg("Bank accounts do not match the position's active debts")]
    InvalidBankAccount = 6012,

    // === Registry Errors (6030-6049) ===
    #[msg("Bank is not listed")]
    UnknownBank = 6030,

    #[msg("Bank registry is full")]
    CapacityExceeded = 6031,

    #[msg("Market is already bound to a listed bank")]
    DuplicateMarket = 6032,

    // === Balance Errors (6050-6069) ===
    #[msg("Repayment exceeds outstanding debt")]
    OverRepayment = 6050,

    #[msg("Reserve balance too low")]
    InsufficientReserve = 6051,

    #[msg("Position still has outstanding debt")]
    PositionHasDebt = 6052,

    // === Pause / Serialization Errors (6080-6089) ===
    #[msg("Borrowing is paused")]
    ProtocolPaused = 6080,

    #[msg("Position already has an operation in flight")]
    PositionLocked = 6081,

    #[msg("Bank already has an operation in flight")]
    BankLocked = 6082,

    // === External Collaborator Errors (6090-6109) ===
    #[msg("External market call failed or returned an unexpected amount")]
    ExternalMarketFailure = 6090,

    #[msg("Oracle call failed or returned malformed data")]
    OracleFailure = 6091,

    // === Math Errors (6120-6139) ===
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow = 6120,

    #[msg("Math underflow")]
    MathUnderflow = 6121,

    #[msg("Division by zero")]
    DivisionByZero = 6122,

    #[msg("Amount exceeds u64 maximum")]
    AmountOverflow = 6123,
}
