//! Interest accrual against the external market

use anchor_lang::prelude::*;
use crate::errors::LedgerError;
use crate::interfaces::{ExternalMarket, Recipient};
use crate::math::{checked_add, compute_accrual, AccrualResult};
use crate::state::Bank;
use super::BankHandle;

/// Sync `bank` with the market's authoritative debt and collect the fee.
///
/// The fee is borrowed from the market into the bank's reserve vault in the
/// same step, so the market's figure and `total_debt` agree afterwards.
pub fn accrue<M: ExternalMarket>(
    bank: &mut Bank,
    market: &mut M,
    fee_bps: u64,
) -> Result<AccrualResult> {
    require!(bank.listed, LedgerError::UnknownBank);
    require!(!bank.is_locked(), LedgerError::BankLocked);

    let observed = market.current_debt()?;
    let result = compute_accrual(bank.total_debt, observed, fee_bps)?;

    if observed < bank.total_debt {
        msg!(
            "Bank {} external debt decreased: recorded {} observed {}",
            bank.index,
            bank.total_debt,
            observed
        );
    }

    if result.fee == 0 {
        bank.total_debt = result.total_debt;
        return Ok(result);
    }

    let (total_debt, reserve) = (bank.total_debt, bank.reserve);
    bank.lock = 1;
    let applied = apply_fee(bank, market, &result);
    bank.lock = 0;

    if let Err(e) = applied {
        bank.total_debt = total_debt;
        bank.reserve = reserve;
        return Err(e);
    }
    Ok(result)
}

fn apply_fee<M: ExternalMarket>(
    bank: &mut Bank,
    market: &mut M,
    result: &AccrualResult,
) -> Result<()> {
    bank.total_debt = result.total_debt;
    bank.reserve = checked_add(bank.reserve, result.fee)?;

    let disbursed = market.borrow(result.fee, Recipient::Reserve)?;
    require!(disbursed == result.fee, LedgerError::ExternalMarketFailure);
    Ok(())
}

/// Accrue every bank in order, stopping at the first failure.
///
/// Banks accrued before the failing one keep their accrual; the error
/// carries the failing bank's address.
pub fn accrue_many<M: ExternalMarket>(
    handles: &mut [BankHandle<'_, M>],
    fee_bps: u64,
) -> Result<Vec<AccrualResult>> {
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles.iter_mut() {
        let result = accrue(handle.bank, &mut handle.market, fee_bps)
            .map_err(|e| e.with_account_name(handle.key.to_string()))?;
        results.push(result);
    }
    Ok(results)
}
