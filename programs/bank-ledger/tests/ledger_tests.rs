//! Ledger Tests for the Bank Ledger
//!
//! Drives borrow / repay / accrual / valuation end to end against
//! in-memory collaborators. No program deployment required.

use anchor_lang::error::{Error, ErrorOrigin};
use anchor_lang::prelude::*;
use proptest::collection::vec as pvec;
use proptest::prelude::*;

use bank_ledger::constants::{DEFAULT_FEE_BPS, REPAY_ALL};
use bank_ledger::errors::LedgerError;
use bank_ledger::interfaces::{DebtOracle, ExternalMarket, Recipient};
use bank_ledger::ledger::{
    accrue, accrue_many, borrow, debt_of, liquidation_repay, list_debts, repay,
    total_borrow_value, BankHandle, DebtEntry, RepayOutcome,
};
use bank_ledger::math::debt_from_shares_up;
use bank_ledger::state::{Bank, BankParams, BankRegistry, Position};

// ============================================================================
// Test Collaborators
// ============================================================================

/// External market that disburses and applies exactly what is asked,
/// unless told to withhold or fail
#[derive(Debug, Default)]
struct Market {
    debt: u128,
    withhold: u128,
    fail: bool,
    to_reserve: u128,
    to_positions: u128,
}

impl ExternalMarket for Market {
    fn current_debt(&mut self) -> Result<u128> {
        require!(!self.fail, LedgerError::ExternalMarketFailure);
        Ok(self.debt)
    }

    fn borrow(&mut self, amount: u128, to: Recipient) -> Result<u128> {
        require!(!self.fail, LedgerError::ExternalMarketFailure);
        let sent = amount.saturating_sub(self.withhold);
        self.debt += sent;
        match to {
            Recipient::Reserve => self.to_reserve += sent,
            Recipient::Position => self.to_positions += sent,
        }
        Ok(sent)
    }

    fn repay(&mut self, amount: u128) -> Result<u128> {
        require!(!self.fail, LedgerError::ExternalMarketFailure);
        let applied = amount.saturating_sub(self.withhold);
        self.debt = self.debt.saturating_sub(applied);
        Ok(applied)
    }
}

/// Prices every token at `numerator / denominator` common units
struct Oracle {
    numerator: u128,
    denominator: u128,
    calls: Vec<(Pubkey, u128, Pubkey)>,
}

impl DebtOracle for Oracle {
    fn value_in_common_unit(&mut self, token: &Pubkey, amount: u128, owner: &Pubkey) -> Result<u128> {
        self.calls.push((*token, amount, *owner));
        Ok(amount * self.numerator / self.denominator)
    }
}

// ============================================================================
// Test Environment
// ============================================================================

fn registry() -> BankRegistry {
    BankRegistry::new(255, Pubkey::new_unique(), DEFAULT_FEE_BPS).unwrap()
}

fn list_bank(registry: &mut BankRegistry) -> Bank {
    let mut bank = Bank::default();
    registry
        .register_bank(
            &mut bank,
            BankParams {
                bump: 255,
                market_ref: Pubkey::new_unique(),
                market_program: Pubkey::new_unique(),
                underlying_mint: Pubkey::new_unique(),
                reserve_vault_bump: 255,
            },
        )
        .unwrap();
    bank
}

/// Account name an error was tagged with, if any
fn failing_account(err: &Error) -> Option<String> {
    let origin = match err {
        Error::AnchorError(e) => e.error_origin.as_ref(),
        Error::ProgramError(e) => e.error_origin.as_ref(),
    };
    match origin {
        Some(ErrorOrigin::AccountName(name)) => Some(name.clone()),
        _ => None,
    }
}

fn new_position() -> Position {
    Position::new(255, Pubkey::new_unique(), 0)
}

fn handle<'a>(bank: &'a mut Bank, market: &'a mut Market) -> BankHandle<'a, &'a mut Market> {
    BankHandle {
        key: Pubkey::new_unique(),
        bank,
        market,
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// First borrow on an empty bank, then interest, then full repayment
    #[test]
    fn test_borrow_accrue_repay_cycle() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut position = new_position();
        let fee_bps = registry.fee_bps;

        // Empty bank: shares are minted 1:1
        let share = borrow(&mut handle(&mut bank, &mut market), &mut position, 1000, fee_bps).unwrap();
        assert_eq!(share, 1000);
        assert_eq!(bank.total_share, 1000);
        assert_eq!(bank.total_debt, 1000);
        assert!(position.debt_mask.test(bank.index));
        assert_eq!(market.to_positions, 1000);

        // Market reports 100 interest; 10% fee is borrowed into the reserve
        market.debt = 1100;
        let result = accrue(&mut bank, &mut market, fee_bps).unwrap();
        assert_eq!(result.interest, 100);
        assert_eq!(result.fee, 10);
        assert_eq!(bank.reserve, 10);
        assert_eq!(bank.total_debt, 1110);
        assert_eq!(bank.total_share, 1000);
        assert_eq!(market.to_reserve, 10);

        // ceil(1000 * 1110 / 1000)
        let owed = debt_of(&mut handle(&mut bank, &mut market), &position, fee_bps).unwrap();
        assert_eq!(owed, 1110);

        let outcome = repay(&mut handle(&mut bank, &mut market), &mut position, 1110, fee_bps).unwrap();
        assert_eq!(outcome, RepayOutcome { paid: 1110, share: 1000 });
        assert_eq!(bank.total_share, 0);
        assert!(!position.debt_mask.test(bank.index));
        assert!(!position.has_debt());
    }

    /// Two borrowers share the interest in proportion to their shares
    #[test]
    fn test_two_borrowers_split_interest() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut p1 = new_position();
        let mut p2 = new_position();

        let s1 = borrow(&mut handle(&mut bank, &mut market), &mut p1, 1000, DEFAULT_FEE_BPS).unwrap();
        let s2 = borrow(&mut handle(&mut bank, &mut market), &mut p2, 500, DEFAULT_FEE_BPS).unwrap();
        assert_eq!((s1, s2), (1000, 500));
        assert_eq!((bank.total_debt, bank.total_share), (1500, 1500));

        // 450 interest, fee floor(450 * 10%) = 45
        market.debt = 1950;
        let result = accrue(&mut bank, &mut market, DEFAULT_FEE_BPS).unwrap();
        assert_eq!(result.fee, 45);
        assert_eq!(bank.total_debt, 1995);
        assert_eq!(bank.total_share, 1500);

        let d1 = debt_of(&mut handle(&mut bank, &mut market), &p1, DEFAULT_FEE_BPS).unwrap();
        let d2 = debt_of(&mut handle(&mut bank, &mut market), &p2, DEFAULT_FEE_BPS).unwrap();
        assert_eq!((d1, d2), (1330, 665));
        assert!(d1 + d2 >= bank.total_debt);
    }

    /// Reading at a fixed ratio rounds each position up
    #[test]
    fn test_debt_read_rounds_up_per_position() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut p1 = new_position();
        let mut p2 = new_position();
        p1.credit_share(bank.index, 1000).unwrap();
        p2.credit_share(bank.index, 500).unwrap();
        bank.total_share = 1500;
        bank.total_debt = 1695;
        let mut market = Market { debt: 1695, ..Default::default() };

        let d1 = debt_of(&mut handle(&mut bank, &mut market), &p1, DEFAULT_FEE_BPS).unwrap();
        let d2 = debt_of(&mut handle(&mut bank, &mut market), &p2, DEFAULT_FEE_BPS).unwrap();
        assert_eq!((d1, d2), (1130, 565));
        assert!(d1 + d2 >= 1695);
        assert!(d1 + d2 - 1695 <= 2, "At most one unit of rounding per position");
    }

    #[test]
    fn test_repay_all_sentinel() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut position = new_position();

        borrow(&mut handle(&mut bank, &mut market), &mut position, 777, DEFAULT_FEE_BPS).unwrap();
        market.debt += 23;

        let outcome = repay(&mut handle(&mut bank, &mut market), &mut position, REPAY_ALL, DEFAULT_FEE_BPS).unwrap();
        // 23 interest, fee 2
        assert_eq!(outcome.paid, 802);
        assert_eq!(outcome.share, 777);
        assert_eq!(market.debt, 0);
        assert_eq!(bank.total_debt, 0);
        assert_eq!(bank.reserve, 2);
    }

    #[test]
    fn test_over_repayment_leaves_state_untouched() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut position = new_position();

        borrow(&mut handle(&mut bank, &mut market), &mut position, 1000, DEFAULT_FEE_BPS).unwrap();

        let err = repay(&mut handle(&mut bank, &mut market), &mut position, 1001, DEFAULT_FEE_BPS).unwrap_err();
        assert_eq!(err, Error::from(LedgerError::OverRepayment));
        assert_eq!(position.share_of(bank.index), 1000);
        assert_eq!(bank.total_debt, 1000);
        assert!(!position.is_locked());
        assert!(!bank.is_locked());
    }

    #[test]
    fn test_liquidator_repays_part_of_debt() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut position = new_position();

        borrow(&mut handle(&mut bank, &mut market), &mut position, 1000, DEFAULT_FEE_BPS).unwrap();
        market.debt = 1100;

        // After accrual total_debt = 1110; floor(555 * 1000 / 1110) = 500
        let outcome = liquidation_repay(&mut handle(&mut bank, &mut market), &mut position, 555, DEFAULT_FEE_BPS).unwrap();
        assert_eq!(outcome, RepayOutcome { paid: 555, share: 500 });
        assert_eq!(position.share_of(bank.index), 500);
        assert!(position.debt_mask.test(bank.index));
    }

    #[test]
    fn test_failed_disbursement_rolls_back_borrow() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market { withhold: 1, ..Default::default() };
        let mut position = new_position();

        let err = borrow(&mut handle(&mut bank, &mut market), &mut position, 1000, DEFAULT_FEE_BPS).unwrap_err();
        assert_eq!(err, Error::from(LedgerError::ExternalMarketFailure));
        assert_eq!((bank.total_debt, bank.total_share), (0, 0));
        assert!(!position.has_debt());
        assert!(position.mask_is_consistent());
    }

    #[test]
    fn test_locked_position_rejects_nested_borrow() {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut position = new_position();
        position.lock = 1;

        let err = borrow(&mut handle(&mut bank, &mut market), &mut position, 10, DEFAULT_FEE_BPS).unwrap_err();
        assert_eq!(err, Error::from(LedgerError::PositionLocked));
        assert_eq!(bank.total_debt, 0);
    }

    #[test]
    fn test_unlisted_bank_is_unknown() {
        let mut bank = Bank::default();
        let mut market = Market::default();
        let mut position = new_position();

        let err = borrow(&mut handle(&mut bank, &mut market), &mut position, 10, DEFAULT_FEE_BPS).unwrap_err();
        assert_eq!(err, Error::from(LedgerError::UnknownBank));
        let err = accrue(&mut bank, &mut market, DEFAULT_FEE_BPS).unwrap_err();
        assert_eq!(err, Error::from(LedgerError::UnknownBank));
    }
}

// ============================================================================
// Multi-Bank Tests
// ============================================================================

#[cfg(test)]
mod multi_bank_tests {
    use super::*;

    #[test]
    fn test_list_debts_and_value_across_banks() {
        let mut registry = registry();
        let mut banks: Vec<Bank> = (0..5).map(|_| list_bank(&mut registry)).collect();
        let mut markets: Vec<Market> = (0..5).map(|_| Market::default()).collect();
        let mut position = new_position();

        // Borrow from banks 4 and 1 only
        for (i, amount) in [(4usize, 400u128), (1, 100)] {
            borrow(&mut handle(&mut banks[i], &mut markets[i]), &mut position, amount, DEFAULT_FEE_BPS).unwrap();
        }
        let active: Vec<u8> = position.active_banks().collect();
        assert_eq!(active, vec![1, 4]);

        markets[4].debt = 500;

        let (low, high) = banks.split_at_mut(4);
        let (low_market, high_market) = markets.split_at_mut(4);
        let keys = [Pubkey::new_unique(), Pubkey::new_unique()];
        let mut handles = vec![
            BankHandle { key: keys[0], bank: &mut low[1], market: &mut low_market[1] },
            BankHandle { key: keys[1], bank: &mut high[0], market: &mut high_market[0] },
        ];

        let debts = list_debts(&position, &mut handles, DEFAULT_FEE_BPS).unwrap();
        assert_eq!(
            debts,
            vec![
                DebtEntry { bank: keys[0], index: 1, amount: 100 },
                // 100 interest + 10 fee
                DebtEntry { bank: keys[1], index: 4, amount: 510 },
            ]
        );

        // Half a common unit per underlying unit
        let mut oracle = Oracle { numerator: 1, denominator: 2, calls: Vec::new() };
        let value = total_borrow_value(&position, &mut handles, &mut oracle, DEFAULT_FEE_BPS).unwrap();
        assert_eq!(value, 50 + 255);
        assert_eq!(oracle.calls.len(), 2);
        assert!(oracle.calls.iter().all(|(_, _, owner)| *owner == position.owner));
    }

    #[test]
    fn test_list_debts_requires_banks_in_mask_order() {
        let mut registry = registry();
        let mut a = list_bank(&mut registry);
        let mut b = list_bank(&mut registry);
        let (mut ma, mut mb) = (Market::default(), Market::default());
        let mut position = new_position();

        borrow(&mut handle(&mut a, &mut ma), &mut position, 10, DEFAULT_FEE_BPS).unwrap();
        borrow(&mut handle(&mut b, &mut mb), &mut position, 10, DEFAULT_FEE_BPS).unwrap();

        // Reversed order
        let mut handles = vec![handle(&mut b, &mut mb), handle(&mut a, &mut ma)];
        let err = list_debts(&position, &mut handles, DEFAULT_FEE_BPS).unwrap_err();
        assert_eq!(err, Error::from(LedgerError::InvalidBankAccount));
    }

    #[test]
    fn test_accrue_many_fail_fast() {
        let mut registry = registry();
        let mut banks: Vec<Bank> = (0..3).map(|_| list_bank(&mut registry)).collect();
        let mut markets = vec![
            Market { debt: 100, ..Default::default() },
            Market { fail: true, ..Default::default() },
            Market { debt: 100, ..Default::default() },
        ];

        let mut handles: Vec<_> = banks
            .iter_mut()
            .zip(markets.iter_mut())
            .map(|(bank, market)| handle(bank, market))
            .collect();

        let failing = handles[1].key;
        let err = accrue_many(&mut handles, DEFAULT_FEE_BPS).unwrap_err();
        assert_eq!(err, Error::from(LedgerError::ExternalMarketFailure));
        assert_eq!(failing_account(&err), Some(failing.to_string()));
        drop(handles);

        // First bank accrued, the rest untouched
        assert_eq!(banks[0].total_debt, 110);
        assert_eq!(banks[1].total_debt, 0);
        assert_eq!(banks[2].total_debt, 0);
    }

    #[test]
    fn test_accrue_many_all_succeed() {
        let mut registry = registry();
        let mut banks: Vec<Bank> = (0..3).map(|_| list_bank(&mut registry)).collect();
        let mut markets: Vec<Market> = (0..3)
            .map(|i| Market { debt: 1000 * (i + 1), ..Default::default() })
            .collect();

        let mut handles: Vec<_> = banks
            .iter_mut()
            .zip(markets.iter_mut())
            .map(|(bank, market)| handle(bank, market))
            .collect();

        let results = accrue_many(&mut handles, DEFAULT_FEE_BPS).unwrap();
        let fees: Vec<u128> = results.iter().map(|r| r.fee).collect();
        assert_eq!(fees, vec![100, 200, 300]);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Borrow { who: usize, amount: u64 },
    Repay { who: usize, amount: u64, all: bool },
    Interest { amount: u32 },
    WriteDown { keep_bps: u16 },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 1..1_000_000_000u64).prop_map(|(who, amount)| Op::Borrow { who, amount }),
        (0..3usize, 1..1_000_000_000u64, any::<bool>())
            .prop_map(|(who, amount, all)| Op::Repay { who, amount, all }),
        any::<u32>().prop_map(|amount| Op::Interest { amount }),
        (0..=10_000u16).prop_map(|keep_bps| Op::WriteDown { keep_bps }),
    ]
}

proptest! {
    #[test]
    fn test_shares_and_mask_stay_consistent(ops in pvec(arb_op(), 1..40)) {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut positions: Vec<Position> = (0..3).map(|_| new_position()).collect();

        for op in ops {
            match op {
                Op::Borrow { who, amount } => {
                    let _ = borrow(&mut handle(&mut bank, &mut market), &mut positions[who], amount as u128, DEFAULT_FEE_BPS);
                }
                Op::Repay { who, amount, all } => {
                    let owed = debt_of(&mut handle(&mut bank, &mut market), &positions[who], DEFAULT_FEE_BPS).unwrap();
                    if positions[who].share_of(bank.index) > 0 {
                        let amount = if all || owed == 0 { REPAY_ALL } else { (amount as u128).min(owed) };
                        repay(&mut handle(&mut bank, &mut market), &mut positions[who], amount, DEFAULT_FEE_BPS).unwrap();
                    }
                }
                Op::Interest { amount } => {
                    market.debt += amount as u128;
                    accrue(&mut bank, &mut market, DEFAULT_FEE_BPS).unwrap();
                }
                Op::WriteDown { keep_bps } => {
                    market.debt = market.debt * keep_bps as u128 / 10_000;
                    accrue(&mut bank, &mut market, DEFAULT_FEE_BPS).unwrap();
                }
            }

            let shares: u128 = positions.iter().map(|p| p.share_of(bank.index)).sum();
            prop_assert_eq!(shares, bank.total_share);
            prop_assert_eq!(market.debt, bank.total_debt);
            prop_assert!(positions.iter().all(|p| p.mask_is_consistent()));
            prop_assert!(positions.iter().all(|p| !p.is_locked()));
            prop_assert!(!bank.is_locked());
        }
    }

    #[test]
    fn test_borrow_never_undercharges(
        total_debt in 1..1_000_000_000_000u128,
        total_share in 1..1_000_000_000_000u128,
        amount in 1..1_000_000_000u128,
    ) {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        bank.total_debt = total_debt;
        bank.total_share = total_share;
        let mut market = Market { debt: total_debt, ..Default::default() };
        let mut position = new_position();

        let share = borrow(&mut handle(&mut bank, &mut market), &mut position, amount, DEFAULT_FEE_BPS).unwrap();
        prop_assert!(share > 0);

        let owed = debt_from_shares_up(share, bank.total_debt, bank.total_share).unwrap();
        prop_assert!(owed >= amount);
    }

    #[test]
    fn test_partial_repay_never_understates_remaining_debt(
        borrowed in 2..1_000_000_000u128,
        interest in 0..1_000_000u128,
        fraction in 1..100u128,
    ) {
        let mut registry = registry();
        let mut bank = list_bank(&mut registry);
        let mut market = Market::default();
        let mut other = new_position();
        let mut position = new_position();

        borrow(&mut handle(&mut bank, &mut market), &mut other, 1_000_000, DEFAULT_FEE_BPS).unwrap();
        borrow(&mut handle(&mut bank, &mut market), &mut position, borrowed, DEFAULT_FEE_BPS).unwrap();
        market.debt += interest;

        let before = debt_of(&mut handle(&mut bank, &mut market), &position, DEFAULT_FEE_BPS).unwrap();
        let paid = (before * fraction / 100).max(1);
        prop_assume!(paid < before);

        repay(&mut handle(&mut bank, &mut market), &mut position, paid, DEFAULT_FEE_BPS).unwrap();
        let after = debt_of(&mut handle(&mut bank, &mut market), &position, DEFAULT_FEE_BPS).unwrap();

        prop_assert!(after + paid >= before);
        prop_assert!(position.share_of(bank.index) > 0);
    }
}
