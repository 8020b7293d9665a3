//! Account plumbing shared by the ledger instructions
//!
//! Multi-bank instructions take their banks as remaining accounts in
//! groups of four: `[bank (w), market program, market state (w), reserve
//! vault (w)]`.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::LedgerError;
use crate::interfaces::CpiMarket;
use crate::ledger::BankHandle;
use crate::state::Bank;

/// Accounts per bank in a remaining-accounts list
pub const BANK_GROUP_LEN: usize = 4;

/// Named accounts that reach one bank's external market
pub struct MarketAccounts<'a, 'info> {
    pub bank: &'a Account<'info, Bank>,
    pub market_program: &'a UncheckedAccount<'info>,
    pub market_state: &'a UncheckedAccount<'info>,
    pub reserve_vault: &'a InterfaceAccount<'info, TokenAccount>,
    pub token_program: &'a Interface<'info, TokenInterface>,
}

impl<'a, 'info> MarketAccounts<'a, 'info> {
    /// CPI market with no user token account attached (accrual only)
    pub fn cpi_market(&self) -> CpiMarket<'info> {
        CpiMarket {
            program: self.market_program.to_account_info(),
            market: self.market_state.to_account_info(),
            bank: self.bank.to_account_info(),
            market_ref: self.bank.market_ref,
            bank_bump: self.bank.bump,
            reserve_vault: self.reserve_vault.to_account_info(),
            token_program: self.token_program.to_account_info(),
            user_token_account: None,
            payer: None,
        }
    }
}

/// A bank loaded from remaining accounts with its market adapter
pub struct LoadedBank<'info> {
    pub bank: Account<'info, Bank>,
    pub market: CpiMarket<'info>,
}

/// Resolve `info` as a listed bank.
///
/// Anything else (unfunded address, foreign owner, other account type,
/// registered-but-unlisted) is `UnknownBank`.
pub fn get_bank<'info>(info: &'info AccountInfo<'info>) -> Result<Account<'info, Bank>> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return err!(LedgerError::UnknownBank);
    }
    let bank: Account<'info, Bank> =
        Account::try_from(info).map_err(|_| LedgerError::UnknownBank)?;
    require!(bank.listed, LedgerError::UnknownBank);
    Ok(bank)
}

/// Load and validate every bank group in `accounts`.
pub fn load_banks<'info>(
    accounts: &'info [AccountInfo<'info>],
    token_program: &AccountInfo<'info>,
) -> Result<Vec<LoadedBank<'info>>> {
    require!(
        accounts.len() % BANK_GROUP_LEN == 0,
        LedgerError::InvalidBankAccount
    );

    accounts
        .chunks(BANK_GROUP_LEN)
        .map(|group| load_bank(group, token_program))
        .collect()
}

fn load_bank<'info>(
    group: &'info [AccountInfo<'info>],
    token_program: &AccountInfo<'info>,
) -> Result<LoadedBank<'info>> {
    let (bank_info, program, state, vault) = (&group[0], &group[1], &group[2], &group[3]);

    require!(bank_info.is_writable, LedgerError::InvalidBankAccount);
    let bank = get_bank(bank_info)?;

    require_keys_eq!(program.key(), bank.market_program, LedgerError::InvalidBankAccount);
    require_keys_eq!(state.key(), bank.market_ref, LedgerError::InvalidBankAccount);

    let expected_vault = Pubkey::create_program_address(
        &[
            PROGRAM_SEED_PREFIX,
            Bank::RESERVE_VAULT_SEED,
            bank.market_ref.as_ref(),
            &[bank.reserve_vault_bump],
        ],
        &crate::ID,
    )
    .map_err(|_| LedgerError::InvalidBankAccount)?;
    require_keys_eq!(vault.key(), expected_vault, LedgerError::InvalidBankAccount);

    let market = CpiMarket {
        program: program.clone(),
        market: state.clone(),
        bank: bank_info.clone(),
        market_ref: bank.market_ref,
        bank_bump: bank.bump,
        reserve_vault: vault.clone(),
        token_program: token_program.clone(),
        user_token_account: None,
        payer: None,
    };

    Ok(LoadedBank { bank, market })
}

/// Borrow every loaded bank as a ledger handle
pub fn handles<'a, 'info>(
    loaded: &'a mut [LoadedBank<'info>],
) -> Vec<BankHandle<'a, &'a mut CpiMarket<'info>>> {
    loaded
        .iter_mut()
        .map(|LoadedBank { bank, market }| BankHandle {
            key: bank.key(),
            bank: &mut **bank,
            market,
        })
        .collect()
}

/// Persist every loaded bank
pub fn save_banks(loaded: &[LoadedBank<'_>]) -> Result<()> {
    for LoadedBank { bank, .. } in loaded {
        bank.exit(&crate::ID)?;
    }
    Ok(())
}
