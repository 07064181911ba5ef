//! User ledger model.
//!
//! A user's balance is the sum of their ledger entry amounts — there is no
//! stored balance counter anywhere in the system. Entries are append-only
//! and immutable; every balance-affecting operation (ad income, bonus
//! award, withdrawal) appends its own entry instead of rewriting shared
//! state, which is what keeps concurrent writers from losing updates.

use serde::{Deserialize, Serialize};

use crate::{PaymentId, Result, TypeError, UserId};

/// The kind of balance change a ledger entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEntryType {
    /// On-chain deposit credited to the user's wallet.
    Deposit,
    /// Withdrawal to an external address.
    Withdrawal,
    /// Publisher income from settled ad events.
    AdIncome,
    /// Advertiser spend on served ads.
    AdExpense,
    /// Promotional bonus credit.
    BonusIncome,
    /// Spend drawn from bonus funds.
    BonusExpense,
}

impl LedgerEntryType {
    /// Stable integer code used in the database.
    pub fn code(self) -> i64 {
        match self {
            LedgerEntryType::Deposit => 1,
            LedgerEntryType::Withdrawal => 2,
            LedgerEntryType::AdIncome => 3,
            LedgerEntryType::AdExpense => 4,
            LedgerEntryType::BonusIncome => 5,
            LedgerEntryType::BonusExpense => 6,
        }
    }

    /// Decode the stable integer code.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(LedgerEntryType::Deposit),
            2 => Ok(LedgerEntryType::Withdrawal),
            3 => Ok(LedgerEntryType::AdIncome),
            4 => Ok(LedgerEntryType::AdExpense),
            5 => Ok(LedgerEntryType::BonusIncome),
            6 => Ok(LedgerEntryType::BonusExpense),
            other => Err(TypeError::UnknownEntryType(other)),
        }
    }

    /// Whether this entry counts toward the bonus balance rather than the
    /// withdrawable wallet balance.
    pub fn is_bonus(self) -> bool {
        matches!(
            self,
            LedgerEntryType::BonusIncome | LedgerEntryType::BonusExpense
        )
    }
}

/// Processing status of a ledger entry.
///
/// Only [`Accepted`](LedgerEntryStatus::Accepted) entries contribute to
/// balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEntryStatus {
    Pending,
    Accepted,
    Rejected,
}

impl LedgerEntryStatus {
    /// Stable integer code used in the database.
    pub fn code(self) -> i64 {
        match self {
            LedgerEntryStatus::Pending => 0,
            LedgerEntryStatus::Accepted => 1,
            LedgerEntryStatus::Rejected => 2,
        }
    }

    /// Decode the stable integer code.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(LedgerEntryStatus::Pending),
            1 => Ok(LedgerEntryStatus::Accepted),
            2 => Ok(LedgerEntryStatus::Rejected),
            other => Err(TypeError::UnknownEntryStatus(other)),
        }
    }
}

/// An immutable balance-change record for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Database identifier.
    pub id: i64,
    /// The user whose balance this entry affects.
    pub user_id: UserId,
    /// Signed amount in smallest units; positive credits, negative debits.
    pub amount: i64,
    pub entry_type: LedgerEntryType,
    pub status: LedgerEntryStatus,
    /// The originating payment for ad-income entries. Together with
    /// `user_id` this forms the idempotence key for ledger crediting.
    pub payment_id: Option<PaymentId>,
    /// External batch-withdrawal reference for withdrawal entries.
    pub batch_ref: Option<String>,
    /// Unix timestamp when the entry was appended.
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_codes_roundtrip() {
        for ty in [
            LedgerEntryType::Deposit,
            LedgerEntryType::Withdrawal,
            LedgerEntryType::AdIncome,
            LedgerEntryType::AdExpense,
            LedgerEntryType::BonusIncome,
            LedgerEntryType::BonusExpense,
        ] {
            assert_eq!(LedgerEntryType::from_code(ty.code()).expect("decode"), ty);
        }
    }

    #[test]
    fn test_unknown_entry_type_rejected() {
        assert!(LedgerEntryType::from_code(99).is_err());
    }

    #[test]
    fn test_status_codes_roundtrip() {
        for status in [
            LedgerEntryStatus::Pending,
            LedgerEntryStatus::Accepted,
            LedgerEntryStatus::Rejected,
        ] {
            assert_eq!(
                LedgerEntryStatus::from_code(status.code()).expect("decode"),
                status
            );
        }
    }

    #[test]
    fn test_bonus_category() {
        assert!(LedgerEntryType::BonusIncome.is_bonus());
        assert!(LedgerEntryType::BonusExpense.is_bonus());
        assert!(!LedgerEntryType::AdIncome.is_bonus());
        assert!(!LedgerEntryType::Withdrawal.is_bonus());
    }
}
