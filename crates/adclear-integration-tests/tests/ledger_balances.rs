//! Integration test: ledger invariants under mixed writers.
//!
//! Ad income, bonus awards and withdrawals all append entries to the same
//! ledger; balances are always derived by aggregation. Verifies the
//! category filters (wallet vs bonus) and that non-accepted entries never
//! count.

use adclear_db::queries::{ledger, payments, users};
use adclear_rates::{SettlementConfig, StubExchangeRateSource, StubLicenseFeeSource};
use adclear_settle::PaymentProcessor;
use adclear_types::ledger::{LedgerEntryStatus, LedgerEntryType};
use adclear_types::payment::{EventType, PaidEventDetail};

const PAY_TIME: u64 = 1_700_000_000;

fn processor_sources() -> (StubExchangeRateSource, StubLicenseFeeSource, SettlementConfig) {
    let mut config = SettlementConfig::default();
    config.fees.operator_rate = Some(0.01);
    (
        StubExchangeRateSource::unavailable(),
        StubLicenseFeeSource::new(0.01, "0001-00000000-9B6F"),
        config,
    )
}

#[test]
fn balance_is_sum_of_all_writers() {
    let mut conn = adclear_db::open_memory().expect("db");

    let publisher = [4u8; 16];
    let user = users::insert(&conn, &publisher, None, 0).expect("user");

    // Ad income through the settlement engine.
    let payment_id =
        payments::insert(&conn, "0001:0000AAAA:0001", 10_000, "0001-00000001-8B4E", PAY_TIME)
            .expect("payment");
    let payment = payments::get(&conn, payment_id).expect("payment");
    let events = [PaidEventDetail {
        case_id: [1u8; 16],
        event_type: EventType::Click,
        banner_id: [2u8; 16],
        zone_id: [3u8; 16],
        publisher_id: publisher,
        event_value: 10_000,
    }];

    let (exchange, license, config) = processor_sources();
    let processor = PaymentProcessor::new(&exchange, &license, &config);
    processor
        .process_paid_events(&mut conn, &payment, PAY_TIME, &events, 0)
        .expect("settle");
    processor
        .add_ad_income_to_user_ledger(&mut conn, &payment)
        .expect("credit");

    // Other writers append their own entry types.
    ledger::insert_bonus(&conn, user, 500, PAY_TIME + 1).expect("bonus");
    ledger::insert_withdrawal(&conn, user, 1000, Some("batch-1"), PAY_TIME + 2)
        .expect("withdrawal");

    // 10000 -> license 100, operator floor(0.01 * 9900) = 99, net 9801.
    let ad_income = 9801i64;
    assert_eq!(
        ledger::balance_for(&conn, user).expect("total"),
        ad_income + 500 - 1000
    );
    assert_eq!(
        ledger::wallet_balance_for(&conn, user).expect("wallet"),
        ad_income - 1000
    );
    assert_eq!(ledger::bonus_balance_for(&conn, user).expect("bonus"), 500);

    // The derived balance matches a manual sum over accepted entries.
    let manual: i64 = ledger::entries_for_user(&conn, user)
        .expect("entries")
        .iter()
        .filter(|e| e.status == LedgerEntryStatus::Accepted)
        .map(|e| e.amount)
        .sum();
    assert_eq!(manual, ledger::balance_for(&conn, user).expect("total"));
}

#[test]
fn pending_and_rejected_entries_do_not_count() {
    let conn = adclear_db::open_memory().expect("db");
    let user = users::insert(&conn, &[7u8; 16], None, 0).expect("user");

    ledger::insert_bonus(&conn, user, 100, PAY_TIME).expect("accepted bonus");
    for status in [LedgerEntryStatus::Pending, LedgerEntryStatus::Rejected] {
        ledger::append(
            &conn,
            &ledger::NewLedgerEntry {
                user_id: user,
                amount: 10_000,
                entry_type: LedgerEntryType::Deposit,
                status,
                payment_id: None,
                batch_ref: None,
                created_at: PAY_TIME,
            },
        )
        .expect("append");
    }

    assert_eq!(ledger::balance_for(&conn, user).expect("total"), 100);
    assert_eq!(ledger::wallet_balance_for(&conn, user).expect("wallet"), 0);
    assert_eq!(ledger::bonus_balance_for(&conn, user).expect("bonus"), 100);
}

#[test]
fn ledger_entries_are_append_only_per_payment() {
    let conn = adclear_db::open_memory().expect("db");
    let user = users::insert(&conn, &[7u8; 16], None, 0).expect("user");
    let payment_id =
        payments::insert(&conn, "0001:0000BBBB:0001", 5000, "0001-00000001-8B4E", PAY_TIME)
            .expect("payment");

    let entry = ledger::NewLedgerEntry {
        user_id: user,
        amount: 4901,
        entry_type: LedgerEntryType::AdIncome,
        status: LedgerEntryStatus::Accepted,
        payment_id: Some(payment_id),
        batch_ref: None,
        created_at: PAY_TIME,
    };
    ledger::append(&conn, &entry).expect("first");
    assert!(ledger::append(&conn, &entry).is_err());

    // A different payment for the same user is a fresh entry.
    let other_payment =
        payments::insert(&conn, "0001:0000BBBB:0002", 5000, "0001-00000001-8B4E", PAY_TIME)
            .expect("payment 2");
    let mut second = entry.clone();
    second.payment_id = Some(other_payment);
    ledger::append(&conn, &second).expect("second payment credit");

    assert_eq!(ledger::balance_for(&conn, user).expect("total"), 2 * 4901);
}
