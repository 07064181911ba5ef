//! The two-phase payment batch processor.

use rusqlite::Connection;

use adclear_db::queries::{distributions, ledger, users};
use adclear_db::DbError;
use adclear_fees::compute_fees;
use adclear_rates::{ExchangeRate, ExchangeRateSource, LicenseFeeSource, OperatorConfigSource};
use adclear_types::ledger::{LedgerEntryStatus, LedgerEntryType};
use adclear_types::payment::{IncomingPayment, PaidEventDetail};

use crate::{Result, SettleError, SettlementSummary};

/// Settles incoming payments against their attributed ad events.
///
/// Holds only the collaborator interfaces; the database connection is
/// passed per call so one processor can serve many payments and callers
/// control connection lifetime.
pub struct PaymentProcessor<'a> {
    exchange_rates: &'a dyn ExchangeRateSource,
    license: &'a dyn LicenseFeeSource,
    config: &'a dyn OperatorConfigSource,
}

impl<'a> PaymentProcessor<'a> {
    pub fn new(
        exchange_rates: &'a dyn ExchangeRateSource,
        license: &'a dyn LicenseFeeSource,
        config: &'a dyn OperatorConfigSource,
    ) -> Self {
        Self {
            exchange_rates,
            license,
            config,
        }
    }

    /// Phase 1: split every paid event of `payment` and persist one
    /// distribution row per event, atomically.
    ///
    /// Events already settled for this payment (redelivery, crash retry)
    /// are skipped and excluded from the returned summary. Any other
    /// per-event failure rolls the whole batch back.
    ///
    /// `fee_offset` seeds the license-fee partial sum for chunked
    /// processing of one payment's event list; pass 0 for a single-call
    /// batch.
    ///
    /// # Errors
    ///
    /// - [`SettleError::MissingConfiguration`] if the operator fee rate or
    ///   the license fee cannot be obtained (checked before any write)
    /// - [`SettleError::Fee`] if a configured rate is outside `[0, 1)`
    /// - [`SettleError::Db`] on persistence failure (transaction rolled
    ///   back)
    pub fn process_paid_events(
        &self,
        conn: &mut Connection,
        payment: &IncomingPayment,
        pay_time: u64,
        events: &[PaidEventDetail],
        fee_offset: u64,
    ) -> Result<SettlementSummary> {
        // Fail fast on configuration before touching the database.
        let license_rate = self
            .license
            .fee()
            .map_err(|e| SettleError::MissingConfiguration(e.to_string()))?;
        let operator_rate = self
            .config
            .operator_fee_rate()
            .map_err(|e| SettleError::MissingConfiguration(e.to_string()))?;

        // The exchange rate is advisory bookkeeping; settle without it.
        let exchange_rate = self.fetch_exchange_rate_opt(&payment.txid);

        let tx = conn.transaction().map_err(DbError::Sqlite)?;
        let mut summary = SettlementSummary::seeded(fee_offset);

        for event in events {
            if distributions::exists(&tx, payment.id, &event.case_id)? {
                tracing::debug!(
                    txid = %payment.txid,
                    case = %hex::encode(event.case_id),
                    "distribution already exists, skipping"
                );
                continue;
            }

            let split = compute_fees(event.event_value, license_rate, operator_rate)?;

            let insert = distributions::insert(
                &tx,
                &distributions::NewDistribution {
                    payment_id: payment.id,
                    event,
                    pay_time,
                    license_fee: split.license_fee,
                    operator_fee: split.operator_fee,
                    paid_amount: split.net_amount,
                    exchange_rate: exchange_rate.as_ref().map(|r| r.value),
                    paid_amount_currency: exchange_rate
                        .as_ref()
                        .map(|r| r.to_currency(split.net_amount)),
                },
            );
            match insert {
                Ok(_) => summary.record(event.event_value, split.license_fee),
                // Concurrent settlement of the same batch; the other
                // writer's row stands.
                Err(DbError::Duplicate(_)) => {
                    tracing::debug!(
                        txid = %payment.txid,
                        case = %hex::encode(event.case_id),
                        "concurrent duplicate distribution, skipping"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }

        tx.commit().map_err(DbError::Sqlite)?;

        tracing::info!(
            txid = %payment.txid,
            events = events.len(),
            settled = summary.processed_count(),
            event_value = summary.event_value_partial_sum(),
            license_fee = summary.license_fee_partial_sum(),
            "payment batch settled"
        );

        Ok(summary)
    }

    /// Phase 2: credit each registered publisher the sum of net amounts
    /// across this payment's distributions, one ledger entry per user.
    ///
    /// Publishers with no registered account are skipped: their share
    /// stays accounted in the distribution rows but is credited to no
    /// balance. Re-invocation is a no-op thanks to the one-entry-per-user
    /// -per-payment uniqueness.
    ///
    /// # Errors
    ///
    /// - [`SettleError::Db`] on persistence failure (transaction rolled
    ///   back)
    pub fn add_ad_income_to_user_ledger(
        &self,
        conn: &mut Connection,
        payment: &IncomingPayment,
    ) -> Result<()> {
        let tx = conn.transaction().map_err(DbError::Sqlite)?;
        let now = unix_now();

        let totals = distributions::net_by_publisher(&tx, payment.id)?;
        let mut credited = 0u64;

        for (publisher, net_amount) in totals {
            let Some(user_id) = users::resolve_publisher(&tx, &publisher)? else {
                tracing::info!(
                    txid = %payment.txid,
                    publisher = %hex::encode(publisher),
                    net_amount,
                    "publisher has no account, ad income not credited"
                );
                continue;
            };

            let append = ledger::append(
                &tx,
                &ledger::NewLedgerEntry {
                    user_id,
                    amount: net_amount as i64,
                    entry_type: LedgerEntryType::AdIncome,
                    status: LedgerEntryStatus::Accepted,
                    payment_id: Some(payment.id),
                    batch_ref: None,
                    created_at: now,
                },
            );
            match append {
                Ok(_) => credited += 1,
                Err(DbError::Duplicate(_)) => {
                    tracing::debug!(
                        txid = %payment.txid,
                        user_id,
                        "ad income already credited, skipping"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }

        tx.commit().map_err(DbError::Sqlite)?;

        tracing::info!(txid = %payment.txid, credited, "ad income posted to user ledgers");
        Ok(())
    }

    fn fetch_exchange_rate_opt(&self, txid: &str) -> Option<ExchangeRate> {
        match self.exchange_rates.fetch_exchange_rate() {
            Ok(rate) => Some(rate),
            Err(e) => {
                tracing::warn!(
                    txid = %txid,
                    error = %e,
                    "exchange rate unavailable, settling without currency bookkeeping"
                );
                None
            }
        }
    }
}

/// Current Unix time in seconds.
fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
