//! Scenario tests for the reporting projector.
//!
//! The key property is the statement round trip: replaying the ledger over a
//! window whose end covers the latest transaction must reproduce the wallet's
//! live balance as the closing balance.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::errors::{DatabaseError, Error, Result};
    use crate::ledger::{
        BalanceUpdate, LedgerRepositoryTrait, Transaction, TransactionKind, TransactionStatus,
    };
    use crate::money::Currency;
    use crate::reporting::{ExportFormat, ReportingService, ReportingServiceTrait};
    use crate::wallets::{Wallet, WalletRepositoryTrait};

    #[derive(Clone, Default)]
    struct MockStore {
        wallets: Arc<Mutex<HashMap<Uuid, Wallet>>>,
        transactions: Arc<Mutex<Vec<Transaction>>>,
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockStore {
        async fn create(&self, wallet: Wallet) -> Result<Wallet> {
            self.wallets
                .lock()
                .unwrap()
                .insert(wallet.id, wallet.clone());
            Ok(wallet)
        }

        async fn delete(&self, wallet_id: Uuid) -> Result<usize> {
            Ok(self
                .wallets
                .lock()
                .unwrap()
                .remove(&wallet_id)
                .map(|_| 1)
                .unwrap_or(0))
        }

        fn get_by_id(&self, wallet_id: Uuid) -> Result<Wallet> {
            self.wallets
                .lock()
                .unwrap()
                .get(&wallet_id)
                .cloned()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(wallet_id.to_string())))
        }

        fn list(&self) -> Result<Vec<Wallet>> {
            Ok(self.wallets.lock().unwrap().values().cloned().collect())
        }
    }

    #[async_trait]
    impl LedgerRepositoryTrait for MockStore {
        async fn apply(
            &self,
            _updates: Vec<BalanceUpdate>,
            transaction: Transaction,
        ) -> Result<Transaction> {
            self.transactions
                .lock()
                .unwrap()
                .push(transaction.clone());
            Ok(transaction)
        }

        fn get_by_id(&self, transaction_id: Uuid) -> Result<Transaction> {
            self.transactions
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == transaction_id)
                .cloned()
                .ok_or_else(|| {
                    Error::Database(DatabaseError::NotFound(transaction_id.to_string()))
                })
        }

        fn list_for_wallet(
            &self,
            wallet_id: Uuid,
            limit: i64,
            offset: i64,
            start: Option<DateTime<Utc>>,
            end_exclusive: Option<DateTime<Utc>>,
        ) -> Result<Vec<Transaction>> {
            let mut matching: Vec<Transaction> = self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| {
                    t.signed_amount_for(wallet_id).is_some()
                        && start.map_or(true, |s| t.created_at >= s)
                        && end_exclusive.map_or(true, |e| t.created_at < e)
                })
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(matching
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        fn list_completed_since(
            &self,
            wallet_id: Uuid,
            since: DateTime<Utc>,
        ) -> Result<Vec<Transaction>> {
            let mut matching: Vec<Transaction> = self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| {
                    t.status == TransactionStatus::Completed
                        && t.signed_amount_for(wallet_id).is_some()
                        && t.created_at >= since
                })
                .cloned()
                .collect();
            matching.sort_by_key(|t| t.created_at);
            Ok(matching)
        }
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// A wallet with a fixed ledger history behind it. The balance is set to
    /// whatever the history sums to, as the real ledger guarantees.
    fn seeded_store() -> (MockStore, Uuid) {
        let store = MockStore::default();
        let mut wallet = Wallet::new(Currency::Usd);
        let wallet_id = wallet.id;
        let peer = Uuid::new_v4();

        let mut deposit = Transaction::deposit(wallet_id, dec!(50.00), Currency::Usd, None);
        deposit.created_at = at(2024, 2, 10);
        let mut top_up = Transaction::deposit(
            wallet_id,
            dec!(100.00),
            Currency::Usd,
            Some("Salary".to_string()),
        );
        top_up.created_at = at(2024, 3, 5);
        let mut rent = Transaction::transfer(
            wallet_id,
            peer,
            dec!(30.00),
            Currency::Usd,
            Some("Rent".to_string()),
        );
        rent.created_at = at(2024, 3, 12);
        let mut cash_out =
            Transaction::withdrawal(wallet_id, dec!(20.00), Currency::Usd, None);
        cash_out.created_at = at(2024, 4, 2);

        // 50 + 100 - 30 - 20
        wallet.balance = dec!(100.00);
        store
            .wallets
            .lock()
            .unwrap()
            .insert(wallet_id, wallet);
        *store.transactions.lock().unwrap() = vec![deposit, top_up, rent, cash_out];
        (store, wallet_id)
    }

    fn service_over(store: &MockStore) -> ReportingService {
        ReportingService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[test]
    fn test_statement_round_trip_matches_live_balance() {
        let (store, wallet_id) = seeded_store();
        let service = service_over(&store);

        // Window covering everything: closing balance == live balance.
        let statement = service
            .statement(wallet_id, date(2024, 1, 1), date(2024, 4, 30))
            .unwrap();
        assert_eq!(statement.opening_balance, Decimal::ZERO);
        assert_eq!(statement.closing_balance, dec!(100.00));
        assert_eq!(statement.total_transactions, 4);
    }

    #[test]
    fn test_statement_rolls_back_to_the_window_opening() {
        let (store, wallet_id) = seeded_store();
        let service = service_over(&store);

        // March only: the February deposit is in the opening balance, the
        // April withdrawal is rolled back out of the closing balance.
        let statement = service
            .statement(wallet_id, date(2024, 3, 1), date(2024, 3, 31))
            .unwrap();
        assert_eq!(statement.opening_balance, dec!(50.00));
        assert_eq!(statement.closing_balance, dec!(120.00));
        assert_eq!(statement.lines.len(), 2);

        let running: Vec<Decimal> = statement
            .lines
            .iter()
            .map(|l| l.running_balance)
            .collect();
        assert_eq!(running, vec![dec!(150.00), dec!(120.00)]);
        assert_eq!(statement.lines[1].amount, dec!(-30.00));
        assert_eq!(statement.lines[1].kind, TransactionKind::Transfer);
    }

    #[test]
    fn test_statement_lines_are_chronological_and_consistent() {
        let (store, wallet_id) = seeded_store();
        let service = service_over(&store);
        let statement = service
            .statement(wallet_id, date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();

        let mut running = statement.opening_balance;
        for window in statement.lines.windows(2) {
            assert!(window[0].date <= window[1].date);
        }
        for line in &statement.lines {
            running += line.amount;
            assert_eq!(line.running_balance, running);
        }
        assert_eq!(running, statement.closing_balance);
    }

    #[test]
    fn test_statement_rejects_inverted_window_and_unknown_wallet() {
        let (store, wallet_id) = seeded_store();
        let service = service_over(&store);

        let err = service
            .statement(wallet_id, date(2024, 3, 31), date(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = service
            .statement(Uuid::new_v4(), date(2024, 3, 1), date(2024, 3, 31))
            .unwrap_err();
        assert!(matches!(err, Error::WalletNotFound(_)));
    }

    #[test]
    fn test_monthly_summary_sums_by_kind_and_direction() {
        let (store, wallet_id) = seeded_store();
        let service = service_over(&store);

        let summary = service.monthly_summary(wallet_id, 2024, 3).unwrap();
        assert_eq!(summary.month, "2024-03");
        assert_eq!(summary.total_deposits, dec!(100.00));
        assert_eq!(summary.total_withdrawals, Decimal::ZERO);
        assert_eq!(summary.total_transfers_in, Decimal::ZERO);
        assert_eq!(summary.total_transfers_out, dec!(30.00));
        assert_eq!(summary.net_change, dec!(70.00));
        assert_eq!(summary.opening_balance, dec!(50.00));
        assert_eq!(summary.closing_balance, dec!(120.00));
        assert_eq!(summary.transaction_count, 2);
    }

    #[test]
    fn test_monthly_summary_counts_incoming_transfers() {
        let (store, wallet_id) = seeded_store();
        let peer = Uuid::new_v4();
        let mut incoming = Transaction::transfer(
            peer,
            wallet_id,
            dec!(5.00),
            Currency::Usd,
            None,
        );
        incoming.created_at = at(2024, 3, 20);
        store.transactions.lock().unwrap().push(incoming);
        store
            .wallets
            .lock()
            .unwrap()
            .get_mut(&wallet_id)
            .unwrap()
            .balance += dec!(5.00);

        let service = service_over(&store);
        let summary = service.monthly_summary(wallet_id, 2024, 3).unwrap();
        assert_eq!(summary.total_transfers_in, dec!(5.00));
        assert_eq!(summary.total_transfers_out, dec!(30.00));
    }

    #[test]
    fn test_export_csv_and_pdf() {
        let (store, wallet_id) = seeded_store();
        let service = service_over(&store);

        let csv = service
            .export_statement(wallet_id, date(2024, 3, 1), date(2024, 3, 31), ExportFormat::Csv)
            .unwrap();
        assert_eq!(csv.content_type, "text/csv");
        assert!(csv.filename.ends_with(".csv"));
        let text = String::from_utf8(csv.bytes).unwrap();
        assert!(text.starts_with("Date,Type,Description,"));
        assert!(text.contains("Salary"));

        let pdf = service
            .export_statement(wallet_id, date(2024, 3, 1), date(2024, 3, 31), ExportFormat::Pdf)
            .unwrap();
        assert_eq!(pdf.content_type, "application/pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
    }
}
