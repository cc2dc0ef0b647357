#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::errors::{DatabaseError, Error, Result};
    use crate::fx::{Conversion, ConversionServiceTrait};
    use crate::ledger::{
        LedgerServiceTrait, Transaction, TransactionFilter, TransferConversion,
    };
    use crate::money::Currency;
    use crate::scheduled::engine::PaymentEngine;
    use crate::scheduled::scheduled_model::{
        NewScheduledPayment, ScheduledPayment, ScheduledPaymentStatus,
    };
    use crate::scheduled::scheduled_traits::{
        PaymentEngineTrait, ScheduledPaymentRepositoryTrait,
    };
    use crate::wallets::{Wallet, WalletRepositoryTrait};

    #[derive(Default)]
    struct MockWalletRepository {
        wallets: Arc<Mutex<HashMap<Uuid, Wallet>>>,
    }

    impl MockWalletRepository {
        fn insert(&self, wallet: Wallet) {
            self.wallets.lock().unwrap().insert(wallet.id, wallet);
        }
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockWalletRepository {
        async fn create(&self, wallet: Wallet) -> Result<Wallet> {
            self.insert(wallet.clone());
            Ok(wallet)
        }

        async fn delete(&self, wallet_id: Uuid) -> Result<usize> {
            Ok(self.wallets.lock().unwrap().remove(&wallet_id).map_or(0, |_| 1))
        }

        fn get_by_id(&self, wallet_id: Uuid) -> Result<Wallet> {
            self.wallets
                .lock()
                .unwrap()
                .get(&wallet_id)
                .cloned()
                .ok_or_else(|| DatabaseError::NotFound(wallet_id.to_string()).into())
        }

        fn list(&self) -> Result<Vec<Wallet>> {
            Ok(self.wallets.lock().unwrap().values().cloned().collect())
        }
    }

    #[derive(Default)]
    struct MockScheduleRepository {
        payments: Arc<Mutex<HashMap<Uuid, ScheduledPayment>>>,
    }

    #[async_trait]
    impl ScheduledPaymentRepositoryTrait for MockScheduleRepository {
        async fn create(&self, payment: ScheduledPayment) -> Result<ScheduledPayment> {
            self.payments
                .lock()
                .unwrap()
                .insert(payment.id, payment.clone());
            Ok(payment)
        }

        async fn update(&self, payment: ScheduledPayment) -> Result<ScheduledPayment> {
            self.payments
                .lock()
                .unwrap()
                .insert(payment.id, payment.clone());
            Ok(payment)
        }

        fn get_by_id(&self, payment_id: Uuid) -> Result<ScheduledPayment> {
            self.payments
                .lock()
                .unwrap()
                .get(&payment_id)
                .cloned()
                .ok_or_else(|| DatabaseError::NotFound(payment_id.to_string()).into())
        }

        fn list(&self) -> Result<Vec<ScheduledPayment>> {
            Ok(self.payments.lock().unwrap().values().cloned().collect())
        }

        fn list_for_wallet(&self, wallet_id: Uuid) -> Result<Vec<ScheduledPayment>> {
            Ok(self
                .payments
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.source_wallet_id == wallet_id)
                .cloned()
                .collect())
        }

        fn list_due(&self, today: NaiveDate) -> Result<Vec<ScheduledPayment>> {
            Ok(self
                .payments
                .lock()
                .unwrap()
                .values()
                .filter(|p| {
                    p.status == ScheduledPaymentStatus::Active && p.next_execution_date <= today
                })
                .cloned()
                .collect())
        }

        fn list_upcoming(
            &self,
            from: NaiveDate,
            to_inclusive: NaiveDate,
        ) -> Result<Vec<ScheduledPayment>> {
            let mut upcoming: Vec<ScheduledPayment> = self
                .payments
                .lock()
                .unwrap()
                .values()
                .filter(|p| {
                    p.status == ScheduledPaymentStatus::Active
                        && p.next_execution_date >= from
                        && p.next_execution_date <= to_inclusive
                })
                .cloned()
                .collect();
            upcoming.sort_by_key(|p| p.next_execution_date);
            Ok(upcoming)
        }

        fn count_open_for_wallet(&self, wallet_id: Uuid) -> Result<i64> {
            Ok(self
                .payments
                .lock()
                .unwrap()
                .values()
                .filter(|p| {
                    p.status.is_open()
                        && (p.source_wallet_id == wallet_id
                            || p.destination_wallet_id == wallet_id)
                })
                .count() as i64)
        }
    }

    /// Ledger that records same-currency transfers without touching balances.
    #[derive(Default)]
    struct MockLedger {
        transfers: Arc<Mutex<Vec<(Uuid, Uuid, Decimal, Option<String>)>>>,
        fail_sources: Arc<Mutex<HashSet<Uuid>>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl LedgerServiceTrait for MockLedger {
        async fn deposit(
            &self,
            _wallet_id: Uuid,
            _amount: Decimal,
            _description: Option<String>,
        ) -> Result<Transaction> {
            unimplemented!("not used by the engine")
        }

        async fn withdraw(
            &self,
            _wallet_id: Uuid,
            _amount: Decimal,
            _description: Option<String>,
        ) -> Result<Transaction> {
            unimplemented!("not used by the engine")
        }

        async fn transfer(
            &self,
            source_wallet_id: Uuid,
            destination_wallet_id: Uuid,
            amount: Decimal,
            description: Option<String>,
        ) -> Result<Transaction> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_sources.lock().unwrap().contains(&source_wallet_id) {
                return Err(Error::InsufficientFunds {
                    wallet_id: source_wallet_id.to_string(),
                    balance: Decimal::ZERO,
                    requested: amount,
                });
            }
            self.transfers.lock().unwrap().push((
                source_wallet_id,
                destination_wallet_id,
                amount,
                description.clone(),
            ));
            Ok(Transaction::transfer(
                source_wallet_id,
                destination_wallet_id,
                amount,
                Currency::Usd,
                description,
            ))
        }

        async fn transfer_with_conversion(
            &self,
            _source_wallet_id: Uuid,
            _destination_wallet_id: Uuid,
            _amount: Decimal,
            _conversion: TransferConversion,
            _description: Option<String>,
        ) -> Result<Transaction> {
            unimplemented!("cross-currency goes through the converter")
        }

        fn list_transactions(
            &self,
            _wallet_id: Uuid,
            _filter: TransactionFilter,
        ) -> Result<Vec<Transaction>> {
            Ok(Vec::new())
        }

        fn get_transaction(&self, transaction_id: Uuid) -> Result<Transaction> {
            Err(Error::NotFound(format!("transaction {}", transaction_id)))
        }
    }

    #[derive(Default)]
    struct MockConverter {
        calls: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl ConversionServiceTrait for MockConverter {
        async fn calculate(
            &self,
            _amount: Decimal,
            _from: Currency,
            _to: Currency,
        ) -> Result<Conversion> {
            unimplemented!("not used by the engine")
        }

        async fn convert_transfer(
            &self,
            source_wallet_id: Uuid,
            destination_wallet_id: Uuid,
            amount: Decimal,
            description: Option<String>,
        ) -> Result<(Transaction, Conversion)> {
            *self.calls.lock().unwrap() += 1;
            let conversion = Conversion {
                source_amount: amount,
                source_currency: Currency::Usd,
                converted_amount: amount * dec!(0.90),
                target_currency: Currency::Eur,
                exchange_rate: dec!(0.90),
            };
            let transaction = Transaction::converted_transfer(
                source_wallet_id,
                destination_wallet_id,
                amount,
                Currency::Usd,
                TransferConversion {
                    converted_amount: conversion.converted_amount,
                    target_currency: conversion.target_currency,
                    exchange_rate: conversion.exchange_rate,
                },
                description,
            );
            Ok((transaction, conversion))
        }
    }

    struct Fixture {
        engine: Arc<PaymentEngine>,
        repository: Arc<MockScheduleRepository>,
        wallets: Arc<MockWalletRepository>,
        ledger: Arc<MockLedger>,
        converter: Arc<MockConverter>,
        source: Wallet,
        destination: Wallet,
    }

    fn fixture_with(destination_currency: Currency, ledger: MockLedger) -> Fixture {
        let wallets = Arc::new(MockWalletRepository::default());
        let source = Wallet::new(Currency::Usd);
        let destination = Wallet::new(destination_currency);
        wallets.insert(source.clone());
        wallets.insert(destination.clone());
        let repository = Arc::new(MockScheduleRepository::default());
        let ledger = Arc::new(ledger);
        let converter = Arc::new(MockConverter::default());
        let engine = Arc::new(PaymentEngine::new(
            repository.clone(),
            wallets.clone(),
            ledger.clone(),
            converter.clone(),
        ));
        Fixture {
            engine,
            repository,
            wallets,
            ledger,
            converter,
            source,
            destination,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Currency::Usd, MockLedger::default())
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    async fn seed_payment(
        fx: &Fixture,
        recurrence: &str,
        start: NaiveDate,
        max_executions: Option<u32>,
    ) -> ScheduledPayment {
        let request = NewScheduledPayment {
            source_wallet_id: fx.source.id,
            destination_wallet_id: fx.destination.id,
            amount: dec!(25),
            description: "Rent".to_string(),
            recurrence: recurrence.to_string(),
            start_date: start,
            end_date: None,
            max_executions,
        };
        let recurrence = request.validate().unwrap();
        let payment = ScheduledPayment::new(&request, recurrence, Currency::Usd);
        fx.repository.create(payment).await.unwrap()
    }

    #[tokio::test]
    async fn test_once_payment_executes_and_completes() {
        let fx = fixture();
        let today = date(2024, 3, 1);
        let payment = seed_payment(&fx, "ONCE", today, None).await;

        let summary = fx.engine.run_due_payments(today).await.unwrap();
        assert_eq!(summary.due, 1);
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.skipped, 0);

        let transfers = fx.ledger.transfers.lock().unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].3.as_deref(), Some("Scheduled: Rent"));

        let saved = fx.repository.get_by_id(payment.id).unwrap();
        assert_eq!(saved.status, ScheduledPaymentStatus::Completed);
        assert_eq!(saved.execution_count, 1);
    }

    #[tokio::test]
    async fn test_monthly_ceiling_completes_after_the_third_run() {
        let fx = fixture();
        let payment = seed_payment(&fx, "MONTHLY", date(2024, 1, 31), Some(3)).await;

        for today in [date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)] {
            let summary = fx.engine.run_due_payments(today).await.unwrap();
            assert_eq!(summary.executed, 1, "run on {}", today);
        }

        let saved = fx.repository.get_by_id(payment.id).unwrap();
        assert_eq!(saved.status, ScheduledPaymentStatus::Completed);
        assert_eq!(saved.execution_count, 3);

        // later ticks ignore the completed payment
        let summary = fx.engine.run_due_payments(date(2024, 4, 30)).await.unwrap();
        assert_eq!(summary.due, 0);
        assert_eq!(fx.ledger.transfers.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_occurrence_stays_due_and_recovers() {
        let fx = fixture();
        let today = date(2024, 3, 1);
        let payment = seed_payment(&fx, "MONTHLY", today, None).await;
        fx.ledger.fail_sources.lock().unwrap().insert(fx.source.id);

        let summary = fx.engine.run_due_payments(today).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.executed, 0);

        let saved = fx.repository.get_by_id(payment.id).unwrap();
        assert_eq!(saved.status, ScheduledPaymentStatus::Active);
        assert_eq!(saved.failure_count, 1);
        assert_eq!(saved.next_execution_date, today);

        // funding recovers, the same occurrence executes and the streak resets
        fx.ledger.fail_sources.lock().unwrap().clear();
        let summary = fx.engine.run_due_payments(today).await.unwrap();
        assert_eq!(summary.executed, 1);
        let saved = fx.repository.get_by_id(payment.id).unwrap();
        assert_eq!(saved.failure_count, 0);
        assert_eq!(saved.next_execution_date, date(2024, 4, 1));
    }

    #[tokio::test]
    async fn test_three_consecutive_failures_disable_the_payment() {
        let fx = fixture();
        let today = date(2024, 3, 1);
        let payment = seed_payment(&fx, "MONTHLY", today, None).await;
        fx.ledger.fail_sources.lock().unwrap().insert(fx.source.id);

        for _ in 0..3 {
            fx.engine.run_due_payments(today).await.unwrap();
        }

        let saved = fx.repository.get_by_id(payment.id).unwrap();
        assert_eq!(saved.status, ScheduledPaymentStatus::Failed);
        assert_eq!(saved.failure_count, 3);

        let summary = fx.engine.run_due_payments(today).await.unwrap();
        assert_eq!(summary.due, 0);
    }

    #[tokio::test]
    async fn test_late_tick_steps_from_the_stored_date_not_today() {
        let fx = fixture();
        let payment = seed_payment(&fx, "MONTHLY", date(2024, 1, 31), None).await;

        // the tick fires ten days late
        let summary = fx.engine.run_due_payments(date(2024, 2, 10)).await.unwrap();
        assert_eq!(summary.executed, 1);

        let saved = fx.repository.get_by_id(payment.id).unwrap();
        assert_eq!(saved.next_execution_date, date(2024, 2, 29));
    }

    #[tokio::test]
    async fn test_cross_currency_payment_goes_through_the_converter() {
        let fx = fixture_with(Currency::Eur, MockLedger::default());
        let today = date(2024, 3, 1);
        seed_payment(&fx, "ONCE", today, None).await;

        let summary = fx.engine.run_due_payments(today).await.unwrap();
        assert_eq!(summary.executed, 1);
        assert_eq!(*fx.converter.calls.lock().unwrap(), 1);
        assert!(fx.ledger.transfers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_failure_never_blocks_other_payments() {
        let fx = fixture();
        let today = date(2024, 3, 1);
        // second source wallet whose transfers are rejected
        let broke = Wallet::new(Currency::Usd);
        fx.wallets.insert(broke.clone());
        let failing = {
            let request = NewScheduledPayment {
                source_wallet_id: broke.id,
                destination_wallet_id: fx.destination.id,
                amount: dec!(10),
                description: "Doomed".to_string(),
                recurrence: "ONCE".to_string(),
                start_date: today,
                end_date: None,
                max_executions: None,
            };
            let recurrence = request.validate().unwrap();
            ScheduledPayment::new(&request, recurrence, Currency::Usd)
        };
        fx.repository.create(failing.clone()).await.unwrap();
        let healthy = seed_payment(&fx, "ONCE", today, None).await;
        fx.ledger.fail_sources.lock().unwrap().insert(broke.id);

        let summary = fx.engine.run_due_payments(today).await.unwrap();
        assert_eq!(summary.due, 2);
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.failed, 1);

        assert_eq!(
            fx.repository.get_by_id(healthy.id).unwrap().status,
            ScheduledPaymentStatus::Completed
        );
        assert_eq!(
            fx.repository.get_by_id(failing.id).unwrap().failure_count,
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_overlapping_runs_never_double_execute() {
        let ledger = MockLedger {
            delay: Some(Duration::from_millis(50)),
            ..MockLedger::default()
        };
        let fx = fixture_with(Currency::Usd, ledger);
        let today = date(2024, 3, 1);
        let payment = seed_payment(&fx, "ONCE", today, None).await;

        let first = tokio::spawn({
            let engine = fx.engine.clone();
            async move { engine.run_due_payments(today).await.unwrap() }
        });
        let second = tokio::spawn({
            let engine = fx.engine.clone();
            async move { engine.run_due_payments(today).await.unwrap() }
        });
        let (a, b) = (first.await.unwrap(), second.await.unwrap());

        assert_eq!(a.executed + b.executed, 1);
        assert_eq!(fx.ledger.transfers.lock().unwrap().len(), 1);
        let saved = fx.repository.get_by_id(payment.id).unwrap();
        assert_eq!(saved.execution_count, 1);
    }

    #[tokio::test]
    async fn test_upcoming_payments_honour_the_window() {
        let fx = fixture();
        let today = date(2024, 3, 1);
        let tomorrow = seed_payment(&fx, "ONCE", date(2024, 3, 2), None).await;
        let in_two_days = seed_payment(&fx, "ONCE", date(2024, 3, 3), None).await;
        seed_payment(&fx, "ONCE", date(2024, 3, 8), None).await;

        let upcoming = fx.engine.upcoming_payments(today, 2).unwrap();
        assert_eq!(
            upcoming.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![tomorrow.id, in_two_days.id]
        );
    }
}
