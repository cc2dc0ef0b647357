/// Decimal precision for derived exchange rates
pub const RATE_DECIMAL_PRECISION: u32 = 8;

/// Freshness window for cached exchange quotes, in seconds
pub const QUOTE_FRESHNESS_SECS: i64 = 600;

/// Default transaction history page size
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum transaction history page size
pub const MAX_PAGE_SIZE: i64 = 200;

/// Wallet lock acquisition timeout in milliseconds
pub const LOCK_TIMEOUT_MS: u64 = 5_000;

/// Consecutive failures before a scheduled payment is marked FAILED
pub const SCHEDULE_FAILURE_CEILING: u32 = 3;

/// Days ahead covered by payment reminders
pub const REMINDER_WINDOW_DAYS: u32 = 2;

/// Description prefix applied to transfers created by the payment engine
pub const SCHEDULED_TRANSFER_PREFIX: &str = "Scheduled: ";
