pub mod config;
pub mod error;
pub mod kv;
pub mod service;
pub mod sleep_log;
pub mod telemetry;

pub use config::StoreConfig;
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use service::SleepDebtService;
pub use sleep_log::{SleepLog, WeeklySleepStats};

pub const SLEEP_RECORDS_KEY: &str = "sleep_records";
pub const SLEEP_DEBT_KEY: &str = "@somna_sleep_debt";
pub const SMART_ALARM_KEY: &str = "@somna_smart_alarm";
pub const SLEEP_SCORE_KEY: &str = "@somna_sleep_score";
