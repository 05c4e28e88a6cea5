mod load;
mod types;

pub use types::{AppConfig, LoggingConfig, OutputConfig, RetryConfig, SchedulerConfig};
