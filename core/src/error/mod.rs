pub mod executor;
pub mod task;

pub use executor::SchedulerError;
pub use task::TaskError;
