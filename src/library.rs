pub mod cancellation;
pub mod logger;
