pub mod backoff;
pub mod delegation;
pub mod rate;
pub mod scheduler;
pub mod token;
