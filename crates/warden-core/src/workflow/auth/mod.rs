pub mod automation;
pub mod user;
