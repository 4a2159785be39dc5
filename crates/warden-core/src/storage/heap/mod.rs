pub mod certificate;
pub mod delegation;
pub mod rate;
