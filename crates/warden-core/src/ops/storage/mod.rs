pub mod config;
pub mod controller;
pub mod document;
pub mod salt;
pub mod unique_token;
