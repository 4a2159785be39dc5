pub mod certificate;
pub mod config;
pub mod controller;
pub mod document;
pub mod monitoring;
pub mod salt;
pub mod unique_token;

use crate::{dto::provider::OpenIdProvider, memory::impl_storable_bounded};

///
/// Warden stable memory ids (1–20)
///
/// Ids are permanent once assigned; gaps are reserved for growth.
///

pub mod memory {
    pub mod config {
        pub const CONFIG_ID: u8 = 1;
    }

    pub mod certificate {
        pub const CERTIFICATES_ID: u8 = 2;
        pub const MONITORING_ID: u8 = 3;
    }

    pub mod auth {
        pub const SALT_ID: u8 = 4;
        pub const CONTROLLERS_ID: u8 = 5;
        pub const UNIQUE_TOKENS_ID: u8 = 7;
    }

    pub mod datastore {
        pub const DOCUMENTS_ID: u8 = 6;
    }
}

// provider tags key the per-provider maps
impl_storable_bounded!(OpenIdProvider, 32, false);
