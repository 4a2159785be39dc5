use crate::{InternalError, infra::ic::mgmt::raw_rand};

///
/// MgmtOps
///

pub struct MgmtOps;

impl MgmtOps {
    /// 32 random bytes from the management canister.
    pub async fn raw_rand() -> Result<[u8; 32], InternalError> {
        Ok(raw_rand().await?)
    }
}
