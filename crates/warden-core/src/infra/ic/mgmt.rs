use crate::{
    cdk::{call::Call, candid::decode_one},
    infra::{ic::IcInfraError, prelude::*},
};

///
/// MgmtInfraError
///

#[derive(Debug, ThisError)]
pub enum MgmtInfraError {
    #[error("raw_rand returned {len} bytes")]
    RawRandInvalidLength { len: usize },
}

impl From<MgmtInfraError> for InfraError {
    fn from(err: MgmtInfraError) -> Self {
        IcInfraError::from(err).into()
    }
}

/// 32 bytes of randomness from the management canister.
pub async fn raw_rand() -> Result<[u8; 32], InfraError> {
    let response = Call::unbounded_wait(Principal::management_canister(), "raw_rand")
        .await
        .map_err(IcInfraError::from)?;

    let bytes: Vec<u8> = decode_one(&response).map_err(IcInfraError::from)?;
    let len = bytes.len();

    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|_| MgmtInfraError::RawRandInvalidLength { len })?;

    Ok(seed)
}
