use crate::dto::prelude::*;

///
/// ControllerScope
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ControllerScope {
    Admin,
    Submit,
    Write,
}

///
/// ControllerKind
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ControllerKind {
    Automation,
    Manual,
}

///
/// Controller
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Controller {
    pub principal: Principal,
    pub scope: ControllerScope,
    pub kind: ControllerKind,
    pub metadata: BTreeMap<String, String>,
    pub created_at: u64,
    pub updated_at: u64,
    pub expires_at: Option<u64>,
}

///
/// SetControllersArgs
/// Admin-side grant. `expires_at` is an absolute timestamp in nanoseconds.
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub struct SetControllersArgs {
    pub controllers: Vec<Principal>,
    pub scope: ControllerScope,
    pub metadata: BTreeMap<String, String>,
    pub expires_at: Option<u64>,
}
