use super::{DocumentOps, DocumentOpsError};
use crate::ops::prelude::*;

pub const AUTOMATION_WORKFLOW_COLLECTION: &str = "#automation-workflow";

///
/// WorkflowData
/// One CI run that authenticated against this canister.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WorkflowData {
    pub provider: OpenIdProvider,
    pub repository: String,
    pub r#ref: Option<String>,
    pub run_id: String,
    pub run_number: Option<String>,
    pub run_attempt: Option<String>,
    pub workflow: Option<String>,
    pub event_name: Option<String>,
    pub sha: Option<String>,
    pub actor: Option<String>,
}

impl WorkflowData {
    /// `<provider>#<owner>/<name>#<run_id>`
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}#{}#{}", self.provider, self.repository, self.run_id)
    }
}

///
/// WorkflowDocumentOps
///

pub struct WorkflowDocumentOps;

impl WorkflowDocumentOps {
    /// Record a run. Re-runs of the same run id overwrite the previous entry.
    pub fn record(owner: Principal, data: &WorkflowData, now: u64) -> Result<String, DocumentOpsError> {
        let key = data.key();
        let current_version =
            DocumentOps::get(AUTOMATION_WORKFLOW_COLLECTION, &key).map(|record| record.version);

        DocumentOps::set_data(
            AUTOMATION_WORKFLOW_COLLECTION,
            &key,
            owner,
            data,
            current_version,
            now,
        )?;

        Ok(key)
    }
}

///
/// TESTS
///
