//! Collection/key documents with optimistic versioning.

pub mod user;
pub mod workflow;

use crate::{
    dto::error::ErrorCode,
    ops::prelude::*,
    storage::stable::document::{DocumentKey, DocumentRecord, DocumentStore},
};
use serde::de::DeserializeOwned;
use warden_memory::serialize::{deserialize, serialize};

///
/// DocumentOpsError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum DocumentOpsError {
    #[error("no version provided for existing document {0}")]
    NoVersionProvided(String),

    #[error("document {key} version outdated (current {current}, provided {provided})")]
    VersionOutdated {
        key: String,
        current: u64,
        provided: u64,
    },

    #[error("field {0} cannot be modified")]
    ImmutableField(&'static str),

    #[error("document codec error: {0}")]
    Codec(String),
}

impl From<DocumentOpsError> for InternalError {
    fn from(err: DocumentOpsError) -> Self {
        let code = match err {
            DocumentOpsError::Codec(_) => ErrorCode::Internal,
            _ => ErrorCode::Conflict,
        };

        Self::ops(InternalErrorOrigin::Storage, err.to_string()).with_code(code)
    }
}

///
/// DocumentOps
///

pub struct DocumentOps;

impl DocumentOps {
    #[must_use]
    pub fn get(collection: &str, key: &str) -> Option<DocumentRecord> {
        DocumentStore::get(&DocumentKey::new(collection, key))
    }

    /// Write raw bytes. `expected_version` must match an existing document.
    pub fn set(
        collection: &str,
        key: &str,
        owner: Principal,
        data: Vec<u8>,
        expected_version: Option<u64>,
        now: u64,
    ) -> Result<DocumentRecord, DocumentOpsError> {
        let doc_key = DocumentKey::new(collection, key);

        let record = match DocumentStore::get(&doc_key) {
            Some(current) => {
                let provided = expected_version
                    .ok_or_else(|| DocumentOpsError::NoVersionProvided(key.to_string()))?;
                if provided != current.version {
                    return Err(DocumentOpsError::VersionOutdated {
                        key: key.to_string(),
                        current: current.version,
                        provided,
                    });
                }

                DocumentRecord {
                    owner,
                    data,
                    version: current.version + 1,
                    created_at: current.created_at,
                    updated_at: now,
                }
            }
            None => DocumentRecord {
                owner,
                data,
                version: 1,
                created_at: now,
                updated_at: now,
            },
        };

        DocumentStore::insert(doc_key, record.clone());

        Ok(record)
    }

    /// Read and decode a document's payload together with its record.
    pub fn get_data<T: DeserializeOwned>(
        collection: &str,
        key: &str,
    ) -> Result<Option<(T, DocumentRecord)>, DocumentOpsError> {
        let Some(record) = Self::get(collection, key) else {
            return Ok(None);
        };

        let data = deserialize(&record.data).map_err(|e| DocumentOpsError::Codec(e.to_string()))?;

        Ok(Some((data, record)))
    }

    pub fn set_data<T: Serialize>(
        collection: &str,
        key: &str,
        owner: Principal,
        data: &T,
        expected_version: Option<u64>,
        now: u64,
    ) -> Result<DocumentRecord, DocumentOpsError> {
        let bytes = serialize(data).map_err(|e| DocumentOpsError::Codec(e.to_string()))?;

        Self::set(collection, key, owner, bytes, expected_version, now)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Principal = Principal::anonymous();

    #[test]
    fn create_then_update_bumps_version() {
        DocumentStore::reset_for_tests();

        let created = DocumentOps::set("#c", "k", OWNER, vec![1], None, 10).unwrap();
        assert_eq!(created.version, 1);

        let updated = DocumentOps::set("#c", "k", OWNER, vec![2], Some(1), 20).unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.created_at, 10);
        assert_eq!(updated.updated_at, 20);
        assert_eq!(DocumentOps::get("#c", "k").unwrap().data, vec![2]);
    }

    #[test]
    fn existing_document_requires_matching_version() {
        DocumentStore::reset_for_tests();
        DocumentOps::set("#c", "k", OWNER, vec![1], None, 10).unwrap();

        assert_eq!(
            DocumentOps::set("#c", "k", OWNER, vec![2], None, 20),
            Err(DocumentOpsError::NoVersionProvided("k".into()))
        );
        assert!(matches!(
            DocumentOps::set("#c", "k", OWNER, vec![2], Some(3), 20),
            Err(DocumentOpsError::VersionOutdated { current: 1, .. })
        ));
    }

    #[test]
    fn collections_are_separate_namespaces() {
        DocumentStore::reset_for_tests();
        DocumentOps::set("#a", "k", OWNER, vec![1], None, 10).unwrap();

        assert!(DocumentOps::set("#b", "k", OWNER, vec![2], None, 10).is_ok());
    }

    #[test]
    fn typed_payload_round_trips_through_cbor() {
        DocumentStore::reset_for_tests();
        DocumentOps::set_data("#c", "k", OWNER, &vec!["x".to_string()], None, 10).unwrap();

        let (data, record) = DocumentOps::get_data::<Vec<String>>("#c", "k")
            .unwrap()
            .unwrap();
        assert_eq!(data, vec!["x".to_string()]);
        assert_eq!(record.version, 1);
    }
}
