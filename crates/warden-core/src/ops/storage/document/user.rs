use super::{DocumentOps, DocumentOpsError};
use crate::{dto::document::UserProfile, ops::prelude::*};

pub const USER_COLLECTION: &str = "#user";

///
/// UserData
/// Payload of a `#user` document. `provider` and `sub` never change.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UserData {
    pub provider: OpenIdProvider,
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
}

///
/// UserDocumentOps
///

pub struct UserDocumentOps;

impl UserDocumentOps {
    /// Create the user's document or refresh its profile fields.
    pub fn upsert(user: Principal, data: UserData, now: u64) -> Result<UserProfile, DocumentOpsError> {
        let key = user.to_text();

        let (data, expected_version) =
            match DocumentOps::get_data::<UserData>(USER_COLLECTION, &key)? {
                Some((current, record)) => {
                    if current.provider != data.provider {
                        return Err(DocumentOpsError::ImmutableField("provider"));
                    }
                    if current.sub != data.sub {
                        return Err(DocumentOpsError::ImmutableField("sub"));
                    }

                    (data, Some(record.version))
                }
                None => (data, None),
            };

        let record = DocumentOps::set_data(USER_COLLECTION, &key, user, &data, expected_version, now)?;

        Ok(to_profile(user, data, record.version, record.created_at, record.updated_at))
    }
}

fn to_profile(
    principal: Principal,
    data: UserData,
    version: u64,
    created_at: u64,
    updated_at: u64,
) -> UserProfile {
    UserProfile {
        principal,
        provider: data.provider,
        email: data.email,
        name: data.name,
        given_name: data.given_name,
        family_name: data.family_name,
        picture: data.picture,
        locale: data.locale,
        version,
        created_at,
        updated_at,
    }
}

///
/// TESTS
///
