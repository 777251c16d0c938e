//! Profile documents mirrored into the users collection.

use tracing::{info, warn};

use storeit_core::config::{BackendConfig, SessionConfig};
use storeit_core::error::AppError;
use storeit_core::types::{Query, unique_id};
use storeit_entity::{Account, NewProfile, ProfileDocument, to_fields};
use storeit_gateway::{AdminClient, BackendClient};

/// Creates and looks up profile documents keyed by account id.
#[derive(Debug, Clone)]
pub struct DirectorySync {
    database_id: String,
    users_collection_id: String,
    avatar_placeholder: String,
}

impl DirectorySync {
    /// Creates a directory over the configured users collection.
    pub fn new(backend: &BackendConfig, session: &SessionConfig) -> Self {
        Self {
            database_id: backend.database_id.clone(),
            users_collection_id: backend.users_collection_id.clone(),
            avatar_placeholder: session.avatar_placeholder.clone(),
        }
    }

    /// Writes the profile document for a freshly created account.
    pub async fn create_profile(
        &self,
        admin: &AdminClient,
        account: &Account,
    ) -> Result<ProfileDocument, AppError> {
        let fields = to_fields(&NewProfile {
            account_id: account.id.clone(),
            email: account.email.clone(),
            full_name: account.name.clone(),
            avatar: self.avatar_placeholder.clone(),
        })?;

        let document = admin
            .databases()
            .create_document(
                &self.database_id,
                &self.users_collection_id,
                &unique_id(),
                fields,
            )
            .await
            .inspect_err(|e| {
                warn!(
                    account_id = %account.id,
                    error = %e,
                    "Profile creation failed; account exists without a profile"
                );
            })?;

        info!(account_id = %account.id, profile_id = %document.id, "Profile created");
        Ok(document.parse()?)
    }

    /// The profile whose `accountId` equals `account_id`, if any.
    pub async fn find_profile(
        &self,
        client: &BackendClient,
        account_id: &str,
    ) -> Result<Option<ProfileDocument>, AppError> {
        let list = client
            .databases()
            .list_documents(
                &self.database_id,
                &self.users_collection_id,
                &[Query::equal("accountId", account_id)],
            )
            .await?;

        list.documents
            .first()
            .map(|doc| doc.parse::<ProfileDocument>())
            .transpose()
            .map_err(AppError::from)
    }
}
