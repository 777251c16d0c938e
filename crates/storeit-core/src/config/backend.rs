//! Identity / document / blob backend configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Endpoint, project and collection identifiers for the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base API URL, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    /// Project identifier sent with every request.
    pub project_id: String,
    /// Database holding the users and files collections.
    pub database_id: String,
    /// Collection of profile documents.
    pub users_collection_id: String,
    /// Collection of file records.
    pub files_collection_id: String,
    /// Bucket holding file blobs.
    pub bucket_id: String,
    /// Service credential for the elevated client.
    #[serde(default)]
    pub api_key: String,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl BackendConfig {
    /// Rejects configurations with missing identifiers.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("endpoint", &self.endpoint),
            ("project_id", &self.project_id),
            ("database_id", &self.database_id),
            ("users_collection_id", &self.users_collection_id),
            ("files_collection_id", &self.files_collection_id),
            ("bucket_id", &self.bucket_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::configuration(format!(
                    "backend.{name} must be set"
                )));
            }
        }
        Ok(())
    }

    /// Endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Direct download reference for a blob in the configured bucket.
    pub fn download_url(&self, blob_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/download?project={}",
            self.endpoint(),
            self.bucket_id,
            blob_id,
            self.project_id
        )
    }
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BackendConfig {
        BackendConfig {
            endpoint: "https://backend.test/v1/".to_string(),
            project_id: "proj".to_string(),
            database_id: "db".to_string(),
            users_collection_id: "users".to_string(),
            files_collection_id: "files".to_string(),
            bucket_id: "bucket".to_string(),
            api_key: "key".to_string(),
            request_timeout_seconds: 30,
        }
    }

    #[test]
    fn test_download_url() {
        assert_eq!(
            sample().download_url("b1"),
            "https://backend.test/v1/storage/buckets/bucket/files/b1/download?project=proj"
        );
    }

    #[test]
    fn test_validate_rejects_blank_ids() {
        let mut config = sample();
        assert!(config.validate().is_ok());
        config.bucket_id = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("bucket_id"));
    }
}
