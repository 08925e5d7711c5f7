use super::types::*;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const VIEWER_QUERY: &str = "query Viewer { viewer { id username entity } }";

const ARTIFACT_FILES_QUERY: &str = r#"
query ArtifactFiles($entityName: String!, $projectName: String!, $name: String!, $cursor: String) {
  project(name: $projectName, entityName: $entityName) {
    artifact(name: $name) {
      id
      digest
      files(after: $cursor) {
        pageInfo { hasNextPage endCursor }
        edges { node { name directUrl sizeBytes } }
      }
    }
  }
}
"#;

#[async_trait]
pub trait ArtifactRegistry: Send + Sync {
    /// Checks the credentials and returns the account they belong to.
    async fn authenticate(&self) -> Result<Viewer>;

    /// Looks up an artifact version and lists its files.
    async fn resolve(&self, artifact: &ArtifactRef) -> Result<ArtifactManifest>;

    /// Writes one file to `dest`, returning the number of bytes written.
    async fn download(&self, file: &ArtifactFile, dest: &Path) -> Result<u64>;
}

/// Weights & Biases GraphQL client.
pub struct WandbRegistry {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WandbRegistry {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn query<V, T>(&self, query: &str, variables: V) -> Result<T>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/graphql", self.base_url))
            .basic_auth("api", Some(&self.api_key))
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(Error::registry(format!(
                "Authentication failed ({})",
                response.status()
            )));
        }

        let body: GraphQlResponse<T> = response.error_for_status()?.json().await?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::registry(messages.join("; ")));
        }

        body.data
            .ok_or_else(|| Error::registry("Registry response carried no data"))
    }
}

#[async_trait]
impl ArtifactRegistry for WandbRegistry {
    async fn authenticate(&self) -> Result<Viewer> {
        let data: ViewerData = self.query(VIEWER_QUERY, serde_json::json!({})).await?;
        data.viewer
            .ok_or_else(|| Error::registry("Authentication failed: invalid API key"))
    }

    async fn resolve(&self, artifact: &ArtifactRef) -> Result<ArtifactManifest> {
        let entity = artifact.entity.as_deref().ok_or_else(|| {
            Error::registry(format!("No entity given for artifact '{}'", artifact))
        })?;
        let name = artifact.qualified_name();

        let mut manifest: Option<ArtifactManifest> = None;
        let mut cursor: Option<String> = None;

        loop {
            let variables = ArtifactVariables {
                entity_name: entity,
                project_name: &artifact.project,
                name: &name,
                cursor: cursor.as_deref(),
            };
            let data: ProjectData = self.query(ARTIFACT_FILES_QUERY, variables).await?;

            let node = data
                .project
                .ok_or_else(|| {
                    Error::registry(format!(
                        "Project '{}/{}' not found",
                        entity, artifact.project
                    ))
                })?
                .artifact
                .ok_or_else(|| Error::registry(format!("Artifact '{}' not found", artifact)))?;

            debug!(
                "Fetched {} file entries for artifact {}",
                node.files.edges.len(),
                node.id
            );

            let page_files = node.files.edges.into_iter().map(|edge| edge.node);
            match manifest.as_mut() {
                Some(manifest) => manifest.files.extend(page_files),
                None => {
                    manifest = Some(ArtifactManifest {
                        id: node.id,
                        digest: node.digest,
                        files: page_files.collect(),
                    })
                }
            }

            match node.files.page_info {
                PageInfo {
                    has_next_page: true,
                    end_cursor: Some(next),
                } => cursor = Some(next),
                _ => break,
            }
        }

        manifest.ok_or_else(|| Error::registry(format!("Artifact '{}' not found", artifact)))
    }

    async fn download(&self, file: &ArtifactFile, dest: &Path) -> Result<u64> {
        let mut response = self
            .http
            .get(&file.direct_url)
            .send()
            .await?
            .error_for_status()?;

        let mut out = tokio::fs::File::create(dest).await?;
        let copied = write_body(&mut response, &mut out).await;
        drop(out);

        if copied.is_err() {
            // Never leave a truncated file where the loader looks.
            if let Err(e) = tokio::fs::remove_file(dest).await {
                warn!("Failed to remove partial download {}: {}", dest.display(), e);
            }
        }
        copied
    }
}

async fn write_body(response: &mut reqwest::Response, out: &mut tokio::fs::File) -> Result<u64> {
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}
