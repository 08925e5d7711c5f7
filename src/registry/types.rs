use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `[entity/]project/name:version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub entity: Option<String>,
    pub project: String,
    pub name: String,
    pub version: String,
}

impl ArtifactRef {
    /// Builds a reference from a model name (`entity/project/name` or `project/name`)
    /// and a version (`v3`, `latest`, an alias).
    pub fn new(model_name: &str, version: &str) -> Result<Self> {
        let version = version.trim();
        if version.is_empty() {
            return Err(Error::registry("Artifact version is empty"));
        }

        let parts: Vec<&str> = model_name.trim().split('/').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(Error::registry(format!(
                "Invalid model name '{}': empty path segment",
                model_name
            )));
        }

        let (entity, project, name) = match parts.as_slice() {
            [entity, project, name] => (Some(entity.to_string()), *project, *name),
            [project, name] => (None, *project, *name),
            _ => {
                return Err(Error::registry(format!(
                    "Invalid model name '{}': expected 'entity/project/name' or 'project/name'",
                    model_name
                )));
            }
        };

        Ok(Self {
            entity,
            project: project.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    /// Parses `"{model_name}:{version}"`.
    pub fn parse(uri: &str) -> Result<Self> {
        let (model_name, version) = uri
            .rsplit_once(':')
            .ok_or_else(|| Error::registry(format!("Missing ':version' in '{}'", uri)))?;
        Self::new(model_name, version)
    }

    pub fn with_default_entity(mut self, entity: &str) -> Self {
        if self.entity.is_none() {
            self.entity = Some(entity.to_string());
        }
        self
    }

    /// `name:version`, as the registry addresses an artifact within a project.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(entity) = &self.entity {
            write!(f, "{}/", entity)?;
        }
        write!(f, "{}/{}", self.project, self.qualified_name())
    }
}

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Viewer {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactFile {
    pub name: String,
    pub direct_url: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactManifest {
    pub id: String,
    pub digest: Option<String>,
    pub files: Vec<ArtifactFile>,
}

// ============ GraphQL wire types ============

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewerData {
    pub viewer: Option<Viewer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArtifactVariables<'a> {
    pub entity_name: &'a str,
    pub project_name: &'a str,
    pub name: &'a str,
    pub cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectData {
    pub project: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectNode {
    pub artifact: Option<ArtifactNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtifactNode {
    pub id: String,
    #[serde(default)]
    pub digest: Option<String>,
    pub files: FileConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileConnection {
    pub page_info: PageInfo,
    pub edges: Vec<FileEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileEdge {
    pub node: ArtifactFile,
}
