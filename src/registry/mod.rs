//! Downloads versioned model artifacts from the experiment-tracking registry into
//! the directory the model loader reads.

mod client;
mod types;

pub use client::{ArtifactRegistry, WandbRegistry};
pub use types::{ArtifactFile, ArtifactManifest, ArtifactRef, Viewer};

use crate::{Error, Result, config::RegistryConfig};
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Everything the fetcher needs, validated from configuration.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub api_key: String,
    pub artifact: ArtifactRef,
    pub download_dir: PathBuf,
}

impl FetchRequest {
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let api_key = required(&config.api_key, "WANDB_API_KEY")?;
        let model_name = required(&config.model_name, "MODEL_NAME")?;
        let version = required(&config.version, "VERSION")?;

        Ok(Self {
            api_key,
            artifact: ArtifactRef::new(&model_name, &version)?,
            download_dir: PathBuf::from(&config.download_dir),
        })
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::config(format!("{} is not set", name)))
}

/// Joins a registry file name onto `root`, refusing names that would escape it.
pub fn destination(root: &Path, file_name: &str) -> Result<PathBuf> {
    let relative = Path::new(file_name);
    let safe = !file_name.is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !safe {
        return Err(Error::registry(format!(
            "Refusing to write artifact file '{}' outside the download directory",
            file_name
        )));
    }
    Ok(root.join(relative))
}

/// Authenticates, resolves `artifact` and downloads all of its files into
/// `download_dir`. Returns the directory.
pub async fn fetch_artifact(
    registry: &dyn ArtifactRegistry,
    artifact: &ArtifactRef,
    download_dir: &Path,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(download_dir).await?;

    let viewer = registry.authenticate().await?;
    info!(
        "Authenticated as {}",
        viewer.username.as_deref().unwrap_or("<unknown>")
    );

    let artifact = match (&artifact.entity, viewer.entity.as_deref()) {
        (None, Some(entity)) => artifact.clone().with_default_entity(entity),
        _ => artifact.clone(),
    };
    info!("Resolving artifact {}", artifact);

    let manifest = registry.resolve(&artifact).await?;
    info!(
        "Artifact {} has {} file(s)",
        manifest.id,
        manifest.files.len()
    );

    for file in &manifest.files {
        let dest = destination(download_dir, &file.name)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = registry.download(file, &dest).await?;
        info!("Downloaded {} ({} bytes)", file.name, bytes);
    }

    Ok(download_dir.to_path_buf())
}

pub async fn run(config: &RegistryConfig) -> Result<PathBuf> {
    let request = FetchRequest::from_config(config)?;
    println!("{}", request.artifact);

    let registry = WandbRegistry::new(&config.base_url, request.api_key.clone());
    let dir = fetch_artifact(&registry, &request.artifact, &request.download_dir).await?;

    println!("Model downloaded @ {}", dir.display());
    Ok(dir)
}
