//! Statistical model storage
//!
//! Resolves Punkt model files on disk and, when allowed, downloads a missing
//! model from a configured base URL before the first use.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::punkt::PunktModel;
use crate::error::{Result, SplitError};

/// Environment variable overriding the model directory
pub const MODEL_DIR_ENV: &str = "STREAMSPLIT_MODEL_DIR";

/// Location of model files plus an optional download source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStore {
    dir: PathBuf,
    base_url: Option<String>,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url,
        }
    }

    /// `$STREAMSPLIT_MODEL_DIR`, else the platform cache directory, else the temp directory
    pub fn default_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(MODEL_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("streamsplit")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self, language: &str) -> PathBuf {
        self.dir.join(model_file_name(language))
    }

    /// Make sure a model file exists locally, downloading it unless `offline`
    pub async fn ensure_model(&self, language: &str, offline: bool) -> Result<PathBuf> {
        let path = self.model_path(language);
        if tokio::fs::try_exists(&path).await? {
            debug!("Model for {} already present at {}", language, path.display());
            return Ok(path);
        }

        let missing = || SplitError::ModelMissing {
            language: language.to_string(),
            path: path.clone(),
        };
        if offline {
            return Err(missing());
        }
        let Some(base_url) = &self.base_url else {
            return Err(missing());
        };

        let url = format!("{}/{}", base_url.trim_end_matches('/'), model_file_name(language));
        info!("Downloading model for {} from {}", language, url);

        let response = reqwest::get(&url)
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| SplitError::Download {
                url: url.clone(),
                source,
            })?;
        let bytes = response.bytes().await.map_err(|source| SplitError::Download {
            url: url.clone(),
            source,
        })?;

        // Refuse to persist something the loader cannot read
        let content = String::from_utf8_lossy(&bytes);
        PunktModel::from_json(&content, &path)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let partial = path.with_extension("json.partial");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, &path).await?;

        info!("Stored model for {} at {} ({} bytes)", language, path.display(), bytes.len());
        Ok(path)
    }

    pub async fn load(&self, path: &Path) -> Result<PunktModel> {
        let content = tokio::fs::read_to_string(path).await?;
        PunktModel::from_json(&content, path)
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(Self::default_dir(), None)
    }
}

fn model_file_name(language: &str) -> String {
    format!("punkt-{language}.json")
}
