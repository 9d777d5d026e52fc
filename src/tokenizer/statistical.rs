// WHY: Model-backed tokenizer with explicit, idempotent initialization
// A failed initialization is recorded and reported on every use; tokenize never retries it

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::candidates::BoundaryScanner;
use super::model_store::ModelStore;
use super::punkt::PunktModel;
use crate::error::{Result, SplitError};

/// Lifecycle of the statistical backend
#[derive(Debug, Clone)]
pub enum ModelState {
    Uninitialized,
    Ready(Arc<PunktModel>),
    Failed(String),
}

/// Punkt-style statistical sentence tokenizer
#[derive(Debug, Clone)]
pub struct StatisticalTokenizer {
    language: String,
    offline: bool,
    store: ModelStore,
    scanner: BoundaryScanner,
    state: ModelState,
}

impl StatisticalTokenizer {
    /// Create an uninitialized tokenizer; call [`initialize`](Self::initialize) before use
    pub fn new(language: impl Into<String>, offline: bool, store: ModelStore) -> Result<Self> {
        Ok(Self {
            language: language.into(),
            offline,
            store,
            scanner: BoundaryScanner::new()?,
            state: ModelState::Uninitialized,
        })
    }

    /// Create a ready tokenizer from an in-memory model
    pub fn from_model(model: PunktModel) -> Result<Self> {
        Ok(Self {
            language: model.language.clone(),
            offline: true,
            store: ModelStore::default(),
            scanner: BoundaryScanner::new()?,
            state: ModelState::Ready(Arc::new(model)),
        })
    }

    /// Load (and if permitted download) the model; a no-op once ready
    pub async fn initialize(&mut self) {
        if matches!(self.state, ModelState::Ready(_)) {
            debug!("Statistical tokenizer for {} already initialized", self.language);
            return;
        }

        info!("Initializing statistical tokenizer for {}", self.language);
        let loaded = match self.store.ensure_model(&self.language, self.offline).await {
            Ok(path) => self.store.load(&path).await,
            Err(e) => Err(e),
        };

        self.state = match loaded {
            Ok(model) => {
                info!(
                    language = %self.language,
                    abbreviations = model.abbreviations.len(),
                    sentence_starters = model.sentence_starters.len(),
                    "Statistical tokenizer ready"
                );
                ModelState::Ready(Arc::new(model))
            }
            Err(e) => {
                warn!(language = %self.language, error = %e, "Statistical tokenizer initialization failed");
                ModelState::Failed(e.to_string())
            }
        };
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        match &self.state {
            ModelState::Ready(model) => Ok(self.scanner.split(text, |candidate| model.accepts(candidate))),
            ModelState::Failed(reason) => Err(SplitError::TokenizerUnavailable {
                tokenizer: "punkt",
                reason: reason.clone(),
            }),
            ModelState::Uninitialized => Err(SplitError::TokenizerUnavailable {
                tokenizer: "punkt",
                reason: "not initialized".to_string(),
            }),
        }
    }
}
