//! Per-stage JSON checkpoint artifacts.
//!
//! Each stage writes its output artifact before returning so later stages
//! can be re-run independently. Artifacts carry the exact in-memory shapes
//! from `tickercast-core`, which keeps staged and monolithic runs
//! interchangeable at every boundary. Gathered records live in a `BTreeMap`
//! so rewrites of unchanged state are byte-identical.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use tickercast_core::{AnalysisRecord, GatheredRecord};

const GATHERED_FILE: &str = "gathered.json";
const ANALYSES_FILE: &str = "analyses.json";
const RANKED_FILE: &str = "ranked.json";

/// Checkpoint faults. A missing artifact ("run the prior stage first") is
/// deliberately distinct from a malformed one.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file not found: {path} — run the '{run_first}' stage first")]
    Missing { path: String, run_first: &'static str },

    #[error("malformed state file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("state IO error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// File-per-stage checkpoint store under a configurable directory.
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist the gathered map. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the directory or file cannot be written.
    pub fn save_gathered(
        &self,
        gathered: &BTreeMap<String, GatheredRecord>,
    ) -> Result<PathBuf, StateError> {
        self.save(GATHERED_FILE, gathered)
    }

    /// Load the gathered map produced by the gather stage.
    ///
    /// # Errors
    ///
    /// [`StateError::Missing`] when the gather stage has not run yet,
    /// [`StateError::Malformed`] when the artifact does not parse.
    pub fn load_gathered(&self) -> Result<BTreeMap<String, GatheredRecord>, StateError> {
        self.load(GATHERED_FILE, "gather")
    }

    /// Persist the analysis records. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the directory or file cannot be written.
    pub fn save_analyses(&self, analyses: &[AnalysisRecord]) -> Result<PathBuf, StateError> {
        self.save(ANALYSES_FILE, &analyses)
    }

    /// Load the analysis records produced by the analyze stage.
    ///
    /// # Errors
    ///
    /// [`StateError::Missing`] when the analyze stage has not run yet,
    /// [`StateError::Malformed`] when the artifact does not parse.
    pub fn load_analyses(&self) -> Result<Vec<AnalysisRecord>, StateError> {
        self.load(ANALYSES_FILE, "analyze")
    }

    /// Persist the ranked records. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the directory or file cannot be written.
    pub fn save_ranked(&self, ranked: &[AnalysisRecord]) -> Result<PathBuf, StateError> {
        self.save(RANKED_FILE, &ranked)
    }

    /// Load the ranked records produced by the rank stage.
    ///
    /// # Errors
    ///
    /// [`StateError::Missing`] when the rank stage has not run yet,
    /// [`StateError::Malformed`] when the artifact does not parse.
    pub fn load_ranked(&self) -> Result<Vec<AnalysisRecord>, StateError> {
        self.load(RANKED_FILE, "rank")
    }

    fn save<T: Serialize>(&self, file: &str, value: &T) -> Result<PathBuf, StateError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StateError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;
        let path = self.dir.join(file);
        let mut body = serde_json::to_string_pretty(value).map_err(|e| StateError::Malformed {
            path: path.display().to_string(),
            source: e,
        })?;
        body.push('\n');
        std::fs::write(&path, body).map_err(|e| StateError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(path)
    }

    fn load<T: DeserializeOwned>(
        &self,
        file: &str,
        run_first: &'static str,
    ) -> Result<T, StateError> {
        let path = self.dir.join(file);
        let body = match std::fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StateError::Missing {
                    path: path.display().to_string(),
                    run_first,
                })
            }
            Err(e) => {
                return Err(StateError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&body).map_err(|e| StateError::Malformed {
            path: path.display().to_string(),
            source: e,
        })
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore").field("dir", &self.dir).finish()
    }
}
