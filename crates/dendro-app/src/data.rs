// Data plumbing for the host: records come from a JSON file on disk,
// actions are resolved by name and logged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dendro_core::{ActionInvoker, ActionRef, BackendError, DataSource, NodeId, Record};

/// One record in a records file. `parent` is absent or null for the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDoc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

impl RecordDoc {
    pub fn to_record(&self) -> Record {
        Record::new(self.id.clone(), self.name.clone(), self.parent.clone())
    }
}

// ──────────────────────────────────────────────
// JsonFileSource
// ──────────────────────────────────────────────

/// Reads the full record list from a JSON file. The subject id is ignored;
/// a file always describes exactly one tree.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for JsonFileSource {
    fn fetch_records(&mut self, _subject_id: &str) -> Result<Vec<Record>, BackendError> {
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| BackendError::new(format!("read {}: {}", self.path.display(), e)))?;
        let docs: Vec<RecordDoc> = serde_json::from_str(&data)
            .map_err(|e| BackendError::new(format!("parse {}: {}", self.path.display(), e)))?;
        Ok(docs.iter().map(RecordDoc::to_record).collect())
    }
}

// ──────────────────────────────────────────────
// LoggingInvoker
// ──────────────────────────────────────────────

/// Stand-in action handler: logs each invocation instead of calling into
/// an external system.
#[derive(Default)]
pub struct LoggingInvoker;

impl ActionInvoker for LoggingInvoker {
    fn invoke(&mut self, action: &ActionRef, subject_ids: &[NodeId]) -> Result<(), BackendError> {
        log::info!("action {} invoked for {:?}", action, subject_ids);
        Ok(())
    }
}
