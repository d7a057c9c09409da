use crate::catalog::Catalog;
use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{PersistenceMetadata, QuestionGateway};
use async_trait::async_trait;
use quizr_core::{QuizError, QuizResult};
use quizr_domain::{Question, QuestionAction};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

const FORMAT_VERSION: u32 = 1;

/// JSON file-based question store
/// Every applied batch rewrites the whole file atomically
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
    write_lock: Mutex<()>,
}

/// On-disk layout of the JSON file
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub questions: Catalog,
}

impl JsonEnvelope {
    pub fn empty() -> Self {
        Self {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(FORMAT_VERSION, Uuid::new_v4()),
            questions: Catalog::new(),
        }
    }

    pub fn to_json_string(&self) -> QuizResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| QuizError::Serialization(e.to_string()))
    }
}

impl JsonFileStore {
    /// Create a new JSON file store
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_instance_id(path, Uuid::new_v4())
    }

    /// Create a new JSON file store with a specific instance ID
    pub fn with_instance_id(path: impl AsRef<Path>, instance_id: Uuid) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id,
            write_lock: Mutex::new(()),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn load(&self) -> QuizResult<Catalog> {
        if !self.exists().await {
            return Ok(Catalog::new());
        }

        let file_bytes = AtomicWriter::read_all(&self.path).await?;
        let envelope: JsonEnvelope = serde_json::from_slice(&file_bytes)
            .map_err(|e| QuizError::Serialization(e.to_string()))?;

        if envelope.version != FORMAT_VERSION {
            return Err(QuizError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }

        Ok(envelope.questions)
    }

    async fn save(&self, catalog: Catalog) -> QuizResult<PersistenceMetadata> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(FORMAT_VERSION, self.instance_id),
            questions: catalog,
        };
        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| QuizError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes).await?;

        tracing::info!(
            "Saved {} question(s) to {}",
            envelope.questions.len(),
            self.path.display()
        );
        Ok(envelope.metadata)
    }
}

#[async_trait]
impl QuestionGateway for JsonFileStore {
    async fn get_question(&self, id: &str) -> QuizResult<Question> {
        self.load().await?.get(id)
    }

    async fn list_questions(&self) -> QuizResult<Vec<Question>> {
        Ok(self.load().await?.list())
    }

    async fn apply_actions(&self, actions: &[QuestionAction]) -> QuizResult<()> {
        let _guard = self.write_lock.lock().await;
        let next = self.load().await?.apply_all(actions)?;
        self.save(next).await?;
        Ok(())
    }
}
