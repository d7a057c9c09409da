use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quizr_core::QuizResult;
use quizr_domain::{Question, QuestionAction};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for persistence operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    /// Version of the persistence format
    pub format_version: u32,
    /// ID of the instance that performed the save
    pub instance_id: Uuid,
    /// When this data was saved
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(format_version: u32, instance_id: Uuid) -> Self {
        Self {
            format_version,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Storage port for question aggregates.
///
/// Implementations apply each action kind as its own independent case and
/// must treat one `apply_actions` call as a single atomic unit: either
/// every action is stored or none is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGateway: Send + Sync {
    /// Load a question with its answer options (ordered by option id).
    /// Fails with `NotFound` when no question has this id.
    async fn get_question(&self, id: &str) -> QuizResult<Question>;

    /// All stored questions, ordered by id.
    async fn list_questions(&self) -> QuizResult<Vec<Question>>;

    /// Apply a planned action list atomically.
    async fn apply_actions(&self, actions: &[QuestionAction]) -> QuizResult<()>;

    /// Release underlying resources. Stores without any are no-ops.
    async fn close(&self) -> QuizResult<()> {
        Ok(())
    }
}
