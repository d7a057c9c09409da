use crate::catalog::Catalog;
use crate::traits::QuestionGateway;
use async_trait::async_trait;
use quizr_core::QuizResult;
use quizr_domain::{Question, QuestionAction};
use tokio::sync::RwLock;

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            catalog: RwLock::new(Catalog::from(questions)),
        }
    }
}

#[async_trait]
impl QuestionGateway for MemoryStore {
    async fn get_question(&self, id: &str) -> QuizResult<Question> {
        self.catalog.read().await.get(id)
    }

    async fn list_questions(&self) -> QuizResult<Vec<Question>> {
        Ok(self.catalog.read().await.list())
    }

    async fn apply_actions(&self, actions: &[QuestionAction]) -> QuizResult<()> {
        let mut guard = self.catalog.write().await;
        let next = guard.apply_all(actions)?;
        *guard = next;
        tracing::debug!("Applied {} action(s) in memory", actions.len());
        Ok(())
    }
}
