use quizr_core::{QuizResult, StorageBackend};
use quizr_persistence::{JsonFileStore, QuestionGateway, QuestionService};
use std::path::Path;
use std::sync::Arc;

pub struct CliContext {
    pub service: QuestionService,
}

impl CliContext {
    pub async fn open(file_path: &Path, backend: StorageBackend) -> QuizResult<Self> {
        let gateway = Self::open_gateway(file_path, backend).await?;
        tracing::debug!("Opened {:?} store at {}", backend, file_path.display());
        Ok(Self {
            service: QuestionService::new(gateway),
        })
    }

    async fn open_gateway(
        file_path: &Path,
        backend: StorageBackend,
    ) -> QuizResult<Arc<dyn QuestionGateway>> {
        match backend {
            StorageBackend::Json => Ok(Arc::new(JsonFileStore::new(file_path))),
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite => Ok(Arc::new(
                quizr_persistence::SqliteStore::open(file_path).await?,
            )),
            #[cfg(not(feature = "sqlite"))]
            StorageBackend::Sqlite => Err(quizr_core::QuizError::Validation(
                "the sqlite backend requires building with the `sqlite` feature".to_string(),
            )),
        }
    }

    pub async fn close(&self) -> QuizResult<()> {
        self.service.close().await
    }
}
