use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QuizError {
    pub fn question_not_found(id: &str) -> Self {
        QuizError::NotFound(format!("question {}", id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QuizError::NotFound(_))
    }
}
