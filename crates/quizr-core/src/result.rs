use crate::error::QuizError;

pub type QuizResult<T> = Result<T, QuizError>;
