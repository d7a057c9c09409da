pub mod config;
pub mod error;
pub mod result;

pub use config::{AppConfig, StorageBackend};
pub use error::QuizError;
pub use result::QuizResult;
