pub mod catalog;
pub mod service;
pub mod store;
pub mod traits;

pub use catalog::Catalog;
pub use service::QuestionService;
pub use store::*;
pub use traits::*;
