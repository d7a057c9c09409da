pub mod action;
pub mod answer_option;
pub mod changes;
pub mod commands;
pub mod planner;
pub mod question;

pub use action::QuestionAction;
pub use answer_option::{AnswerOption, AnswerOptionId};
pub use changes::{detect_changes, ChangeFacts};
pub use commands::{handle, AnswerOptionDraft, QuestionCommand, QuestionDraft};
pub use planner::plan_update_actions;
pub use question::{Question, QuestionId};
