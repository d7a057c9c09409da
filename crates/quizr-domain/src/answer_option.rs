use serde::{Deserialize, Serialize};

pub type AnswerOptionId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: AnswerOptionId,
    pub answer: String,
    pub correct: bool,
}

impl AnswerOption {
    pub fn new(id: impl Into<AnswerOptionId>, answer: impl Into<String>, correct: bool) -> Self {
        Self {
            id: id.into(),
            answer: answer.into(),
            correct,
        }
    }

    /// Same option (by id) whose content was edited.
    pub fn differs_from(&self, other: &AnswerOption) -> bool {
        self.answer != other.answer || self.correct != other.correct
    }
}
