use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::answer_option::AnswerOption;

pub type QuestionId = String;

/// A question together with its answer options.
///
/// Snapshots are treated as values: the helpers below return new snapshots
/// instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(default)]
    pub answer_options: Vec<AnswerOption>,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            answer_options: Vec::new(),
        }
    }

    pub fn with_answer_option(mut self, answer_option: AnswerOption) -> Self {
        self.answer_options.push(answer_option);
        self
    }

    pub fn without_answer_option(mut self, answer_option_id: &str) -> Self {
        self.answer_options.retain(|a| a.id != answer_option_id);
        self
    }

    pub fn answer_option(&self, answer_option_id: &str) -> Option<&AnswerOption> {
        self.answer_options.iter().find(|a| a.id == answer_option_id)
    }

    pub fn answer_option_ids(&self) -> HashSet<&str> {
        self.answer_options.iter().map(|a| a.id.as_str()).collect()
    }

    pub fn has_unique_answer_option_ids(&self) -> bool {
        self.answer_option_ids().len() == self.answer_options.len()
    }
}
