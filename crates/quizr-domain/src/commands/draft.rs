use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::QuestionCommand;
use crate::answer_option::{AnswerOption, AnswerOptionId};
use crate::question::{Question, QuestionId};

/// Caller-supplied question content before ids are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    #[serde(default)]
    pub answer_options: Vec<AnswerOptionDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOptionDraft {
    /// Existing option id; `None` for an option that has not been stored yet.
    #[serde(default)]
    pub id: Option<AnswerOptionId>,
    pub answer: String,
    #[serde(default)]
    pub correct: bool,
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl AnswerOptionDraft {
    pub fn new(answer: impl Into<String>, correct: bool) -> Self {
        Self {
            id: None,
            answer: answer.into(),
            correct,
        }
    }

    fn into_answer_option(self) -> AnswerOption {
        AnswerOption {
            id: self.id.unwrap_or_else(new_id),
            answer: self.answer,
            correct: self.correct,
        }
    }
}

impl From<&AnswerOption> for AnswerOptionDraft {
    fn from(option: &AnswerOption) -> Self {
        Self {
            id: Some(option.id.clone()),
            answer: option.answer.clone(),
            correct: option.correct,
        }
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        Self {
            prompt: question.prompt.clone(),
            answer_options: question.answer_options.iter().map(Into::into).collect(),
        }
    }
}

impl QuestionDraft {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer_options: Vec::new(),
        }
    }

    pub fn with_answer_option(mut self, answer: impl Into<String>, correct: bool) -> Self {
        self.answer_options.push(AnswerOptionDraft::new(answer, correct));
        self
    }

    /// Build a create command. The question and every option get fresh ids;
    /// ids already present on the draft are discarded.
    pub fn into_create_command(self) -> QuestionCommand {
        let question = Question {
            id: new_id(),
            prompt: self.prompt,
            answer_options: self
                .answer_options
                .into_iter()
                .map(|draft| AnswerOption {
                    id: new_id(),
                    answer: draft.answer,
                    correct: draft.correct,
                })
                .collect(),
        };
        QuestionCommand::Create(question)
    }

    /// Build an update command for `id`. Options keep their ids; options
    /// without one are treated as new and get a fresh id.
    pub fn into_update_command(self, id: impl Into<QuestionId>) -> QuestionCommand {
        let question = Question {
            id: id.into(),
            prompt: self.prompt,
            answer_options: self
                .answer_options
                .into_iter()
                .map(AnswerOptionDraft::into_answer_option)
                .collect(),
        };
        QuestionCommand::Update(question)
    }
}
