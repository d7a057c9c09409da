use serde::{Deserialize, Serialize};

use crate::answer_option::AnswerOption;
use crate::question::{Question, QuestionId};

/// A single planned storage mutation.
///
/// Actions are produced fresh for each command and consumed once by a
/// gateway; they are never stored themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QuestionAction {
    InsertQuestion {
        id: QuestionId,
        prompt: String,
        answer_options: Vec<AnswerOption>,
    },
    UpdateQuestion {
        id: QuestionId,
        prompt: String,
    },
    InsertAnswerOptions {
        question_id: QuestionId,
        answer_options: Vec<AnswerOption>,
    },
    UpdateAnswerOptions {
        question_id: QuestionId,
        answer_options: Vec<AnswerOption>,
    },
    RemoveAnswerOptions {
        question_id: QuestionId,
        answer_options: Vec<AnswerOption>,
    },
}

impl QuestionAction {
    pub fn insert_question(question: &Question) -> Self {
        QuestionAction::InsertQuestion {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            answer_options: question.answer_options.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QuestionAction::InsertQuestion { .. } => "insert_question",
            QuestionAction::UpdateQuestion { .. } => "update_question",
            QuestionAction::InsertAnswerOptions { .. } => "insert_answer_options",
            QuestionAction::UpdateAnswerOptions { .. } => "update_answer_options",
            QuestionAction::RemoveAnswerOptions { .. } => "remove_answer_options",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_tag() {
        let action = QuestionAction::UpdateQuestion {
            id: "q1".to_string(),
            prompt: "What is FP?".to_string(),
        };
        let value = serde_json::to_value(&action).unwrap();

        assert_eq!(value["action"], "update_question");
        assert_eq!(value["id"], "q1");
        assert_eq!(value["prompt"], "What is FP?");
        assert!(value.get("answer_options").is_none());
    }

    #[test]
    fn test_kind_matches_serialized_tag() {
        let action = QuestionAction::InsertAnswerOptions {
            question_id: "q1".to_string(),
            answer_options: vec![AnswerOption::new("o1", "yes", true)],
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["action"], action.kind());
    }
}
