use quizr_core::{QuizError, QuizResult};
use serde::{Deserialize, Serialize};

use crate::action::QuestionAction;
use crate::changes::detect_changes;
use crate::planner::plan_update_actions;
use crate::question::Question;

pub mod draft;

pub use draft::{AnswerOptionDraft, QuestionDraft};

/// Inbound request to create or update a question.
///
/// Commands are self-contained: both variants carry the full target
/// snapshot, including pre-assigned ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "question", rename_all = "snake_case")]
pub enum QuestionCommand {
    Create(Question),
    Update(Question),
}

impl QuestionCommand {
    pub fn question(&self) -> &Question {
        match self {
            QuestionCommand::Create(question) | QuestionCommand::Update(question) => question,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, QuestionCommand::Create(_))
    }

    /// Human-readable description of what this command does
    pub fn description(&self) -> String {
        match self {
            QuestionCommand::Create(question) => format!(
                "Create question {} with {} answer option(s)",
                question.id,
                question.answer_options.len()
            ),
            QuestionCommand::Update(question) => format!("Update question {}", question.id),
        }
    }
}

/// Decide the actions for a command.
///
/// `persisted` is the currently stored version of the question and is only
/// consulted for updates. Performs no I/O.
pub fn handle(
    command: QuestionCommand,
    persisted: Option<&Question>,
) -> QuizResult<Vec<QuestionAction>> {
    match command {
        QuestionCommand::Create(question) => Ok(plan_create_actions(question)),
        QuestionCommand::Update(question) => {
            let persisted = persisted.ok_or_else(|| {
                QuizError::PreconditionFailed(format!(
                    "cannot process the command: question {} was not loaded",
                    question.id
                ))
            })?;

            if persisted.id != question.id {
                return Err(QuizError::PreconditionFailed(format!(
                    "cannot process the command: loaded question {} does not match {}",
                    persisted.id, question.id
                )));
            }

            let facts = detect_changes(persisted, &question);
            Ok(plan_update_actions(&question, &facts))
        }
    }
}

fn plan_create_actions(question: Question) -> Vec<QuestionAction> {
    let insert_question = QuestionAction::insert_question(&question);
    let insert_answer_options = QuestionAction::InsertAnswerOptions {
        question_id: question.id,
        answer_options: question.answer_options,
    };
    vec![insert_question, insert_answer_options]
}
