//! In-memory question table shared by the memory and JSON file stores.

use quizr_core::{QuizError, QuizResult};
use quizr_domain::{AnswerOption, Question, QuestionAction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Question>", into = "Vec<Question>")]
pub struct Catalog {
    questions: BTreeMap<String, Question>,
}

impl From<Vec<Question>> for Catalog {
    fn from(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into_iter().map(|q| (q.id.clone(), q)).collect(),
        }
    }
}

impl From<Catalog> for Vec<Question> {
    fn from(catalog: Catalog) -> Self {
        catalog.questions.into_values().collect()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> QuizResult<Question> {
        self.questions
            .get(id)
            .map(Self::ordered)
            .ok_or_else(|| QuizError::question_not_found(id))
    }

    pub fn list(&self) -> Vec<Question> {
        self.questions.values().map(Self::ordered).collect()
    }

    /// Apply every action to a copy of this catalog. The copy is returned
    /// only when all actions succeed, so a failed batch leaves `self` as is.
    pub fn apply_all(&self, actions: &[QuestionAction]) -> QuizResult<Catalog> {
        let mut next = self.clone();
        for action in actions {
            next.apply(action)?;
        }
        Ok(next)
    }

    pub fn apply(&mut self, action: &QuestionAction) -> QuizResult<()> {
        match action {
            QuestionAction::InsertQuestion {
                id,
                prompt,
                answer_options,
            } => {
                if self.questions.contains_key(id) {
                    return Err(QuizError::Conflict(format!("question {} already exists", id)));
                }
                self.ensure_prompt_available(id, prompt)?;
                self.questions
                    .insert(id.clone(), Question::new(id.clone(), prompt.clone()));
                self.insert_options(id, answer_options)?;
            }
            QuestionAction::UpdateQuestion { id, prompt } => {
                self.question_mut(id)?;
                self.ensure_prompt_available(id, prompt)?;
                self.question_mut(id)?.prompt = prompt.clone();
            }
            QuestionAction::InsertAnswerOptions {
                question_id,
                answer_options,
            } => {
                self.question_mut(question_id)?;
                self.insert_options(question_id, answer_options)?;
            }
            QuestionAction::UpdateAnswerOptions {
                question_id,
                answer_options,
            } => {
                self.question_mut(question_id)?;
                for option in answer_options {
                    match self.option_owner(&option.id) {
                        Some(owner) if owner != *question_id => {
                            return Err(QuizError::Conflict(format!(
                                "answer option {} belongs to question {}",
                                option.id, owner
                            )));
                        }
                        _ => Self::upsert_option(self.question_mut(question_id)?, option),
                    }
                }
            }
            QuestionAction::RemoveAnswerOptions {
                question_id,
                answer_options,
            } => {
                let question = self.question_mut(question_id)?;
                question
                    .answer_options
                    .retain(|existing| !answer_options.iter().any(|a| a.id == existing.id));
            }
        }
        Ok(())
    }

    /// Insert option rows for a question. A row already stored under the
    /// same question with identical content is left as is, so the create
    /// plan's InsertAnswerOptions can follow its InsertQuestion.
    fn insert_options(
        &mut self,
        question_id: &str,
        answer_options: &[AnswerOption],
    ) -> QuizResult<()> {
        for option in answer_options {
            if let Some(owner) = self.option_owner(&option.id) {
                let identical = owner == question_id
                    && self
                        .questions
                        .get(question_id)
                        .and_then(|q| q.answer_option(&option.id))
                        .is_some_and(|existing| !existing.differs_from(option));
                if identical {
                    continue;
                }
                return Err(QuizError::Conflict(format!(
                    "answer option {} already exists on question {}",
                    option.id, owner
                )));
            }
            self.question_mut(question_id)?
                .answer_options
                .push(option.clone());
        }
        Ok(())
    }

    fn question_mut(&mut self, id: &str) -> QuizResult<&mut Question> {
        self.questions
            .get_mut(id)
            .ok_or_else(|| QuizError::question_not_found(id))
    }

    fn ensure_prompt_available(&self, id: &str, prompt: &str) -> QuizResult<()> {
        match self
            .questions
            .values()
            .find(|q| q.prompt == prompt && q.id != id)
        {
            Some(other) => Err(QuizError::Conflict(format!(
                "prompt already used by question {}",
                other.id
            ))),
            None => Ok(()),
        }
    }

    fn option_owner(&self, option_id: &str) -> Option<String> {
        self.questions
            .values()
            .find(|q| q.answer_option(option_id).is_some())
            .map(|q| q.id.clone())
    }

    fn upsert_option(question: &mut Question, option: &AnswerOption) {
        match question
            .answer_options
            .iter_mut()
            .find(|existing| existing.id == option.id)
        {
            Some(existing) => {
                existing.answer = option.answer.clone();
                existing.correct = option.correct;
            }
            None => question.answer_options.push(option.clone()),
        }
    }

    fn ordered(question: &Question) -> Question {
        let mut question = question.clone();
        question.answer_options.sort_by(|a, b| a.id.cmp(&b.id));
        question
    }
}
