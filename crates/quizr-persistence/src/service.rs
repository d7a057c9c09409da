//! Read, plan, write: the single entry point callers use to run commands.

use crate::traits::QuestionGateway;
use quizr_core::{QuizError, QuizResult};
use quizr_domain::{handle, Question, QuestionAction, QuestionCommand};
use std::sync::Arc;

/// Runs question commands against an explicitly supplied gateway.
///
/// There is no version check between the read and the write of an update,
/// so two concurrent updates of one question can overwrite each other.
#[derive(Clone)]
pub struct QuestionService {
    gateway: Arc<dyn QuestionGateway>,
}

impl QuestionService {
    pub fn new(gateway: Arc<dyn QuestionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_question(&self, id: &str) -> QuizResult<Question> {
        self.gateway.get_question(id).await
    }

    pub async fn list_questions(&self) -> QuizResult<Vec<Question>> {
        self.gateway.list_questions().await
    }

    /// Plan and apply a command, returning the actions that were applied.
    pub async fn execute(&self, command: QuestionCommand) -> QuizResult<Vec<QuestionAction>> {
        if !command.question().has_unique_answer_option_ids() {
            return Err(QuizError::Validation(format!(
                "question {} repeats an answer option id",
                command.question().id
            )));
        }

        tracing::info!("{}", command.description());

        let persisted = match &command {
            QuestionCommand::Create(_) => None,
            QuestionCommand::Update(question) => {
                Some(self.gateway.get_question(&question.id).await?)
            }
        };

        let actions = handle(command, persisted.as_ref())?;
        if actions.is_empty() {
            tracing::debug!("Nothing changed, skipping write");
            return Ok(actions);
        }

        tracing::debug!(
            "Applying actions: {:?}",
            actions.iter().map(QuestionAction::kind).collect::<Vec<_>>()
        );
        self.gateway.apply_actions(&actions).await?;
        Ok(actions)
    }

    pub async fn close(&self) -> QuizResult<()> {
        self.gateway.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::traits::MockQuestionGateway;
    use quizr_domain::{AnswerOption, QuestionDraft};

    fn sample() -> Question {
        Question::new("q1", "What is OOP?")
            .with_answer_option(AnswerOption::new("o1", "object composition", true))
            .with_answer_option(AnswerOption::new("o2", "function composition", false))
    }

    #[tokio::test]
    async fn test_create_applies_two_actions() {
        let mut gateway = MockQuestionGateway::new();
        gateway.expect_get_question().never();
        gateway
            .expect_apply_actions()
            .withf(|actions| {
                actions.len() == 2
                    && actions[0].kind() == "insert_question"
                    && actions[1].kind() == "insert_answer_options"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = QuestionService::new(Arc::new(gateway));
        let actions = service
            .execute(QuestionCommand::Create(sample()))
            .await
            .unwrap();
        assert_eq!(actions.len(), 2);
    }

    #[tokio::test]
    async fn test_unchanged_update_does_not_write() {
        let mut gateway = MockQuestionGateway::new();
        gateway
            .expect_get_question()
            .withf(|id| id == "q1")
            .times(1)
            .returning(|_| Ok(sample()));
        gateway.expect_apply_actions().never();

        let service = QuestionService::new(Arc::new(gateway));
        let actions = service
            .execute(QuestionCommand::Update(sample()))
            .await
            .unwrap();
        assert!(actions.is_empty());
    }

    #[tokio::test]
    async fn test_update_of_missing_question_propagates_not_found() {
        let mut gateway = MockQuestionGateway::new();
        gateway
            .expect_get_question()
            .returning(|id| Err(QuizError::question_not_found(id)));
        gateway.expect_apply_actions().never();

        let service = QuestionService::new(Arc::new(gateway));
        let err = service
            .execute(QuestionCommand::Update(sample()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_gateway_write_errors_propagate() {
        let mut gateway = MockQuestionGateway::new();
        gateway
            .expect_apply_actions()
            .returning(|_| Err(QuizError::Database("disk full".to_string())));

        let service = QuestionService::new(Arc::new(gateway));
        let err = service
            .execute(QuestionCommand::Create(sample()))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Database(_)));
    }

    #[tokio::test]
    async fn test_repeated_option_ids_rejected() {
        let mut gateway = MockQuestionGateway::new();
        gateway.expect_apply_actions().never();

        let question = sample().with_answer_option(AnswerOption::new("o1", "again", false));
        let service = QuestionService::new(Arc::new(gateway));
        let err = service
            .execute(QuestionCommand::Create(question))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_then_update_against_memory_store() {
        let service = QuestionService::new(Arc::new(MemoryStore::new()));

        let create = QuestionDraft::new("What is OOP?")
            .with_answer_option("object composition", true)
            .with_answer_option("function composition", false)
            .into_create_command();
        let id = create.question().id.clone();
        service.execute(create).await.unwrap();

        let stored = service.get_question(&id).await.unwrap();
        let mut draft = QuestionDraft::from(&stored);
        draft.prompt = "What is Object-Oriented Programming?".to_string();
        draft.answer_options.retain(|a| a.correct);

        let actions = service
            .execute(draft.into_update_command(id.clone()))
            .await
            .unwrap();
        let kinds: Vec<_> = actions.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec!["update_question", "remove_answer_options"]);

        let updated = service.get_question(&id).await.unwrap();
        assert_eq!(updated.prompt, "What is Object-Oriented Programming?");
        assert_eq!(updated.answer_options.len(), 1);
        assert_eq!(service.list_questions().await.unwrap().len(), 1);
        service.close().await.unwrap();
    }
}
