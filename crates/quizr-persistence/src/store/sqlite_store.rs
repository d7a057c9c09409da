use crate::traits::QuestionGateway;
use async_trait::async_trait;
use quizr_core::{QuizError, QuizResult};
use quizr_domain::{AnswerOption, Question, QuestionAction};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SCHEMA: &str = include_str!("../schema.sql");

type OptionRow = (String, String, i64, String);

fn db_err(e: sqlx::Error) -> QuizError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            QuizError::Conflict(db.message().to_string())
        }
        _ => QuizError::Database(e.to_string()),
    }
}

fn to_answer_option((id, answer, correct, _): OptionRow) -> AnswerOption {
    AnswerOption {
        id,
        answer,
        correct: correct != 0,
    }
}

/// SQLite-backed question store.
///
/// Opened explicitly with [`SqliteStore::open`] and released with
/// [`QuestionGateway::close`].
pub struct SqliteStore {
    path: PathBuf,
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn open(path: impl AsRef<Path>) -> QuizResult<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(db_err)?;

        tracing::info!("Opened SQLite database at {}", path.display());
        Ok(Self { path, pool })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_question(conn: &mut SqliteConnection, id: &str) -> QuizResult<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .map_err(db_err)?;

        if count == 0 {
            return Err(QuizError::question_not_found(id));
        }
        Ok(())
    }

    async fn insert_options(
        conn: &mut SqliteConnection,
        question_id: &str,
        answer_options: &[AnswerOption],
    ) -> QuizResult<()> {
        for option in answer_options {
            let existing = sqlx::query_as::<_, OptionRow>(
                "SELECT id, answer, correct, question_id FROM answer_options WHERE id = ?",
            )
            .bind(&option.id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_err)?;

            if let Some(row) = existing {
                let owner = row.3.clone();
                if owner == question_id && !to_answer_option(row).differs_from(option) {
                    continue;
                }
                return Err(QuizError::Conflict(format!(
                    "answer option {} already exists on question {}",
                    option.id, owner
                )));
            }

            sqlx::query(
                "INSERT INTO answer_options (id, answer, correct, question_id) VALUES (?, ?, ?, ?)",
            )
            .bind(&option.id)
            .bind(&option.answer)
            .bind(option.correct)
            .bind(question_id)
            .execute(&mut *conn)
            .await
            .map_err(db_err)?;
        }
        Ok(())
    }

    async fn apply_action(conn: &mut SqliteConnection, action: &QuestionAction) -> QuizResult<()> {
        match action {
            QuestionAction::InsertQuestion {
                id,
                prompt,
                answer_options,
            } => {
                sqlx::query("INSERT INTO questions (id, prompt) VALUES (?, ?)")
                    .bind(id)
                    .bind(prompt)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_err)?;
                Self::insert_options(conn, id, answer_options).await?;
            }
            QuestionAction::UpdateQuestion { id, prompt } => {
                let result = sqlx::query("UPDATE questions SET prompt = ? WHERE id = ?")
                    .bind(prompt)
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_err)?;
                if result.rows_affected() == 0 {
                    return Err(QuizError::question_not_found(id));
                }
            }
            QuestionAction::InsertAnswerOptions {
                question_id,
                answer_options,
            } => {
                Self::ensure_question(conn, question_id).await?;
                Self::insert_options(conn, question_id, answer_options).await?;
            }
            QuestionAction::UpdateAnswerOptions {
                question_id,
                answer_options,
            } => {
                Self::ensure_question(conn, question_id).await?;
                for option in answer_options {
                    let result = sqlx::query(
                        "INSERT INTO answer_options (id, answer, correct, question_id)
                         VALUES (?, ?, ?, ?)
                         ON CONFLICT(id) DO UPDATE SET
                            answer = excluded.answer,
                            correct = excluded.correct
                         WHERE answer_options.question_id = excluded.question_id",
                    )
                    .bind(&option.id)
                    .bind(&option.answer)
                    .bind(option.correct)
                    .bind(question_id)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_err)?;
                    if result.rows_affected() == 0 {
                        return Err(QuizError::Conflict(format!(
                            "answer option {} belongs to another question",
                            option.id
                        )));
                    }
                }
            }
            QuestionAction::RemoveAnswerOptions {
                question_id,
                answer_options,
            } => {
                Self::ensure_question(conn, question_id).await?;
                for option in answer_options {
                    sqlx::query("DELETE FROM answer_options WHERE id = ? AND question_id = ?")
                        .bind(&option.id)
                        .bind(question_id)
                        .execute(&mut *conn)
                        .await
                        .map_err(db_err)?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionGateway for SqliteStore {
    async fn get_question(&self, id: &str) -> QuizResult<Question> {
        let (question_id, prompt) =
            sqlx::query_as::<_, (String, String)>("SELECT id, prompt FROM questions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?
                .ok_or_else(|| QuizError::question_not_found(id))?;

        let answer_options = sqlx::query_as::<_, OptionRow>(
            "SELECT id, answer, correct, question_id FROM answer_options
             WHERE question_id = ? ORDER BY id",
        )
        .bind(&question_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(to_answer_option)
        .collect();

        Ok(Question {
            id: question_id,
            prompt,
            answer_options,
        })
    }

    async fn list_questions(&self) -> QuizResult<Vec<Question>> {
        let mut questions: BTreeMap<String, Question> =
            sqlx::query_as::<_, (String, String)>("SELECT id, prompt FROM questions")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|(id, prompt)| (id.clone(), Question::new(id, prompt)))
                .collect();

        let rows = sqlx::query_as::<_, OptionRow>(
            "SELECT id, answer, correct, question_id FROM answer_options
             ORDER BY question_id, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        for row in rows {
            if let Some(question) = questions.get_mut(&row.3) {
                question.answer_options.push(to_answer_option(row));
            }
        }

        Ok(questions.into_values().collect())
    }

    async fn apply_actions(&self, actions: &[QuestionAction]) -> QuizResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for action in actions {
            // Dropping `tx` on error rolls the whole batch back
            Self::apply_action(&mut tx, action).await?;
        }

        tx.commit().await.map_err(db_err)?;

        tracing::info!(
            "Applied {} action(s) to SQLite database at {}",
            actions.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn close(&self) -> QuizResult<()> {
        self.pool.close().await;
        tracing::debug!("Closed SQLite database at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizr_domain::{handle, QuestionCommand};
    use tempfile::tempdir;

    fn sample() -> Question {
        Question::new("q1", "What is OOP?")
            .with_answer_option(AnswerOption::new("o1", "object composition", true))
            .with_answer_option(AnswerOption::new("o2", "function composition", false))
    }

    async fn seeded_store(dir: &Path) -> SqliteStore {
        let store = SqliteStore::open(dir.join("quizr.db")).await.unwrap();
        let actions = handle(QuestionCommand::Create(sample()), None).unwrap();
        store.apply_actions(&actions).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path()).await;

        assert!(store.path().exists());
        assert_eq!(store.get_question("q1").await.unwrap(), sample());
        assert_eq!(store.list_questions().await.unwrap(), vec![sample()]);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_question_alone_stores_options() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("quizr.db")).await.unwrap();

        store
            .apply_actions(&[QuestionAction::insert_question(&sample())])
            .await
            .unwrap();
        assert_eq!(store.get_question("q1").await.unwrap(), sample());
    }

    #[tokio::test]
    async fn test_option_owned_by_other_question_conflicts() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path()).await;

        let thief = Question::new("q2", "What is FP?")
            .with_answer_option(AnswerOption::new("o1", "object composition", true));
        let actions = handle(QuestionCommand::Create(thief), None).unwrap();
        assert!(matches!(
            store.apply_actions(&actions).await,
            Err(QuizError::Conflict(_))
        ));
        assert!(store.get_question("q2").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_missing_question() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("quizr.db")).await.unwrap();

        assert!(store.get_question("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_plan_applies() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path()).await;

        let persisted = store.get_question("q1").await.unwrap();
        let updated = Question::new("q1", "What is Object-Oriented Programming?")
            .with_answer_option(AnswerOption::new("o1", "object composition", false))
            .with_answer_option(AnswerOption::new("o3", "message passing", true));
        let actions = handle(QuestionCommand::Update(updated.clone()), Some(&persisted)).unwrap();

        store.apply_actions(&actions).await.unwrap();
        assert_eq!(store.get_question("q1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path()).await;

        let actions = vec![
            QuestionAction::UpdateQuestion {
                id: "q1".to_string(),
                prompt: "Changed".to_string(),
            },
            QuestionAction::InsertAnswerOptions {
                question_id: "q1".to_string(),
                answer_options: vec![AnswerOption::new("o1", "duplicate", false)],
            },
        ];

        assert!(matches!(
            store.apply_actions(&actions).await,
            Err(QuizError::Conflict(_))
        ));
        assert_eq!(store.get_question("q1").await.unwrap(), sample());
    }

    #[tokio::test]
    async fn test_duplicate_prompt_conflicts() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path()).await;

        let copy = Question::new("q2", "What is OOP?");
        let actions = handle(QuestionCommand::Create(copy), None).unwrap();
        assert!(matches!(
            store.apply_actions(&actions).await,
            Err(QuizError::Conflict(_))
        ));
        assert_eq!(store.list_questions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_question_is_not_found() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("quizr.db")).await.unwrap();

        let err = store
            .apply_actions(&[QuestionAction::UpdateQuestion {
                id: "ghost".to_string(),
                prompt: "Boo".to_string(),
            }])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
