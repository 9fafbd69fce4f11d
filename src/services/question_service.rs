use crate::dto::generation_dto::GeneratedQuestion;
use crate::error::Result;
use crate::models::question::{Question, QuestionOption, QuestionWithOptions};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

#[derive(Clone)]
pub struct QuestionService {
    pool: SqlitePool,
}

impl QuestionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the whole batch in one transaction and returns the new question ids.
    pub async fn insert_batch(&self, questions: &[GeneratedQuestion]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(questions.len());

        for question in questions {
            let question_id = sqlx::query("INSERT INTO questions (text) VALUES (?1)")
                .bind(&question.text)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

            for option in &question.options {
                sqlx::query(
                    "INSERT INTO options (question_id, text, is_correct) VALUES (?1, ?2, ?3)",
                )
                .bind(question_id)
                .bind(&option.text)
                .bind(option.is_correct)
                .execute(&mut *tx)
                .await?;
            }

            ids.push(question_id);
        }

        tx.commit().await?;
        tracing::info!(count = ids.len(), "saved question batch");
        Ok(ids)
    }

    pub async fn list_with_options(&self) -> Result<Vec<QuestionWithOptions>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT question_id, text FROM questions ORDER BY question_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let options = sqlx::query_as::<_, QuestionOption>(
            "SELECT option_id, question_id, text, is_correct FROM options ORDER BY option_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
        for option in options {
            by_question.entry(option.question_id).or_default().push(option);
        }

        Ok(questions
            .into_iter()
            .map(|q| QuestionWithOptions {
                options: by_question.remove(&q.question_id).unwrap_or_default(),
                question_id: q.question_id,
                text: q.text,
            })
            .collect())
    }

    /// Questions for the given ids, in the order of `ids`. Ids no longer in the store are skipped.
    pub async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<QuestionWithOptions>> {
        let mut all: HashMap<i64, QuestionWithOptions> = self
            .list_with_options()
            .await?
            .into_iter()
            .map(|q| (q.question_id, q))
            .collect();

        Ok(ids.iter().filter_map(|id| all.remove(id)).collect())
    }

    pub async fn get_with_options(&self, question_id: i64) -> Result<Option<QuestionWithOptions>> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT question_id, text FROM questions WHERE question_id = ?1",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(question) = question else {
            return Ok(None);
        };

        let options = sqlx::query_as::<_, QuestionOption>(
            "SELECT option_id, question_id, text, is_correct FROM options WHERE question_id = ?1 ORDER BY option_id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuestionWithOptions {
            question_id: question.question_id,
            text: question.text,
            options,
        }))
    }

    pub async fn question_ids(&self) -> Result<Vec<i64>> {
        let rows = sqlx::query("SELECT question_id FROM questions ORDER BY question_id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| r.try_get::<i64, _>("question_id").map_err(Into::into))
            .collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }
}
