use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::services::ai_service::QuestionGenerator;
use crate::services::extract_service::ExtractService;
use crate::services::question_service::QuestionService;

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub files: usize,
    pub question_ids: Vec<i64>,
}

/// One-shot batch: extract, generate, persist.
pub struct GenerationJob<G> {
    generator: G,
    questions: QuestionService,
}

impl<G: QuestionGenerator> GenerationJob<G> {
    pub fn new(generator: G, questions: QuestionService) -> Self {
        Self {
            generator,
            questions,
        }
    }

    pub async fn run(&self, paths: &[PathBuf], num_questions: usize) -> Result<GenerationReport> {
        if num_questions == 0 {
            return Err(Error::BadRequest(
                "number of questions must be at least 1".to_string(),
            ));
        }

        let text = ExtractService::extract_all(paths)?;
        tracing::info!(files = paths.len(), chars = text.len(), "documents extracted");

        let generated = self.generator.generate(&text, num_questions).await?;
        if generated.len() != num_questions {
            return Err(Error::Generation(format!(
                "expected {} questions, received {}",
                num_questions,
                generated.len()
            )));
        }

        let question_ids = self.questions.insert_batch(&generated).await?;

        Ok(GenerationReport {
            files: paths.len(),
            question_ids,
        })
    }
}
