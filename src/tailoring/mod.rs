// src/tailoring/mod.rs
//! LLM-driven generation of a job-tailored CV, gated on match quality.

pub mod formatter;

use chrono::Utc;
use tracing::info;

use crate::analysis::MatchAnalysis;
use crate::capabilities::OllamaClient;
use crate::document::{TailoredCv, TextDocument};
use crate::error::CoreError;

/// Generation is only attempted at or above this similarity. Below it the
/// LLM call is skipped entirely.
pub const MIN_SIMILARITY: f64 = 0.60;

const GENERATION_PREFIX_CHARS: usize = 8;

const TAILORING_SYSTEM_PROMPT: &str = r####"You are an expert CV writer and recruiter.
Your task is to tailor an existing CV to match a specific job offer.

Instructions:
1. Analyze the provided CV and job offer
2. Identify the skills and experiences in the CV that match the job requirements
3. Reorder and rephrase the CV to put the most relevant elements forward
4. Keep ALL information from the original CV - do not delete anything, only reorganize it strategically
5. Use the job offer's keywords in the tailored CV
6. Structure the CV professionally with clear sections

Output format rules:
- Use "## " for section headings (e.g. "## Professional Summary")
- Use "### " for individual entries (e.g. "### Senior Engineer - ACME")
- Use "- " for bullet points
- Plain lines for everything else
- No other markup

Suggested sections: Personal Information, Professional Summary, Key Skills,
Professional Experience (most relevant first), Education, Certifications,
Relevant Projects, Languages, Other Skills."####;

/// Outcome of a tailoring request. A skipped generation is an expected
/// result, not a failure.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Generated(TailoredCv),
    Skipped { similarity: f64 },
}

pub struct TailoringGenerator {
    llm: OllamaClient,
}

impl TailoringGenerator {
    pub fn new(llm: OllamaClient) -> Self {
        Self { llm }
    }

    /// Generate a tailored CV for the given pair, provided the analysis
    /// clears the admission threshold. All failures are strict and
    /// distinct: a failed generation must be visible to the requester.
    pub async fn generate(
        &self,
        cv: &TextDocument,
        job: &TextDocument,
        analysis: &MatchAnalysis,
    ) -> Result<GenerationOutcome, CoreError> {
        if analysis.similarity < MIN_SIMILARITY {
            info!(
                "Skipping generation: similarity {} below threshold {}",
                analysis.similarity, MIN_SIMILARITY
            );
            return Ok(GenerationOutcome::Skipped {
                similarity: analysis.similarity,
            });
        }

        if cv.raw_text.trim().is_empty() || job.raw_text.trim().is_empty() {
            return Err(CoreError::InputEmpty);
        }

        // The model gets the full texts, not keyword reductions.
        let user_prompt = build_user_prompt(&cv.raw_text, &job.raw_text);
        let content = self.llm.chat(TAILORING_SYSTEM_PROMPT, &user_prompt).await?;

        let document = formatter::format_document(&content);
        let generated_id = generation_id(&cv.source_id, &job.source_id);
        info!(
            "Generated tailored CV {} ({} blocks)",
            generated_id,
            document.blocks.len()
        );

        Ok(GenerationOutcome::Generated(TailoredCv {
            generated_id,
            similarity: analysis.similarity,
            content,
            document,
            created_at: Utc::now(),
        }))
    }
}

fn build_user_prompt(cv_text: &str, job_text: &str) -> String {
    format!(
        "JOB OFFER:\n{job_text}\n\n---\n\nORIGINAL CV:\n{cv_text}\n\n---\n\n\
         Now generate a tailored CV that highlights the skills and experiences \
         most relevant to this job offer. Keep ALL information from the \
         original CV."
    )
}

/// Stable name for a (CV, job) pair: a fixed-width prefix of each id.
/// Repeated generations for the same pair reuse the name; last writer wins.
/// Two pairs sharing both 8-character prefixes collide - a known, accepted
/// limitation of the scheme.
pub fn generation_id(cv_id: &str, job_id: &str) -> String {
    let cv_prefix: String = cv_id.chars().take(GENERATION_PREFIX_CHARS).collect();
    let job_prefix: String = job_id.chars().take(GENERATION_PREFIX_CHARS).collect();
    format!("tailored_{cv_prefix}_{job_prefix}")
}
