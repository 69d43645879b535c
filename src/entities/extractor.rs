// src/entities/extractor.rs
//! LLM-backed named entity extraction with strict and safe modes.

use serde_json::Value;
use tracing::{error, info, warn};

use super::types::{
    EducationBlock, EntityMap, ExperienceBlock, ExtractedEntities, StructuredEntities,
};
use crate::capabilities::llm::{strip_code_fence, CAPABILITY};
use crate::capabilities::OllamaClient;
use crate::error::CoreError;

const NER_SYSTEM_PROMPT: &str = r#"You are an expert Named Entity Recognition (NER) system.
Your task is to extract named entities from text and return them in a structured JSON format.

Extract the following entity types:
1. PERSON: Full names of people (e.g., "John Doe", "Marie Martin")
2. ORGANIZATION: Company names, institutions, universities (e.g., "Microsoft", "MIT", "Google")
3. LOCATION: Cities, countries, addresses (e.g., "Paris", "United States", "123 Main St")
4. SKILLS: Technical and soft skills (e.g., "Project Management", "Communication", "Python")
5. TECHNOLOGIES: Programming languages, tools, frameworks, software (e.g., "React", "Docker", "PostgreSQL")
6. EDUCATION: Degrees, certifications, courses (e.g., "Bachelor of Science", "AWS Certified", "MBA")
7. EXPERIENCE: Job titles, roles, positions (e.g., "Software Engineer", "Project Manager", "Data Scientist")
8. DATE: Dates mentioned (e.g., "2020-2024", "January 2023", "2019")
9. CONTACT: Email addresses, phone numbers, URLs, social media profiles

IMPORTANT:
- Return ONLY valid JSON, no additional text or markdown
- Each entity type should be a list of strings
- Remove duplicates
- Be precise and extract only relevant entities
- If an entity type has no matches, return an empty list for that type

Output format:
{
  "PERSON": ["entity1", "entity2"],
  "ORGANIZATION": ["entity1"],
  "LOCATION": ["entity1"],
  "SKILLS": ["entity1", "entity2"],
  "TECHNOLOGIES": ["entity1", "entity2"],
  "EDUCATION": ["entity1"],
  "EXPERIENCE": ["entity1"],
  "DATE": ["entity1"],
  "CONTACT": ["entity1"]
}"#;

pub struct EntityExtractor {
    llm: OllamaClient,
}

impl EntityExtractor {
    pub fn new(llm: OllamaClient) -> Self {
        Self { llm }
    }

    /// Extract entities in strict mode: capability failures and undecodable
    /// payloads surface as distinct errors. Empty input yields an empty map
    /// without calling the LLM.
    pub async fn extract(&self, text: &str) -> Result<EntityMap, CoreError> {
        if text.trim().is_empty() {
            warn!("Empty text provided for entity extraction");
            return Ok(EntityMap::default());
        }

        info!(
            "Extracting entities from {} characters of text",
            text.chars().count()
        );

        let user_prompt = format!(
            "Extract all named entities from the following text and return them \
             in JSON format:\n\n{text}\n\nReturn the entities grouped by type in \
             JSON format as specified."
        );

        let content = self.llm.chat(NER_SYSTEM_PROMPT, &user_prompt).await?;
        let cleaned = strip_code_fence(&content);

        let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
            error!("Entity payload is not valid JSON: {}", e);
            CoreError::MalformedResponse {
                capability: CAPABILITY,
                detail: format!("entity payload is not valid JSON: {e}"),
            }
        })?;

        let entities = EntityMap::from_value(&value).ok_or_else(|| {
            warn!("Entity payload decoded to a non-object value");
            CoreError::MalformedResponse {
                capability: CAPABILITY,
                detail: "entity payload is not a JSON object".to_string(),
            }
        })?;

        info!("Extracted {} total entities", entities.total());
        Ok(entities)
    }

    /// Strict extraction plus block linking.
    pub async fn extract_and_structure(&self, text: &str) -> Result<ExtractedEntities, CoreError> {
        let raw = self.extract(text).await?;
        let structured = organize_entities(&raw, text);
        Ok(ExtractedEntities { raw, structured })
    }

    /// Safe mode: never fails. Any extraction problem, including timeouts
    /// and unreachable capabilities, degrades to the empty two-key shape.
    /// Used where extraction is auxiliary and must not block ingestion.
    pub async fn extract_safe(&self, text: &str) -> ExtractedEntities {
        match self.extract_and_structure(text).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("Entity extraction failed (safe mode): {}", e);
                ExtractedEntities::default()
            }
        }
    }
}

/// Link each EXPERIENCE entity to an organization, date and location, and
/// each EDUCATION entity to a school, date and location.
///
/// The link policy is first-match: the first candidate, in extraction
/// order, whose string occurs case-insensitively anywhere in the source
/// text wins. This is a known-imprecise heuristic; when several candidates
/// co-occur the earliest extracted one is attached to every block.
pub fn organize_entities(entities: &EntityMap, source_text: &str) -> StructuredEntities {
    let haystack = source_text.to_lowercase();

    let experience_blocks = entities
        .experience
        .iter()
        .map(|title| ExperienceBlock {
            title: title.clone(),
            company: first_occurring(&entities.organization, &haystack),
            date: first_occurring(&entities.date, &haystack),
            location: first_occurring(&entities.location, &haystack),
        })
        .collect();

    let education_blocks = entities
        .education
        .iter()
        .map(|degree| EducationBlock {
            degree: degree.clone(),
            school: first_occurring(&entities.organization, &haystack),
            date: first_occurring(&entities.date, &haystack),
            location: first_occurring(&entities.location, &haystack),
        })
        .collect();

    StructuredEntities {
        experience_blocks,
        education_blocks,
    }
}

fn first_occurring(candidates: &[String], haystack_lower: &str) -> String {
    candidates
        .iter()
        .find(|candidate| haystack_lower.contains(&candidate.to_lowercase()))
        .cloned()
        .unwrap_or_default()
}
