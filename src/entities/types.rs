// src/entities/types.rs
//! Typed entity map and the structured blocks derived from it.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

/// The closed set of entity tags. Every extraction result carries exactly
/// these nine, each an ordered list of strings.
pub const ENTITY_TYPES: [&str; 9] = [
    "PERSON",
    "ORGANIZATION",
    "LOCATION",
    "SKILLS",
    "TECHNOLOGIES",
    "EDUCATION",
    "EXPERIENCE",
    "DATE",
    "CONTACT",
];

/// Entities extracted from one text, grouped by tag. Never partial: a tag
/// with no matches holds an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct EntityMap {
    pub person: Vec<String>,
    pub organization: Vec<String>,
    pub location: Vec<String>,
    pub skills: Vec<String>,
    pub technologies: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub date: Vec<String>,
    pub contact: Vec<String>,
}

impl EntityMap {
    /// Validate a decoded LLM payload into a complete map. Missing tags
    /// default to empty lists and non-list values are coerced to empty
    /// lists. Returns `None` when the payload is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            person: coerce_list(map.get("PERSON")),
            organization: coerce_list(map.get("ORGANIZATION")),
            location: coerce_list(map.get("LOCATION")),
            skills: coerce_list(map.get("SKILLS")),
            technologies: coerce_list(map.get("TECHNOLOGIES")),
            education: coerce_list(map.get("EDUCATION")),
            experience: coerce_list(map.get("EXPERIENCE")),
            date: coerce_list(map.get("DATE")),
            contact: coerce_list(map.get("CONTACT")),
        })
    }

    /// Total extracted entities across all tags.
    pub fn total(&self) -> usize {
        self.person.len()
            + self.organization.len()
            + self.location.len()
            + self.skills.len()
            + self.technologies.len()
            + self.education.len()
            + self.experience.len()
            + self.date.len()
            + self.contact.len()
    }
}

// Entity lists are ordered and deduplicated; the prompt asks the model to
// remove duplicates, but the invariant is enforced here rather than trusted.
fn coerce_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// A job title linked to its organization, date and location by best-effort
/// substring co-occurrence. Fields are empty strings when unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExperienceBlock {
    pub title: String,
    pub company: String,
    pub date: String,
    pub location: String,
}

/// A degree linked to its school, date and location the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EducationBlock {
    pub degree: String,
    pub school: String,
    pub date: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredEntities {
    #[serde(rename = "EXPERIENCE_BLOCKS")]
    pub experience_blocks: Vec<ExperienceBlock>,
    #[serde(rename = "EDUCATION_BLOCKS")]
    pub education_blocks: Vec<EducationBlock>,
}

/// Full extraction result: the raw tag map plus the derived blocks. This is
/// the shape `extract_safe` always returns, empty on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    pub raw: EntityMap,
    pub structured: StructuredEntities,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_fills_missing_tags() {
        let value = json!({"PERSON": ["Alice"], "SKILLS": "python"});
        let entities = EntityMap::from_value(&value).unwrap();

        assert_eq!(entities.person, vec!["Alice"]);
        // Non-list value coerces to an empty list, not an error.
        assert!(entities.skills.is_empty());
        assert!(entities.organization.is_empty());
        assert_eq!(entities.total(), 1);
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(EntityMap::from_value(&json!(["PERSON"])).is_none());
        assert!(EntityMap::from_value(&json!("text")).is_none());
    }

    #[test]
    fn test_from_value_skips_non_string_items() {
        let value = json!({"DATE": ["2020", 2021, null, "2022"]});
        let entities = EntityMap::from_value(&value).unwrap();
        assert_eq!(entities.date, vec!["2020", "2022"]);
    }

    #[test]
    fn test_from_value_dedups_preserving_order() {
        let value = json!({"SKILLS": ["Python", "Docker", "Python", "Docker", "Rust"]});
        let entities = EntityMap::from_value(&value).unwrap();
        assert_eq!(entities.skills, vec!["Python", "Docker", "Rust"]);
    }

    #[test]
    fn test_serialized_map_has_all_nine_tags() {
        let serialized = serde_json::to_value(EntityMap::default()).unwrap();
        let map = serialized.as_object().unwrap();
        assert_eq!(map.len(), ENTITY_TYPES.len());
        for tag in ENTITY_TYPES {
            assert!(map.contains_key(tag), "missing tag {tag}");
        }
    }

    #[test]
    fn test_default_extracted_entities_shape() {
        let extracted = ExtractedEntities::default();
        assert_eq!(extracted.raw.total(), 0);
        assert!(extracted.structured.experience_blocks.is_empty());
        assert!(extracted.structured.education_blocks.is_empty());
    }
}
