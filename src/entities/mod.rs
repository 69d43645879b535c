// src/entities/mod.rs
//! Named entity extraction over free CV/job text, with heuristic linking of
//! titles and degrees into structured blocks.

pub mod extractor;
pub mod types;

pub use extractor::{organize_entities, EntityExtractor};
pub use types::{
    EducationBlock, EntityMap, ExperienceBlock, ExtractedEntities, StructuredEntities,
    ENTITY_TYPES,
};
