// src/lib.rs
//! CV/job matching and tailoring core.
//!
//! Scores a candidate CV against a job description (keyword coverage plus
//! embedding similarity), extracts named entities from free text via an
//! LLM, and generates a tailored CV gated on match quality, with
//! deterministic formatting of the generated markup into a styled document
//! model.
//!
//! External capabilities (embedding service, LLM chat service) are plain
//! injected clients; persistence, auth, file ingestion and HTTP routing
//! live outside this crate.

pub mod analysis;
pub mod capabilities;
pub mod config;
pub mod document;
pub mod entities;
pub mod error;
pub mod tailoring;

pub use analysis::{MatchAnalysis, MatchAnalyzer, MatchLevel};
pub use capabilities::{EmbeddingClient, OllamaClient};
pub use config::CoreConfig;
pub use document::{TailoredCv, TextDocument};
pub use entities::{EntityExtractor, EntityMap, ExtractedEntities};
pub use error::CoreError;
pub use tailoring::{GenerationOutcome, TailoringGenerator};
