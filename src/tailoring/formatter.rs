// src/tailoring/formatter.rs
//! Deterministic conversion of generated markup into a styled document
//! model.
//!
//! The generator emits a constrained markup: `##` section headings, `###`
//! entry headings, `-`/`•`/`*` bullets, plain paragraphs. This module maps
//! it line by line onto typed blocks with fixed presentation styles,
//! without ever altering the text content. Rendering the model to an
//! office format is a downstream concern.

use serde::Serialize;

/// Run-level presentation attributes. Exact values are presentation
/// parameters, not protocol-critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: (u8, u8, u8),
}

const DARK_BLUE: (u8, u8, u8) = (0, 51, 102);
const BLACK: (u8, u8, u8) = (0, 0, 0);
const GREY: (u8, u8, u8) = (64, 64, 64);

pub const SECTION_HEADING_STYLE: TextStyle = TextStyle {
    size_pt: 14.0,
    bold: true,
    italic: false,
    underline: true,
    color: DARK_BLUE,
};

pub const SUB_HEADING_STYLE: TextStyle = TextStyle {
    size_pt: 12.0,
    bold: true,
    italic: false,
    underline: false,
    color: BLACK,
};

pub const BODY_STYLE: TextStyle = TextStyle {
    size_pt: 11.0,
    bold: false,
    italic: false,
    underline: false,
    color: BLACK,
};

pub const CONTACT_STYLE: TextStyle = TextStyle {
    size_pt: 10.5,
    bold: false,
    italic: false,
    underline: false,
    color: BLACK,
};

pub const DATE_LINE_STYLE: TextStyle = TextStyle {
    size_pt: 10.0,
    bold: false,
    italic: true,
    underline: false,
    color: GREY,
};

/// Presentation classification of an ordinary paragraph. Contact lines and
/// date/location ranges get smaller, de-emphasized treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParagraphKind {
    Body,
    Contact,
    DateLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DocBlock {
    SectionHeading(String),
    SubHeading(String),
    Bullet(String),
    Paragraph { text: String, kind: ParagraphKind },
}

impl DocBlock {
    /// Style a renderer should apply to this block's text run.
    pub fn style(&self) -> TextStyle {
        match self {
            DocBlock::SectionHeading(_) => SECTION_HEADING_STYLE,
            DocBlock::SubHeading(_) => SUB_HEADING_STYLE,
            DocBlock::Bullet(_) => BODY_STYLE,
            DocBlock::Paragraph { kind, .. } => match kind {
                ParagraphKind::Body => BODY_STYLE,
                ParagraphKind::Contact => CONTACT_STYLE,
                ParagraphKind::DateLine => DATE_LINE_STYLE,
            },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DocBlock::SectionHeading(text)
            | DocBlock::SubHeading(text)
            | DocBlock::Bullet(text)
            | DocBlock::Paragraph { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormattedDocument {
    pub blocks: Vec<DocBlock>,
}

const CONTACT_MARKERS: [&str; 5] = ["email:", "phone:", "linkedin:", "github:", "location:"];
const DATE_MARKERS: [&str; 3] = ["-", "to", "present"];

/// Convert generated markup into the document model. Pure and
/// deterministic: same content in, same blocks out. Blank lines, empty
/// headings and empty bullets are skipped.
pub fn format_document(content: &str) -> FormattedDocument {
    let mut blocks = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("###") {
            let text = rest.trim_start_matches('#').trim();
            if !text.is_empty() {
                blocks.push(DocBlock::SubHeading(text.to_string()));
            }
        } else if let Some(rest) = line.strip_prefix("##") {
            let text = rest.trim_start_matches('#').trim();
            if !text.is_empty() {
                blocks.push(DocBlock::SectionHeading(text.to_string()));
            }
        } else if line.starts_with('-') || line.starts_with('•') || line.starts_with('*') {
            let text = line.trim_start_matches(['-', '•', '*', ' ']).trim();
            if !text.is_empty() {
                blocks.push(DocBlock::Bullet(text.to_string()));
            }
        } else {
            blocks.push(DocBlock::Paragraph {
                text: line.to_string(),
                kind: classify_paragraph(line),
            });
        }
    }

    FormattedDocument { blocks }
}

fn classify_paragraph(line: &str) -> ParagraphKind {
    let lowered = line.to_lowercase();

    if CONTACT_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return ParagraphKind::Contact;
    }
    if lowered.contains('|') && DATE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return ParagraphKind::DateLine;
    }
    ParagraphKind::Body
}
