pub mod document;
pub mod sections;

pub use document::{McpRequirements, SkillDocument, SkillMetadata};
pub use sections::{normalize_section_key, parse_sections, Sections};
