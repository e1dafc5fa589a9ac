//! Thesaurus model: quality ratings, candidate entries, per-language lookup
//! and case restyling of replacements.

pub mod case;
pub mod entry;
pub mod loader;
pub mod quality;
pub mod store;

pub use case::{determine_case_code, generate_case_string, CaseCode};
pub use entry::{CandidateInfo, SynonymInfo, ThesaurusEntry};
pub use quality::QualityRating;
pub use store::{Synonym, Thesaurus, ThesaurusStore};
