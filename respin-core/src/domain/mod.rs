//! Domain layer: the text algorithms of the spinning engine
//!
//! Everything in here is free of global state. Shared resources (thesauri,
//! rule sets, POS models) are passed in by reference and randomness always
//! comes from a caller-supplied generator.

pub mod edit;
pub mod error;
pub mod pos;
pub mod protect;
pub mod rng;
pub mod rules;
pub mod spintax;
pub mod thesaurus;
pub mod unique;

pub use edit::{Edit, EditList};
pub use error::DomainError;
pub use protect::ProtectedRegions;
pub use unique::{apply_unique, CharSet, InstantUniqueType};
