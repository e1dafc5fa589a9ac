//! Part-of-speech support
//!
//! The tag table and match rules live here together with the oracle
//! interface the engine consumes and the text helpers used around it.

pub mod oracle;
pub mod tags;
pub mod text;

pub use oracle::{OracleContext, PosOracle, TokenSpan};
pub use tags::{
    groups, is_proper_noun, GroupId, PosId, PosTagMatchType, TagInfo, TagRow, TagTable, MIXED_ID, MIXED_TAG,
    PHRASE_ID, PHRASE_TAG, UNKNOWN_ID, UNKNOWN_TAG,
};
pub use text::{get_locations, is_punctuation, starts_with_punctuation, strip_html};
