//! Spintax parsing, resolution and tidying
//!
//! Spintax is the `{alt1|alt2}` alternation syntax. Groups nest, a `~` prefix
//! pins a group to the ordered alternative and a `!` prefix turns the group
//! into a randomised list whose first entry holds the list parameters.

mod ast;
mod reorder;
mod resolve;
mod tidy;

pub use ast::{parse, Document, Group, GroupKind, Node};
pub use reorder::reorder_spin;
pub use resolve::{
    spin_text, spin_text_with, SpinEvent, SpinHooks, SpinOptions, SpinType, SpintaxTags,
    FLATTEN_ATTEMPTS, FLATTEN_MISS_LIMIT, ORDERED_INDEX_RANGE,
};
pub use tidy::spin_tidy;
pub(crate) use tidy::with_article;
