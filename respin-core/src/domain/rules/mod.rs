//! Pattern rules that restructure sentences
//!
//! A rule is a chain of commands matched against the tagged tokens of a
//! clause plus an order in which the matched pieces are emitted again.

mod command;
mod matcher;
mod rewrite;
mod rule;

pub use command::{Command, PosFilter};
pub use matcher::{find_matches, RuleRun};
pub use rule::{OrderItem, Rule, RuleSet, WordList};
