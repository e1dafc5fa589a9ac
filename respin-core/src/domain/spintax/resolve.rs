//! Spintax resolution
//!
//! Resolution walks the parsed tree depth first. Nested groups are resolved
//! before the group that contains them, and every resolved group can be
//! reported to an observer together with its offsets in the source and in
//! the output.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;

use super::ast::{parse, Group, GroupKind, Node};
use super::reorder::reorder_spin;
use crate::progress::{CancellationToken, ProgressListener, ProgressTracker};

/// Upper bound of the random ordered index drawn for random spins
pub const ORDERED_INDEX_RANGE: usize = 5000;

/// Random resolutions tried when flattening a group at the depth limit
pub const FLATTEN_ATTEMPTS: usize = 5000;

/// Duplicate resolutions tolerated before flattening stops early
pub const FLATTEN_MISS_LIMIT: usize = 100;

/// How existing spintax is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinType {
    /// Leave spintax untouched
    None,
    /// Pick a random alternative
    #[default]
    Random,
    /// Pick alternative `index % count`
    Ordered,
    /// Regenerate the spintax (collapse, flatten and re-tag)
    Respin,
}

impl SpinType {
    /// Legacy integer mapping used for existing-spin handling (2 ordered, 1 random)
    pub fn from_level(level: i32) -> Self {
        match level {
            2 => SpinType::Ordered,
            1 => SpinType::Random,
            _ => SpinType::None,
        }
    }
}

/// Open, separator and close markers used when regenerating spintax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpintaxTags {
    pub open: String,
    pub separator: String,
    pub close: String,
}

impl SpintaxTags {
    pub fn new(open: impl Into<String>, separator: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            separator: separator.into(),
            close: close.into(),
        }
    }
}

impl Default for SpintaxTags {
    fn default() -> Self {
        Self::new("{", "|", "}")
    }
}

/// Options for [`spin_text`]
#[derive(Debug, Clone)]
pub struct SpinOptions {
    pub mode: SpinType,
    /// Alternative index for ordered selection; `None` draws one at random
    pub ordered_index: Option<usize>,
    /// Drop the first ("original") alternative
    pub exclude_original: bool,
    /// `#name#` placeholders expanded to `~{a|b}` before resolving
    pub replacement_tags: BTreeMap<String, Vec<String>>,
    /// Signatures appended on a new line as `~{a|b}`
    pub signatures: Vec<String>,
    /// Respin depth limit, 0 for unlimited
    pub max_depth: usize,
    /// Tags per depth for respin output; the last entry covers deeper groups
    pub tags: Vec<SpintaxTags>,
    /// Number of list variations generated for control groups in respin mode;
    /// 0 keeps control groups as they are
    pub reorder_variations: usize,
    /// Strip `##` protection markers
    pub remove_special_tags: bool,
}

impl Default for SpinOptions {
    fn default() -> Self {
        Self {
            mode: SpinType::Random,
            ordered_index: None,
            exclude_original: false,
            replacement_tags: BTreeMap::new(),
            signatures: Vec::new(),
            max_depth: 0,
            tags: Vec::new(),
            reorder_variations: 1,
            remove_special_tags: false,
        }
    }
}

impl SpinOptions {
    pub fn new(mode: SpinType) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn ordered(index: usize) -> Self {
        Self {
            mode: SpinType::Ordered,
            ordered_index: Some(index),
            ..Self::default()
        }
    }

    pub fn with_exclude_original(mut self, exclude: bool) -> Self {
        self.exclude_original = exclude;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_tags(mut self, tags: Vec<SpintaxTags>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_reorder_variations(mut self, variations: usize) -> Self {
        self.reorder_variations = variations;
        self
    }

    pub fn with_replacement_tags(mut self, tags: BTreeMap<String, Vec<String>>) -> Self {
        self.replacement_tags = tags;
        self
    }

    pub fn with_signatures(mut self, signatures: Vec<String>) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn with_remove_special_tags(mut self, remove: bool) -> Self {
        self.remove_special_tags = remove;
        self
    }

    /// Tags for a group at `depth` (1-based)
    fn tags_for(&self, depth: usize) -> SpintaxTags {
        if self.tags.is_empty() {
            return SpintaxTags::default();
        }
        let index = depth.clamp(1, self.tags.len()) - 1;
        self.tags[index].clone()
    }
}

/// One resolved group
#[derive(Debug, Clone, Copy)]
pub struct SpinEvent<'a> {
    /// Nesting depth, 1 for a top-level group
    pub depth: usize,
    /// Unresolved group text as written in the source
    pub source: &'a str,
    /// Text the group resolved to
    pub resolved: &'a str,
    /// Byte offset of the resolved text in the output
    pub start: usize,
    /// Byte offset of the group in the (preprocessed) source
    pub source_start: usize,
}

/// Optional observers for a spin call
#[derive(Default)]
pub struct SpinHooks<'a> {
    /// Called after each group is resolved, innermost first
    pub on_group: Option<&'a mut dyn FnMut(&SpinEvent<'_>)>,
    pub progress: Option<&'a dyn ProgressListener>,
    pub cancel: Option<&'a CancellationToken>,
}

/// Why a single group could not be resolved
#[derive(Debug, thiserror::Error)]
enum GroupError {
    #[error("group has no alternatives to select from")]
    NoAlternatives,
}

enum Outcome {
    Resolved,
    /// Group left as written; no event is reported
    Skipped,
}

/// Resolve spintax in `source`
pub fn spin_text<R: Rng + ?Sized>(source: &str, options: &SpinOptions, rng: &mut R) -> String {
    spin_text_with(source, options, rng, &mut SpinHooks::default())
}

/// Resolve spintax in `source`, reporting to `hooks`
///
/// Cancellation returns `source` unchanged.
pub fn spin_text_with<R: Rng + ?Sized>(
    source: &str,
    options: &SpinOptions,
    rng: &mut R,
    hooks: &mut SpinHooks<'_>,
) -> String {
    let mut tracker = ProgressTracker::new(hooks.progress);
    tracker.start();

    let prepared = prepare(source, options);
    let ordered_index = match options.ordered_index {
        Some(index) if options.mode != SpinType::Random => index,
        _ => rng.random_range(0..ORDERED_INDEX_RANGE),
    };

    let document = parse(&prepared);
    let mut resolver = Resolver {
        source: &prepared,
        options,
        ordered_index,
        rng,
        on_group: hooks.on_group.as_deref_mut(),
        cancel: hooks.cancel,
        tracker: &mut tracker,
        cancelled: false,
    };

    let mut out = String::with_capacity(prepared.len());
    resolver.render_nodes(&document.nodes, &mut out, true);
    let cancelled = resolver.cancelled;

    tracker.finish();
    if cancelled {
        log::debug!("spin cancelled, returning source text");
        return source.to_string();
    }
    out
}

/// Expand replacement tags, append signatures and strip markers
fn prepare(source: &str, options: &SpinOptions) -> String {
    let mut text = source.to_string();

    for (name, values) in &options.replacement_tags {
        if name.is_empty() || values.is_empty() {
            continue;
        }
        let spin = if values.len() > 1 {
            format!("~{{{}}}", values.join("|"))
        } else {
            values[0].clone()
        };
        text = text.replace(&format!("#{name}#"), &spin);
    }

    if !options.signatures.is_empty() {
        if !source.ends_with('\n') {
            text.push('\n');
        }
        if options.signatures.len() > 1 {
            text.push_str(&format!("~{{{}}}", options.signatures.join("|")));
        } else {
            text.push_str(&options.signatures[0]);
        }
    }

    if options.remove_special_tags {
        text = text.replace("##", "");
    }
    text
}

struct Resolver<'s, 'h, R: Rng + ?Sized> {
    source: &'s str,
    options: &'s SpinOptions,
    ordered_index: usize,
    rng: &'s mut R,
    on_group: Option<&'s mut (dyn FnMut(&SpinEvent<'_>) + 'h)>,
    cancel: Option<&'s CancellationToken>,
    tracker: &'s mut ProgressTracker<'h>,
    cancelled: bool,
}

impl<R: Rng + ?Sized> Resolver<'_, '_, R> {
    fn render_nodes(&mut self, nodes: &[Node], out: &mut String, emit: bool) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Group(group) => self.render_group(group, out, emit),
            }
        }
    }

    fn render_group(&mut self, group: &Group, out: &mut String, emit: bool) {
        if self.cancelled || self.cancel.is_some_and(|c| c.is_cancelled()) {
            self.cancelled = true;
            out.push_str(group.source_text(self.source));
            return;
        }

        let start = out.len();
        let outcome = if self.options.mode == SpinType::None {
            self.render_verbatim(group, out, emit);
            Ok(Outcome::Resolved)
        } else {
            self.resolve_group(group, out, emit)
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                log::debug!(
                    "leaving spintax group at {} unchanged: {e}",
                    group.span.start
                );
                out.truncate(start);
                self.render_verbatim(group, out, emit);
                Outcome::Resolved
            }
        };

        if emit && matches!(outcome, Outcome::Resolved) {
            if let Some(on_group) = self.on_group.as_deref_mut() {
                on_group(&SpinEvent {
                    depth: group.depth,
                    source: group.source_text(self.source),
                    resolved: &out[start..],
                    start,
                    source_start: group.span.start,
                });
            }
        }
        self.tracker
            .report_fraction(group.span.end, self.source.len());
    }

    /// Write the group back with its braces, nested groups still resolved
    fn render_verbatim(&mut self, group: &Group, out: &mut String, emit: bool) {
        if let Some(prefix) = group.kind.prefix() {
            out.push(prefix);
        }
        out.push('{');
        for (i, alternative) in group.alternatives.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            self.render_nodes(alternative, out, emit);
        }
        out.push('}');
    }

    fn resolve_group(&mut self, group: &Group, out: &mut String, emit: bool) -> Result<Outcome, GroupError> {
        let mode = self.options.mode;
        let mut choices: Vec<&[Node]> = if group.has_pipe {
            group.alternatives.iter().map(Vec::as_slice).collect()
        } else {
            Vec::new()
        };

        let exclude = self.options.exclude_original;
        let drop_first = match group.kind {
            GroupKind::Plain => exclude && (choices.len() > 1 || (mode == SpinType::Respin && !choices.is_empty())),
            GroupKind::Ordered => mode == SpinType::Respin && exclude && !choices.is_empty(),
            GroupKind::Control => false,
        };
        if drop_first {
            choices.remove(0);
        }

        if group.kind == GroupKind::Control {
            return self.resolve_control(group, &choices, out);
        }

        if mode != SpinType::Respin || group.kind == GroupKind::Ordered {
            if choices.is_empty() {
                return Err(GroupError::NoAlternatives);
            }
            let index = if mode == SpinType::Random && group.kind != GroupKind::Ordered {
                self.rng.random_range(0..choices.len())
            } else {
                self.ordered_index % choices.len()
            };
            self.render_nodes(choices[index], out, emit);
            return Ok(Outcome::Resolved);
        }

        // respin
        match choices.len() {
            0 => return Ok(Outcome::Resolved),
            1 => {
                self.render_nodes(choices[0], out, emit);
                return Ok(Outcome::Resolved);
            }
            _ => {}
        }

        let max_depth = self.options.max_depth;
        if max_depth > 0 && group.depth > max_depth {
            out.push_str(group.source_text(self.source));
            return Ok(Outcome::Skipped);
        }

        let tags = self.options.tags_for(group.depth);
        out.push_str(&tags.open);
        if max_depth > 0 && group.depth == max_depth && group.has_nested() {
            let flattened = flatten_group(self.source, group, &mut *self.rng);
            out.push_str(&flattened.join(&tags.separator));
        } else {
            for (i, choice) in choices.iter().enumerate() {
                if i > 0 {
                    out.push_str(&tags.separator);
                }
                self.render_nodes(choice, out, emit);
            }
        }
        out.push_str(&tags.close);
        Ok(Outcome::Resolved)
    }

    /// `!{separator:last separator:min:max|value|value}`
    fn resolve_control(&mut self, group: &Group, choices: &[&[Node]], out: &mut String) -> Result<Outcome, GroupError> {
        let mode = self.options.mode;
        if choices.len() <= 1 {
            return Ok(Outcome::Resolved);
        }
        let variations = self.options.reorder_variations;
        if variations < 1 && mode == SpinType::Respin {
            self.render_verbatim(group, out, false);
            return Ok(Outcome::Resolved);
        }

        let mut control = String::new();
        self.render_nodes(choices[0], &mut control, false);
        let params = ControlParams::parse(&control);

        let values: Vec<String> = choices[1..]
            .iter()
            .map(|choice| {
                let mut value = String::new();
                self.render_nodes(choice, &mut value, false);
                value
            })
            .collect();

        if variations == 1 || mode != SpinType::Respin {
            out.push_str(&params.render(&values, &mut *self.rng));
            return Ok(Outcome::Resolved);
        }

        let flatten = self.options.max_depth > 0 && group.depth == self.options.max_depth;
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for _ in 0..variations * 10 {
            let mut variant = params.render(&values, &mut *self.rng);
            if flatten && variant.contains('{') {
                variant = spin_text(&variant, &SpinOptions::default(), &mut *self.rng);
            }
            if seen.insert(variant.clone()) {
                unique.push(variant);
                if unique.len() >= variations {
                    break;
                }
            }
        }

        match unique.len() {
            0 => {}
            1 => out.push_str(&unique[0]),
            _ => {
                let tags = self.options.tags_for(group.depth);
                out.push_str(&tags.open);
                out.push_str(&unique.join(&tags.separator));
                out.push_str(&tags.close);
            }
        }
        Ok(Outcome::Resolved)
    }
}

/// Parsed `separator:last separator:min:max` control parameters
#[derive(Debug, Clone, PartialEq, Eq)]
struct ControlParams {
    separator: String,
    last_separator: String,
    min: i32,
    max: i32,
}

impl ControlParams {
    fn parse(control: &str) -> Self {
        let mut fields = control.split(':');
        let separator = fields.next().unwrap_or_default().to_string();
        let last_separator = fields
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| separator.clone());
        let min = fields.next().and_then(|f| f.trim().parse().ok()).unwrap_or(-1);
        let max = fields.next().and_then(|f| f.trim().parse().ok()).unwrap_or(-1);
        Self {
            separator,
            last_separator,
            min,
            max,
        }
    }

    fn render<R: Rng + ?Sized>(&self, values: &[String], rng: &mut R) -> String {
        reorder_spin(
            values,
            Some(&self.separator),
            Some(&self.last_separator),
            self.min,
            self.max,
            rng,
        )
    }
}

/// Every distinct random resolution of a group, in discovery order
fn flatten_group<R: Rng + ?Sized>(source: &str, group: &Group, rng: &mut R) -> Vec<String> {
    let options = SpinOptions::default();
    let mut seen = HashSet::new();
    let mut results = Vec::new();
    let mut misses = 0;

    for _ in 0..FLATTEN_ATTEMPTS {
        let ordered_index = rng.random_range(0..ORDERED_INDEX_RANGE);
        let mut tracker = ProgressTracker::new(None);
        let mut resolver = Resolver {
            source,
            options: &options,
            ordered_index,
            rng: &mut *rng,
            on_group: None,
            cancel: None,
            tracker: &mut tracker,
            cancelled: false,
        };
        let mut text = String::new();
        resolver.render_group(group, &mut text, false);

        if seen.insert(text.clone()) {
            results.push(text);
        } else {
            misses += 1;
            if misses > FLATTEN_MISS_LIMIT {
                break;
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_ordered_index_wraps() {
        for k in 0..9 {
            let out = spin_text("{a|b|c}", &SpinOptions::ordered(k), &mut rng(1));
            assert_eq!(out, ["a", "b", "c"][k % 3]);
        }
    }

    #[test]
    fn test_random_visits_all_alternatives() {
        let mut rng = rng(42);
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            seen.insert(spin_text("{a|b|c}", &SpinOptions::default(), &mut rng));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_none_mode_is_identity() {
        let text = "Keep {a|b} and ~{c|{d|e}} and !{,:and|x|y} }{ {broken";
        let out = spin_text(text, &SpinOptions::new(SpinType::None), &mut rng(3));
        assert_eq!(out, text);
    }

    #[test]
    fn test_random_scenario_is_seeded() {
        let text = "The {quick|fast} fox jumps.";
        let first = spin_text(text, &SpinOptions::default(), &mut rng(9));
        let second = spin_text(text, &SpinOptions::default(), &mut rng(9));
        assert_eq!(first, second);
        assert!(first == "The quick fox jumps." || first == "The fast fox jumps.");
    }

    #[test]
    fn test_exclude_original() {
        let options = SpinOptions::ordered(0).with_exclude_original(true);
        assert_eq!(spin_text("{a|b|c}", &options, &mut rng(1)), "b");
        // ordered groups keep their first alternative outside respin
        assert_eq!(spin_text("~{a|b}", &options, &mut rng(1)), "a");
    }

    #[test]
    fn test_nested_resolution() {
        let out = spin_text("{x|{y|z}}", &SpinOptions::ordered(1), &mut rng(1));
        assert_eq!(out, "z");
    }

    #[test]
    fn test_group_without_pipe_stays() {
        let out = spin_text("a {b} c", &SpinOptions::default(), &mut rng(1));
        assert_eq!(out, "a {b} c");
    }

    #[test]
    fn test_ordered_prefix_uses_shared_index() {
        let out = spin_text("~{a|b} ~{c|d}", &SpinOptions::default(), &mut rng(5));
        assert!(out == "a c" || out == "b d", "{out}");
    }

    #[test]
    fn test_control_group_lists_values() {
        let out = spin_text("!{,:and|red|blue|green}", &SpinOptions::default(), &mut rng(2));
        for value in ["red", "blue", "green"] {
            assert!(out.contains(value));
        }
        assert!(out.contains(" and "));
    }

    #[test]
    fn test_respin_collapses_and_retags() {
        let options = SpinOptions::new(SpinType::Respin)
            .with_tags(vec![SpintaxTags::new("[", "/", "]")]);
        assert_eq!(spin_text("{a|b} {c}", &options, &mut rng(1)), "[a/b] ");
        assert_eq!(spin_text("{a|{b|c}}", &options, &mut rng(1)), "[a/[b/c]]");
    }

    #[test]
    fn test_respin_flattens_at_depth_limit() {
        let options = SpinOptions::new(SpinType::Respin).with_max_depth(1);
        let out = spin_text("{a|{b|c}}", &options, &mut rng(1));
        assert!(out.starts_with('{') && out.ends_with('}'));
        let inner = &out[1..out.len() - 1];
        let mut parts: Vec<&str> = inner.split('|').collect();
        parts.sort();
        assert_eq!(parts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_replacement_tags_and_signatures() {
        let mut tags = BTreeMap::new();
        tags.insert("name".to_string(), vec!["Ann".to_string(), "Bob".to_string()]);
        let options = SpinOptions::ordered(1)
            .with_replacement_tags(tags)
            .with_signatures(vec!["-- A".into(), "-- B".into()]);
        assert_eq!(spin_text("Hi #name#", &options, &mut rng(1)), "Hi Bob\n-- B");
    }

    #[test]
    fn test_events_report_offsets() {
        let mut events = Vec::new();
        let mut record = |event: &SpinEvent<'_>| {
            events.push((event.depth, event.source.to_string(), event.resolved.to_string(), event.start, event.source_start));
        };
        let mut hooks = SpinHooks {
            on_group: Some(&mut record),
            ..SpinHooks::default()
        };
        let out = spin_text_with("ab {x|{y|z}} c", &SpinOptions::ordered(1), &mut rng(1), &mut hooks);
        assert_eq!(out, "ab z c");
        assert_eq!(
            events,
            vec![
                (2, "{y|z}".to_string(), "z".to_string(), 3, 6),
                (1, "{x|{y|z}}".to_string(), "z".to_string(), 3, 3),
            ]
        );
    }

    #[test]
    fn test_cancelled_spin_returns_source() {
        let token = CancellationToken::new();
        token.cancel();
        let mut hooks = SpinHooks {
            cancel: Some(&token),
            ..SpinHooks::default()
        };
        let out = spin_text_with("{a|b}", &SpinOptions::ordered(0), &mut rng(1), &mut hooks);
        assert_eq!(out, "{a|b}");
    }
}
