//! Randomised natural-language lists
//!
//! Backs the `!{separator:last separator:min:max|value|value}` control group.

use rand::Rng;

/// Normalise a list separator
///
/// Empty becomes a single space, the two-character token `\n` becomes a line
/// break, a trailing space is appended when missing and a leading space is
/// prepended unless the separator starts with whitespace or a comma.
fn normalize_separator(separator: &str) -> String {
    let mut separator = if separator.is_empty() {
        " ".to_string()
    } else if separator.eq_ignore_ascii_case("\\n") {
        "\n".to_string()
    } else if separator.ends_with(char::is_whitespace) {
        separator.to_string()
    } else {
        format!("{separator} ")
    };

    if !separator.starts_with(char::is_whitespace) && !separator.starts_with(',') {
        separator.insert(0, ' ');
    }
    separator
}

fn normalize_last_separator(last: Option<&str>, separator: &str) -> String {
    match last {
        None | Some("") => separator.to_string(),
        Some(last) => {
            let mut last = if last.ends_with(char::is_whitespace) {
                last.to_string()
            } else {
                format!("{last} ")
            };
            if !last.starts_with(char::is_whitespace) && !last.starts_with(',') {
                last.insert(0, ' ');
            }
            last
        }
    }
}

/// Pick the order of list entries; returns indexes into `len` values
pub(crate) fn reorder_indices<R: Rng + ?Sized>(len: usize, min: i32, max: i32, rng: &mut R) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }

    let min = if min < 1 { len } else { min as usize };
    let max = if max < 1 { len } else { max as usize };
    let max = max.max(min);
    let mut remaining = rng.random_range(min..=max);

    let mut pool: Vec<usize> = (0..len).collect();
    let mut order = Vec::with_capacity(remaining.min(len));
    while !pool.is_empty() && remaining > 0 {
        let pick = rng.random_range(0..pool.len());
        order.push(pool.remove(pick));
        remaining -= 1;
    }
    order
}

/// Join a random selection of `values` into a list
///
/// `min`/`max` below one mean "all values". The last separator is used before
/// the final emitted value.
pub fn reorder_spin<S, R>(
    values: &[S],
    separator: Option<&str>,
    last_separator: Option<&str>,
    min: i32,
    max: i32,
    rng: &mut R,
) -> String
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let separator = normalize_separator(separator.unwrap_or(""));
    let last_separator = normalize_last_separator(last_separator, &separator);

    let order = reorder_indices(values.len(), min, max, rng);
    let mut out = String::new();
    for (n, &index) in order.iter().enumerate() {
        if n > 0 {
            if n + 1 == order.len() {
                out.push_str(&last_separator);
            } else {
                out.push_str(&separator);
            }
        }
        out.push_str(values[index].as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_separator_normalization() {
        assert_eq!(normalize_separator(""), " ");
        assert_eq!(normalize_separator(","), ", ");
        assert_eq!(normalize_separator("and"), " and ");
        assert_eq!(normalize_separator(" or "), " or ");
        assert_eq!(normalize_separator("\\n"), "\n");
        assert_eq!(normalize_last_separator(None, ", "), ", ");
        assert_eq!(normalize_last_separator(Some("and"), ", "), " and ");
    }

    #[test]
    fn test_reorder_all_values() {
        let values = ["red", "blue", "green"];
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = reorder_spin(&values, Some(","), Some(" and "), 3, 3, &mut rng);
            for value in values {
                assert!(out.contains(value), "{out}");
            }
            assert_eq!(out.matches(", ").count(), 1, "{out}");
            assert_eq!(out.matches(" and ").count(), 1, "{out}");
            let (head, tail) = out.split_once(" and ").unwrap();
            assert!(head.contains(", "));
            assert!(!tail.contains(','));
        }
    }

    #[test]
    fn test_reorder_respects_bounds() {
        let values = ["a", "b", "c", "d"];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let out = reorder_spin(&values, None, None, 1, 2, &mut rng);
            let count = out.split(' ').count();
            assert!((1..=2).contains(&count), "{out}");
        }
    }

    #[test]
    fn test_reorder_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let values: [&str; 0] = [];
        assert_eq!(reorder_spin(&values, None, None, -1, -1, &mut rng), "");
    }
}
