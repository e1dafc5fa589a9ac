//! Resolution of one spintax document into several versions

use crate::domain::rng::new_rng;
use crate::domain::spintax::{spin_text, SpinOptions, SpinType};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn resolve_one(spintax: &str, seed: u64, exclude_original: bool) -> String {
    let options = SpinOptions::new(SpinType::Random)
        .with_exclude_original(exclude_original)
        .with_remove_special_tags(true);
    let mut rng = new_rng(Some(seed));
    spin_text(spintax, &options, &mut rng)
}

/// Resolve `spintax` once per seed, in seed order
#[cfg(feature = "parallel")]
pub(crate) fn resolve_versions(spintax: &str, seeds: &[u64], exclude_original: bool) -> Vec<String> {
    seeds
        .par_iter()
        .map(|&seed| resolve_one(spintax, seed, exclude_original))
        .collect()
}

/// Resolve `spintax` once per seed, in seed order
#[cfg(not(feature = "parallel"))]
pub(crate) fn resolve_versions(spintax: &str, seeds: &[u64], exclude_original: bool) -> Vec<String> {
    seeds
        .iter()
        .map(|&seed| resolve_one(spintax, seed, exclude_original))
        .collect()
}

/// Concatenate versions, each under a `===== Version k =====` header
pub(crate) fn join_versions(versions: &[String]) -> String {
    versions
        .iter()
        .enumerate()
        .map(|(k, version)| format!("\n===== Version {} =====\n{version}", k + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_follow_seeds() {
        let spintax = "{a|b|c} ##{x|y}##";
        let first = resolve_versions(spintax, &[1, 2, 3], false);
        let second = resolve_versions(spintax, &[1, 2, 3], false);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        for version in &first {
            assert!(!version.contains("##"), "{version}");
            assert!(!version.contains('|'), "{version}");
        }
    }

    #[test]
    fn test_versions_can_exclude_original() {
        for version in resolve_versions("{a|b}", &[1, 2, 3, 4], true) {
            assert_eq!(version, "b");
        }
    }

    #[test]
    fn test_join_versions() {
        let joined = join_versions(&["one".to_string(), "two".to_string()]);
        assert_eq!(joined, "\n===== Version 1 =====\none\n===== Version 2 =====\ntwo");
        assert!(join_versions(&[]).is_empty());
    }
}
