//! Bucket-choice heuristic: inbound mail buckets usually carry "ses" in
//! their name.

const MARKER: &str = "ses";

fn is_candidate(name: &str) -> bool {
    name.to_lowercase().contains(MARKER)
}

/// The single matching bucket, if there is exactly one.
pub fn auto_select(names: &[String]) -> Option<&str> {
    let mut matching = names.iter().filter(|n| is_candidate(n));
    match (matching.next(), matching.next()) {
        (Some(only), None) => Some(only.as_str()),
        _ => None,
    }
}

/// Matching names first, then the rest; each group alphabetical.
pub fn order_buckets(mut names: Vec<String>) -> Vec<String> {
    names.sort_by(|a, b| {
        is_candidate(b)
            .cmp(&is_candidate(a))
            .then_with(|| a.cmp(b))
    });
    names
}
