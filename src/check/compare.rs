//! Dotted-numeric version ordering

use std::cmp::Ordering;

use crate::check::error::CompareError;

/// Orders two dotted-numeric version identifiers.
///
/// A single leading `prefix` token is stripped from each input if present
/// ("v1.2.3" with prefix "v" reads as "1.2.3"). The remainder is split on '.'
/// and compared component-by-component as non-negative integers, left to
/// right; a shorter sequence is padded with trailing zeros, so "1.2" and
/// "1.2.0" are equal.
///
/// A component that does not parse as a non-negative integer is an error;
/// falling back to lexical comparison would silently misorder versions.
pub fn compare_versions(a: &str, b: &str, prefix: &str) -> Result<Ordering, CompareError> {
    let left = parse_components(a, prefix)?;
    let right = parse_components(b, prefix)?;

    for i in 0..left.len().max(right.len()) {
        let x = left.get(i).copied().unwrap_or(0);
        let y = right.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            decided => return Ok(decided),
        }
    }

    Ok(Ordering::Equal)
}

fn parse_components(version: &str, prefix: &str) -> Result<Vec<u64>, CompareError> {
    let stripped = if prefix.is_empty() {
        version
    } else {
        version.strip_prefix(prefix).unwrap_or(version)
    };

    stripped
        .split('.')
        .map(|component| {
            component
                .parse::<u64>()
                .map_err(|_| CompareError::MalformedComponent {
                    version: version.to_string(),
                    component: component.to_string(),
                })
        })
        .collect()
}
