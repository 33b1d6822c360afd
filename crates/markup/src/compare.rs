// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tolerant structural comparison of markup trees.
//!
//! The first tree is the expectation and decides which attributes matter:
//! attributes present only on the second tree are not checked.

use crate::path::{tokenize, PathParseError};
use crate::tree::MarkupTree;

/// Attributes whose values are compared token by token with a numeric tolerance.
pub const TOLERANT_ATTRIBUTES: &[&str] = &["d", "viewBox", "x", "y"];

/// Whether `observed` matches `expected` within `max_delta`.
///
/// Either side may be absent, which is how unequal child counts surface;
/// exactly one absent side is a mismatch.
pub fn is_similar(
    expected: Option<&MarkupTree>,
    observed: Option<&MarkupTree>,
    max_delta: f64,
) -> Result<bool, PathParseError> {
    let (a, b) = match (expected, observed) {
        (None, None) => return Ok(true),
        (Some(a), Some(b)) => (a, b),
        _ => return Ok(false),
    };
    if a.tag != b.tag {
        return Ok(false);
    }

    for attr in &a.attributes {
        let other = b.attribute(&attr.name);
        if TOLERANT_ATTRIBUTES.contains(&attr.name.as_str()) {
            let Some(other) = other else {
                return Ok(false);
            };
            if !is_similar_path(&attr.value, other, max_delta)? {
                return Ok(false);
            }
        } else if other != Some(attr.value.as_str()) {
            return Ok(false);
        }
    }

    let mut left = a.elements();
    let mut right = b.elements();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ok(true),
            (child_a, child_b) => {
                if !is_similar(child_a, child_b, max_delta)? {
                    return Ok(false);
                }
            }
        }
    }
}

/// Whether two path data strings agree token by token within `max_delta`.
///
/// Token counts must match. Numbers agree when their difference is at most
/// `max_delta`; commands and unparsable numbers must be textually equal.
pub fn is_similar_path(a: &str, b: &str, max_delta: f64) -> Result<bool, PathParseError> {
    let mut left = tokenize(a);
    let mut right = tokenize(b);
    loop {
        match (left.next().transpose()?, right.next().transpose()?) {
            (None, None) => return Ok(true),
            (Some(x), Some(y)) => {
                if !x.is_similar(&y, max_delta) {
                    return Ok(false);
                }
            }
            _ => return Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
