// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Markup trees and tolerant comparison for font rendering tests.
//!
//! Rendering engines print SVG whose coordinates may legitimately differ by a
//! rounding step from the hand-curated expectation. This crate parses both
//! sides into [`MarkupTree`]s and compares them structurally, treating path
//! data and a few geometry attributes numerically within a tolerance.

pub mod compare;
pub mod path;
mod tree;

pub use compare::{is_similar, is_similar_path, TOLERANT_ATTRIBUTES};
pub use path::{tokenize, PathParseError, PathToken, PathTokens};
pub use tree::{
    qualified_name, Attribute, MarkupError, MarkupTree, Node, FONTTEST_NS, SVG_NS, XHTML_NS,
    XLINK_NS,
};
