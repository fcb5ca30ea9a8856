//! Predicates recognizing compiler-synthesized method shapes.
//!
//! All functions in this module are pure: they look at a record (or a set of
//! records for class-scoped rules) and answer yes or no. Matching is on the
//! textual method signature only, never on bytecode shape.

use super::types::MethodCoverage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Method names the Scala compiler generates for case classes and value classes.
///
/// Membership alone does not drop a method; see [`is_prefix_synthetic`].
pub const SYNTHETIC_METHOD_NAMES: &[&str] = &[
    "apply",
    "canEqual",
    "copy",
    "equals",
    "hashCode",
    "productArity",
    "productPrefix",
    "productElement",
    "productIterator",
    "productElementName",
    "productElementNames",
    "toString",
    "unapply",
    "writeReplace",
];

static SYNTHETIC_NAME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| SYNTHETIC_METHOD_NAMES.iter().copied().collect());

// Default-argument accessor, e.g. `copy$default$2()I`. Word characters are ASCII only.
static DEFAULT_ARGUMENT_ACCESSOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_$]+\$default\$[0-9]+\(\).*$").unwrap());

const CURRIED_PREFIX: &str = "curried()";
const TUPLED_PREFIX: &str = "tupled()";

pub fn is_constructor(method: &MethodCoverage) -> bool {
    method.is_constructor()
}

pub fn is_synthetic_name(name: &str) -> bool {
    SYNTHETIC_NAME_SET.contains(name)
}

/// Source lines on which the given methods' constructors start.
pub fn constructor_lines<'a, I>(methods: I) -> HashSet<i32>
where
    I: IntoIterator<Item = &'a MethodCoverage>,
{
    methods
        .into_iter()
        .filter(|m| is_constructor(m))
        .map(|m| m.first_line)
        .collect()
}

/// A non-constructor starting on a constructor's line is a trait forwarder.
pub fn is_mixin_forwarder(method: &MethodCoverage, constructor_lines: &HashSet<i32>) -> bool {
    !is_constructor(method) && constructor_lines.contains(&method.first_line)
}

/// Currying, tupling and default-argument helpers.
///
/// The joined `name + desc` text is checked first. The descriptor on its own is
/// checked as well, which covers analyzers that already fold the helper name
/// into the descriptor field; a real JVM descriptor starts with `(` and can
/// never match on its own.
pub fn is_case_helper(method: &MethodCoverage) -> bool {
    is_case_helper_signature(&method.signature_text()) || is_case_helper_signature(&method.desc)
}

pub fn is_case_helper_signature(signature: &str) -> bool {
    signature.starts_with(CURRIED_PREFIX)
        || signature.starts_with(TUPLED_PREFIX)
        || DEFAULT_ARGUMENT_ACCESSOR.is_match(signature)
}

/// A known synthetic name whose whole line range sits at or before the class's
/// real first line.
///
/// A user override of e.g. `toString` has its own later line range and fails
/// the check. The heuristic is line-table driven and can misjudge a one-line
/// override written on the class's first line.
pub fn is_prefix_synthetic(method: &MethodCoverage, real_first_line: i32) -> bool {
    is_synthetic_name(&method.name)
        && method.first_line <= real_first_line
        && method.last_line <= real_first_line
}
