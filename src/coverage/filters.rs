//! Composable method coverage filters.
//!
//! A filter takes the kept set of one class and splits it into the methods it
//! keeps and the methods it drops. Filters compose by folding: the kept set of
//! one is the input of the next, so a dropped method never comes back.
//!
//! The baseline filter (zero instructions, prefix synthetic names) always runs.
//! The mixin and case filters run only when enabled in a [`FilterConfig`].

use super::classifiers::{constructor_lines, is_case_helper, is_mixin_forwarder, is_prefix_synthetic};
use super::types::MethodCoverage;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Why a method was removed from a class's coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// No instructions at all: unreachable compiler artifact
    NoInstructions,
    /// Known synthetic name entirely before the class's real first line
    PrefixSynthetic,
    /// Shares its first line with a constructor
    MixinForwarder,
    /// Currying, tupling or default-argument helper
    CaseHelper,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::NoInstructions => "no instructions",
            DropReason::PrefixSynthetic => "synthetic name before real first line",
            DropReason::MixinForwarder => "mixin forwarder",
            DropReason::CaseHelper => "case class helper",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedMethod {
    pub method: MethodCoverage,
    pub reason: DropReason,
}

/// Result of running one filter over a kept set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub kept: Vec<MethodCoverage>,
    pub dropped: Vec<DroppedMethod>,
}

impl Partition {
    /// Split `methods` in order, dropping those for which `reason_for` answers.
    pub fn split<F>(methods: Vec<MethodCoverage>, mut reason_for: F) -> Self
    where
        F: FnMut(&MethodCoverage) -> Option<DropReason>,
    {
        methods
            .into_iter()
            .fold(Partition::default(), |mut partition, method| {
                match reason_for(&method) {
                    Some(reason) => partition.dropped.push(DroppedMethod { method, reason }),
                    None => partition.kept.push(method),
                }
                partition
            })
    }

    /// Run `filter` over the kept set, accumulating its drops.
    pub fn then(self, filter: &dyn MethodCoverageFilter) -> Self {
        let Partition { kept, mut dropped } = self;
        let next = filter.apply(kept);
        dropped.extend(next.dropped);
        Partition {
            kept: next.kept,
            dropped,
        }
    }
}

pub trait MethodCoverageFilter {
    fn apply(&self, methods: Vec<MethodCoverage>) -> Partition;
}

/// Unconditional sanitization applied to every class.
#[derive(Debug, Clone)]
pub struct BaselineFilter {
    real_first_line: i32,
    applies_name_rule: bool,
}

impl BaselineFilter {
    /// `applies_name_rule` is true when the class comes from a source file of
    /// the language whose compiler generates the synthetic names.
    pub fn new(real_first_line: i32, applies_name_rule: bool) -> Self {
        Self {
            real_first_line,
            applies_name_rule,
        }
    }
}

impl MethodCoverageFilter for BaselineFilter {
    fn apply(&self, methods: Vec<MethodCoverage>) -> Partition {
        Partition::split(methods, |method| {
            if method.instructions.total() == 0 {
                Some(DropReason::NoInstructions)
            } else if self.applies_name_rule && is_prefix_synthetic(method, self.real_first_line) {
                Some(DropReason::PrefixSynthetic)
            } else {
                None
            }
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MixinFilter;

impl MethodCoverageFilter for MixinFilter {
    fn apply(&self, methods: Vec<MethodCoverage>) -> Partition {
        let lines = constructor_lines(&methods);
        Partition::split(methods, |method| {
            is_mixin_forwarder(method, &lines).then_some(DropReason::MixinForwarder)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFilter;

impl MethodCoverageFilter for CaseFilter {
    fn apply(&self, methods: Vec<MethodCoverage>) -> Partition {
        Partition::split(methods, |method| {
            is_case_helper(method).then_some(DropReason::CaseHelper)
        })
    }
}

/// Filters a user can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FilterKind {
    #[serde(rename = "MIXIN")]
    Mixin,
    #[serde(rename = "CASE")]
    Case,
}

impl FilterKind {
    pub const ALL: [FilterKind; 2] = [FilterKind::Mixin, FilterKind::Case];

    /// Parse a configured identifier; `None` for identifiers we don't know.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier.trim() {
            "MIXIN" | "SCALAC.MIXIN" => Some(FilterKind::Mixin),
            "CASE" | "SCALAC.CASE" => Some(FilterKind::Case),
            _ => None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            FilterKind::Mixin => "MIXIN",
            FilterKind::Case => "CASE",
        }
    }

    fn filter(&self) -> &'static dyn MethodCoverageFilter {
        match self {
            FilterKind::Mixin => &MixinFilter,
            FilterKind::Case => &CaseFilter,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// The set of enabled optional filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    enabled: BTreeSet<FilterKind>,
}

impl FilterConfig {
    /// Nothing beyond baseline sanitization.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self::from_kinds(FilterKind::ALL)
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = FilterKind>) -> Self {
        Self {
            enabled: kinds.into_iter().collect(),
        }
    }

    /// Build from configured identifiers, ignoring unknown ones.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let enabled = identifiers
            .into_iter()
            .filter_map(|identifier| {
                let identifier = identifier.as_ref();
                let kind = FilterKind::from_identifier(identifier);
                if kind.is_none() {
                    tracing::debug!("Ignoring unknown filter identifier '{}'", identifier);
                }
                kind
            })
            .collect();
        Self { enabled }
    }

    pub fn is_enabled(&self, kind: FilterKind) -> bool {
        self.enabled.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = FilterKind> + '_ {
        self.enabled.iter().copied()
    }

    /// Run the enabled filters, in a fixed order, over an already kept set.
    pub fn apply(&self, partition: Partition) -> Partition {
        self.kinds()
            .fold(partition, |acc, kind| acc.then(kind.filter()))
    }
}

impl fmt::Display for FilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds().map(|k| k.identifier()).collect();
        f.write_str(&names.join(","))
    }
}
