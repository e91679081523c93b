//! Route lookup and reverse routing.
//!
//! # Responsibilities
//! - Compile the mount tree into an ordered, immutable table
//! - Reject ambiguous tables (duplicate fully qualified names)
//! - Look up the first entry matching a path
//! - Produce URLs from a route name and parameters
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins, in declaration order
//! - A `RegexSet` narrows candidates in one pass; the lowest index wins
//! - Explicit NotFound rather than silent default

use std::collections::{BTreeMap, HashMap};

use regex::RegexSet;

use crate::routing::error::RoutingError;
use crate::routing::gate::FeatureFlags;
use crate::routing::group::{flatten_mounts, Flattened, Mount};
use crate::routing::pattern::{CompiledPattern, HandlerRef, PatternKind, Template};

/// Convenience for reversing routes without placeholders.
pub const NO_PARAMS: [(&str, &str); 0] = [];

/// One row of the active table.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: CompiledPattern,
    name: Option<String>,
    target: HandlerRef,
}

impl RouteEntry {
    /// Fully qualified name, if the pattern was named.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn target(&self) -> &HandlerRef {
        &self.target
    }

    /// Full template from the root of the table.
    pub fn template(&self) -> &Template {
        self.pattern.template()
    }

    pub fn kind(&self) -> PatternKind {
        self.pattern.kind()
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: BTreeMap<String, String>,
    /// Unconsumed tail of the path for prefix mounts.
    pub remainder: Option<String>,
}

impl RouteMatch<'_> {
    pub fn name(&self) -> Option<&str> {
        self.entry.name()
    }

    pub fn target(&self) -> &HandlerRef {
        self.entry.target()
    }
}

/// The compiled, read-only route table.
#[derive(Debug, Clone)]
pub struct Router {
    entries: Vec<RouteEntry>,
    by_name: HashMap<String, usize>,
    candidates: RegexSet,
    excluded_groups: usize,
}

impl Router {
    /// Build the table from root mounts, evaluating every gate once.
    pub fn build(mounts: &[Mount], flags: &FeatureFlags) -> Result<Self, RoutingError> {
        let mut flat = Flattened::default();
        flatten_mounts(mounts, &Template::default(), None, flags, &mut flat)?;

        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut entries = Vec::with_capacity(flat.entries.len());
        for (index, row) in flat.entries.into_iter().enumerate() {
            if let Some(name) = &row.name {
                if let Some(&first) = by_name.get(name) {
                    let first: &RouteEntry = &entries[first];
                    return Err(RoutingError::DuplicateRouteName {
                        name: name.clone(),
                        first: first.template().source().to_string(),
                        second: row.pattern.template().source().to_string(),
                    });
                }
                by_name.insert(name.clone(), index);
            }
            entries.push(RouteEntry {
                pattern: row.pattern,
                name: row.name,
                target: row.target,
            });
        }

        let candidates = RegexSet::new(entries.iter().map(|e| e.pattern.regex_source()))
            .map_err(|e| RoutingError::invalid_pattern("<route table>", e.to_string()))?;

        tracing::info!(
            entries = entries.len(),
            named = by_name.len(),
            excluded_groups = flat.excluded_groups,
            "Route table built"
        );

        Ok(Self {
            entries,
            by_name,
            candidates,
            excluded_groups: flat.excluded_groups,
        })
    }

    /// Find the first entry, in declaration order, that accepts `path`.
    ///
    /// `path` is the raw request path without its leading `/`.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch<'_>, RoutingError> {
        for index in self.candidates.matches(path).iter() {
            let entry = &self.entries[index];
            if let Some(found) = entry.pattern.match_path(path) {
                return Ok(RouteMatch {
                    entry,
                    params: found.params,
                    remainder: found.remainder,
                });
            }
        }
        Err(RoutingError::NotFound {
            path: path.to_string(),
        })
    }

    /// Build the URL of a named route.
    ///
    /// Parameters the template does not mention are ignored.
    pub fn reverse<K, V>(
        &self,
        name: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<String, RoutingError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entry = self.get(name).ok_or_else(|| RoutingError::UnknownRouteName {
            name: name.to_string(),
        })?;
        let params: HashMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        entry
            .template()
            .render(name, |param| params.get(param).cloned())
    }

    /// Entry by fully qualified name.
    pub fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// All active entries in match order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of groups left out by closed feature gates.
    pub fn excluded_groups(&self) -> usize {
        self.excluded_groups
    }
}
