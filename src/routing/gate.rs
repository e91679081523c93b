//! Build-time feature gates.
//!
//! A gate decides whether a route group is part of the table at all. It is
//! evaluated once while the router is built and never consulted again, so a
//! closed gate is indistinguishable from a group that was never declared.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::group::RouteGroup;

/// Named boolean switches read from configuration.
///
/// A flag missing from the map is off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Condition over feature flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Flag(String),
    Any(Vec<Condition>),
    All(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn flag(name: impl Into<String>) -> Self {
        Condition::Flag(name.into())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Any(conditions.into_iter().collect())
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::All(conditions.into_iter().collect())
    }

    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// Evaluate against a flag set. `any([])` is false, `all([])` is true.
    pub fn evaluate(&self, flags: &FeatureFlags) -> bool {
        match self {
            Condition::Flag(name) => flags.is_enabled(name),
            Condition::Any(conditions) => conditions.iter().any(|c| c.evaluate(flags)),
            Condition::All(conditions) => conditions.iter().all(|c| c.evaluate(flags)),
            Condition::Not(condition) => !condition.evaluate(flags),
        }
    }

    /// Every flag name the condition reads.
    pub fn flag_names(&self) -> Vec<&str> {
        match self {
            Condition::Flag(name) => vec![name.as_str()],
            Condition::Any(conditions) | Condition::All(conditions) => {
                conditions.iter().flat_map(|c| c.flag_names()).collect()
            }
            Condition::Not(condition) => condition.flag_names(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Flag(name) => write!(f, "{}", name),
            Condition::Any(items) => write_list(f, "any", items),
            Condition::All(items) => write_list(f, "all", items),
            Condition::Not(c) => write!(f, "not({})", c),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, op: &str, items: &[Condition]) -> fmt::Result {
    write!(f, "{}(", op)?;
    for (i, c) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

/// A route group included only when its condition holds.
#[derive(Debug, Clone)]
pub struct FeatureGate {
    pub condition: Condition,
    pub wrapped: RouteGroup,
}

impl FeatureGate {
    pub fn new(condition: Condition, wrapped: RouteGroup) -> Self {
        Self { condition, wrapped }
    }

    /// The wrapped group if the gate is open, nothing otherwise.
    pub fn apply(&self, flags: &FeatureFlags) -> Option<&RouteGroup> {
        self.condition.evaluate(flags).then_some(&self.wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flag_is_off() {
        let flags = FeatureFlags::new().with("admin", true);
        assert!(flags.is_enabled("admin"));
        assert!(!flags.is_enabled("jobs_dashboard"));
    }

    #[test]
    fn test_composite_conditions() {
        let flags = FeatureFlags::new().with("admin", false).with("schema_browser", true);
        let either = Condition::any([Condition::flag("admin"), Condition::flag("schema_browser")]);
        let both = Condition::all([Condition::flag("admin"), Condition::flag("schema_browser")]);
        assert!(either.evaluate(&flags));
        assert!(!both.evaluate(&flags));
        assert!(Condition::negate(Condition::flag("admin")).evaluate(&flags));
        assert!(!Condition::any([]).evaluate(&flags));
        assert!(Condition::all([]).evaluate(&flags));
        assert_eq!(either.to_string(), "any(admin, schema_browser)");
        assert_eq!(either.flag_names(), vec!["admin", "schema_browser"]);
    }

    #[test]
    fn test_apply() {
        let gate = FeatureGate::new(Condition::flag("admin"), RouteGroup::new("admin/"));
        assert!(gate.apply(&FeatureFlags::new()).is_none());
        let flags = FeatureFlags::new().with("admin", true);
        assert_eq!(gate.apply(&flags).map(|g| g.prefix.as_str()), Some("admin/"));
    }

    #[test]
    fn test_flags_deserialize_from_toml_table() {
        let flags: FeatureFlags = toml::from_str("admin = true\njobs_dashboard = false\n").unwrap();
        assert!(flags.is_enabled("admin"));
        assert_eq!(flags.len(), 2);
    }
}
