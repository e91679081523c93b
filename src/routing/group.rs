//! Route groups and table flattening.
//!
//! # Responsibilities
//! - Hold a sub-domain's prefix, namespace, patterns and nested mounts
//! - Flatten a mount tree into ordered, compiled entries
//! - Apply feature gates while flattening
//!
//! # Design Decisions
//! - Depth-first order: a group's own patterns, then its children in order
//! - Prefixes concatenate exactly as written
//! - A group without a namespace inherits its parent's; nested ones join with `:`

use crate::routing::error::RoutingError;
use crate::routing::gate::{Condition, FeatureFlags, FeatureGate};
use crate::routing::pattern::{CompiledPattern, HandlerRef, Pattern, Template};

/// A prefixed bundle of patterns and nested mounts owned by one sub-domain.
#[derive(Debug, Clone, Default)]
pub struct RouteGroup {
    pub prefix: String,
    pub namespace: Option<String>,
    pub patterns: Vec<Pattern>,
    pub children: Vec<Mount>,
}

/// A child of a route group: always present, or behind a feature gate.
#[derive(Debug, Clone)]
pub enum Mount {
    Group(RouteGroup),
    Gated(FeatureGate),
}

impl From<RouteGroup> for Mount {
    fn from(group: RouteGroup) -> Self {
        Mount::Group(group)
    }
}

impl From<FeatureGate> for Mount {
    fn from(gate: FeatureGate) -> Self {
        Mount::Gated(gate)
    }
}

impl Mount {
    /// The group this mount contributes under `flags`, if any.
    pub fn resolve(&self, flags: &FeatureFlags) -> Option<&RouteGroup> {
        match self {
            Mount::Group(group) => Some(group),
            Mount::Gated(gate) => {
                let included = gate.apply(flags);
                if included.is_none() {
                    tracing::debug!(
                        prefix = %gate.wrapped.prefix,
                        condition = %gate.condition,
                        "Feature gate closed, group excluded"
                    );
                }
                included
            }
        }
    }
}

/// One compiled row of the flattened table.
#[derive(Debug, Clone)]
pub struct FlatEntry {
    pub pattern: CompiledPattern,
    pub name: Option<String>,
    pub target: HandlerRef,
}

/// Result of flattening a set of mounts.
#[derive(Debug, Default)]
pub struct Flattened {
    pub entries: Vec<FlatEntry>,
    /// Groups dropped by closed gates (their descendants are not counted).
    pub excluded_groups: usize,
}

impl RouteGroup {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn mount(mut self, child: impl Into<Mount>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Mount `child` only when `condition` holds at build time.
    pub fn gated(self, condition: Condition, child: RouteGroup) -> Self {
        self.mount(FeatureGate::new(condition, child))
    }

    /// Flatten this group beneath an inherited prefix and namespace.
    pub fn flatten(
        &self,
        prefix: &Template,
        namespace: Option<&str>,
        flags: &FeatureFlags,
        out: &mut Flattened,
    ) -> Result<(), RoutingError> {
        let own_prefix = Template::parse(&self.prefix)?;
        let prefix = prefix.join(&own_prefix)?;
        let namespace = match (namespace, self.namespace.as_deref()) {
            (Some(outer), Some(inner)) => Some(format!("{}:{}", outer, inner)),
            (None, Some(inner)) => Some(inner.to_string()),
            (outer, None) => outer.map(str::to_string),
        };

        for pattern in &self.patterns {
            let compiled = pattern.compile(&prefix)?;
            let name = pattern.name.as_deref().map(|name| match &namespace {
                Some(ns) => format!("{}:{}", ns, name),
                None => name.to_string(),
            });
            out.entries.push(FlatEntry {
                pattern: compiled,
                name,
                target: pattern.target.clone(),
            });
        }

        flatten_mounts(&self.children, &prefix, namespace.as_deref(), flags, out)
    }
}

/// Flatten an ordered list of mounts, skipping closed gates.
pub fn flatten_mounts(
    mounts: &[Mount],
    prefix: &Template,
    namespace: Option<&str>,
    flags: &FeatureFlags,
    out: &mut Flattened,
) -> Result<(), RoutingError> {
    for mount in mounts {
        match mount.resolve(flags) {
            Some(group) => group.flatten(prefix, namespace, flags, out)?,
            None => out.excluded_groups += 1,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(mounts: &[Mount], flags: &FeatureFlags) -> Flattened {
        let mut out = Flattened::default();
        flatten_mounts(mounts, &Template::default(), None, flags, &mut out).unwrap();
        out
    }

    fn names(out: &Flattened) -> Vec<Option<String>> {
        out.entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_prefixes_and_namespaces_concatenate() {
        let api = RouteGroup::new("v1/")
            .namespace("api")
            .mount(
                RouteGroup::new("projects/")
                    .namespace("projects")
                    .pattern(Pattern::leaf("", "projects::list").named("list")),
            )
            .mount(RouteGroup::new("health/").pattern(Pattern::leaf("", "health").named("health")));

        let out = flatten(&[api.into()], &FeatureFlags::new());
        assert_eq!(
            names(&out),
            vec![Some("api:projects:list".to_string()), Some("api:health".to_string())]
        );
        assert_eq!(out.entries[0].pattern.template().source(), "v1/projects/");
        assert_eq!(out.entries[1].pattern.template().source(), "v1/health/");
    }

    #[test]
    fn test_depth_first_order() {
        let root = RouteGroup::new("")
            .pattern(Pattern::leaf("a", "a").named("a"))
            .mount(
                RouteGroup::new("b/")
                    .pattern(Pattern::leaf("1", "b1").named("b1"))
                    .mount(RouteGroup::new("c/").pattern(Pattern::leaf("", "c").named("c"))),
            )
            .mount(RouteGroup::new("d/").pattern(Pattern::leaf("", "d").named("d")))
            .pattern(Pattern::leaf("e", "e").named("e"));

        let out = flatten(&[root.into()], &FeatureFlags::new());
        let order: Vec<_> = out.entries.iter().map(|e| e.target.as_str().to_string()).collect();
        assert_eq!(order, vec!["a", "e", "b1", "c", "d"]);
    }

    #[test]
    fn test_closed_gate_contributes_nothing() {
        let root = RouteGroup::new("")
            .gated(
                Condition::flag("admin"),
                RouteGroup::new("admin/")
                    .namespace("admin")
                    .pattern(Pattern::mount("", "admin::site").named("index"))
                    .mount(RouteGroup::new("nested/").pattern(Pattern::leaf("", "n").named("n"))),
            )
            .pattern(Pattern::leaf("health/", "health").named("health"));

        let off = flatten(&[root.clone().into()], &FeatureFlags::new());
        assert_eq!(names(&off), vec![Some("health".to_string())]);
        assert_eq!(off.excluded_groups, 1);

        let on = flatten(&[root.into()], &FeatureFlags::new().with("admin", true));
        assert_eq!(on.entries.len(), 3);
        assert_eq!(on.excluded_groups, 0);
    }

    #[test]
    fn test_unnamed_patterns_have_no_name() {
        let group = RouteGroup::new("x/").namespace("x").pattern(Pattern::leaf("", "x"));
        let out = flatten(&[group.into()], &FeatureFlags::new());
        assert_eq!(names(&out), vec![None]);
    }

    #[test]
    fn test_bad_prefix_is_reported() {
        let group = RouteGroup::new("v1/<float:x>/").pattern(Pattern::leaf("", "x"));
        let mut out = Flattened::default();
        let err = flatten_mounts(&[group.into()], &Template::default(), None, &FeatureFlags::new(), &mut out)
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidPattern { .. }));
    }
}
