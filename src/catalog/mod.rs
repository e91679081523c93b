//! Route catalog: the sub-domains this deployment mounts.
//!
//! # Data Flow
//! ```text
//! auth.rs / membership.rs / messaging.rs / projects.rs / tags.rs
//!     → routes() -> RouteGroup (pure declarations, no side effects)
//! optional.rs
//!     → admin console, schema + static, jobs dashboard
//! root_mounts()
//!     → ordered Mount list, optional groups behind FeatureGates
//!     → handed to Router::build together with the configured flags
//! ```
//!
//! # Design Decisions
//! - Sub-domains never call into the router; it reads their groups once
//! - Order here is match order
//! - Flag names live here so config validation can warn on unknown ones

pub mod auth;
pub mod membership;
pub mod messaging;
pub mod optional;
pub mod projects;
pub mod tags;

use crate::routing::{Condition, FeatureGate, Mount, Pattern, RouteGroup};

pub const ADMIN: &str = "admin";
pub const SCHEMA_BROWSER: &str = "schema_browser";
pub const JOBS_DASHBOARD: &str = "jobs_dashboard";

/// Every flag the catalog reads.
pub const KNOWN_FLAGS: &[&str] = &[ADMIN, SCHEMA_BROWSER, JOBS_DASHBOARD];

fn health() -> RouteGroup {
    RouteGroup::new("health/").pattern(Pattern::leaf("", "health::check").named("health"))
}

/// The root mount list, in match order.
pub fn root_mounts() -> Vec<Mount> {
    vec![
        FeatureGate::new(Condition::flag(ADMIN), optional::admin_console()).into(),
        auth::routes().into(),
        membership::routes().into(),
        messaging::routes().into(),
        projects::routes().into(),
        tags::tag_routes().into(),
        tags::pix_routes().into(),
        health().into(),
        FeatureGate::new(
            Condition::any([Condition::flag(ADMIN), Condition::flag(SCHEMA_BROWSER)]),
            optional::schema_and_static(),
        )
        .into(),
        FeatureGate::new(Condition::flag(JOBS_DASHBOARD), optional::jobs_dashboard()).into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{FeatureFlags, Router, RoutingError, NO_PARAMS};

    fn all_on() -> FeatureFlags {
        KNOWN_FLAGS.iter().map(|f| (*f, true)).collect()
    }

    #[test]
    fn test_catalog_builds_with_any_flag_combination() {
        for mask in 0..(1u32 << KNOWN_FLAGS.len()) {
            let flags: FeatureFlags = KNOWN_FLAGS
                .iter()
                .enumerate()
                .map(|(i, f)| (*f, mask & (1 << i) != 0))
                .collect();
            let router = Router::build(&root_mounts(), &flags);
            assert!(router.is_ok(), "flags {:?} failed: {:?}", flags, router.err());
        }
    }

    fn gate_flags(mounts: &[Mount], out: &mut Vec<String>) {
        for mount in mounts {
            match mount {
                Mount::Group(group) => gate_flags(&group.children, out),
                Mount::Gated(gate) => {
                    out.extend(gate.condition.flag_names().into_iter().map(str::to_string));
                    gate_flags(&gate.wrapped.children, out);
                }
            }
        }
    }

    #[test]
    fn test_known_flags_cover_every_gate() {
        let mut read = Vec::new();
        gate_flags(&root_mounts(), &mut read);
        assert!(!read.is_empty());
        for flag in &read {
            assert!(KNOWN_FLAGS.contains(&flag.as_str()), "{} missing from KNOWN_FLAGS", flag);
        }
        for flag in KNOWN_FLAGS {
            assert!(read.iter().any(|r| r == flag), "{} is never read", flag);
        }
    }

    #[test]
    fn test_auth_routes() {
        let router = Router::build(&root_mounts(), &FeatureFlags::new()).unwrap();
        assert_eq!(router.reverse("auth:login", NO_PARAMS).unwrap(), "v1/auth/login");

        let uuid = "3f2b8c1e-4d5a-4b6c-9d7e-8f9a0b1c2d3e";
        let url = router.reverse("auth:login_as", [("uuid", uuid)]).unwrap();
        assert_eq!(url, format!("v1/auth/login/{}", uuid));
        let m = router.resolve(&url).unwrap();
        assert_eq!(m.target().as_str(), "auth::token_obtain_pair_from_token");
    }

    #[test]
    fn test_tags_and_pix_share_a_short_name() {
        let router = Router::build(&root_mounts(), &FeatureFlags::new()).unwrap();
        assert_eq!(router.reverse("tags:list", NO_PARAMS).unwrap(), "v1/tags/");
        assert_eq!(router.reverse("pix:list", NO_PARAMS).unwrap(), "v1/pix");
    }

    #[test]
    fn test_optional_groups_follow_flags() {
        let base = Router::build(&root_mounts(), &FeatureFlags::new()).unwrap();
        assert!(matches!(base.resolve("admin/users/"), Err(RoutingError::NotFound { .. })));
        assert!(matches!(base.resolve("schema.json"), Err(RoutingError::NotFound { .. })));
        assert!(matches!(
            base.reverse("jobs:home", NO_PARAMS),
            Err(RoutingError::UnknownRouteName { .. })
        ));
        assert_eq!(base.excluded_groups(), 3);

        let browser_only = FeatureFlags::new().with(SCHEMA_BROWSER, true);
        let router = Router::build(&root_mounts(), &browser_only).unwrap();
        assert_eq!(router.resolve("schema.yaml").unwrap().name(), Some("schema"));
        assert_eq!(router.resolve("docs/").unwrap().name(), Some("swagger-ui"));
        assert!(router.resolve("admin/").is_err());

        let admin_only = FeatureFlags::new().with(ADMIN, true);
        let router = Router::build(&root_mounts(), &admin_only).unwrap();
        assert_eq!(router.resolve("static/css/site.css").unwrap().name(), Some("static"));
        assert!(router.resolve("docs/").is_err());
        let admin = router.resolve("admin/auth/user/").unwrap();
        assert_eq!(admin.name(), Some("admin:index"));
        assert_eq!(admin.remainder.as_deref(), Some("auth/user/"));

        let everything = Router::build(&root_mounts(), &all_on()).unwrap();
        assert_eq!(everything.excluded_groups(), 0);
        assert!(everything.len() > base.len());
    }
}
