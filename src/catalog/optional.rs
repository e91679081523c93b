//! Optional subsystems mounted only in some deployments.
//!
//! These are plain route groups; `catalog::root_mounts` decides which flag
//! guards each one.

use crate::routing::{Condition, Pattern, RouteGroup};

/// Admin console, served entirely by the mounted site.
pub fn admin_console() -> RouteGroup {
    RouteGroup::new("admin/")
        .namespace("admin")
        .pattern(Pattern::mount("", "admin::site").named("index"))
}

/// Schema download, interactive browser and static assets.
///
/// The browser itself sits behind its own flag inside the group.
pub fn schema_and_static() -> RouteGroup {
    RouteGroup::new("")
        .pattern(Pattern::leaf("schema.<json|yaml:format>", "schema::document").named("schema"))
        .pattern(Pattern::mount("static/", "static::serve").named("static"))
        .gated(
            Condition::flag(super::SCHEMA_BROWSER),
            RouteGroup::new("docs/").pattern(Pattern::leaf("", "schema::swagger_ui").named("swagger-ui")),
        )
}

/// Background job dashboard.
pub fn jobs_dashboard() -> RouteGroup {
    RouteGroup::new("jobs/")
        .namespace("jobs")
        .pattern(Pattern::mount("", "jobs::dashboard").named("home"))
}
