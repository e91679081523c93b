//! Project management routes.

use crate::routing::{Pattern, RouteGroup};

pub fn routes() -> RouteGroup {
    RouteGroup::new("v1/projects/")
        .namespace("projects")
        .pattern(Pattern::leaf("", "projects::list").named("list"))
        .pattern(Pattern::leaf("<uuid:uuid>/", "projects::detail").named("detail"))
        .pattern(Pattern::leaf("<uuid:uuid>/members/", "projects::members").named("members"))
        .pattern(
            Pattern::leaf("<uuid:uuid>/export.<json|yaml:format>", "projects::export").named("export"),
        )
}
