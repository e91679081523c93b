//! Tag and pix lookups.
//!
//! Both declare a route called `list`; their namespaces keep them apart.

use crate::routing::{Pattern, RouteGroup};

pub fn tag_routes() -> RouteGroup {
    RouteGroup::new("v1/tags/")
        .namespace("tags")
        .pattern(Pattern::leaf("", "tags::list").named("list"))
        .pattern(Pattern::leaf("<slug:tag>/", "tags::detail").named("detail"))
}

pub fn pix_routes() -> RouteGroup {
    RouteGroup::new("v1/pix")
        .namespace("pix")
        .pattern(Pattern::leaf("", "pix::list").named("list"))
}
