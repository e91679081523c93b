//! Membership and billing routes.

use crate::routing::{Pattern, RouteGroup};

pub fn routes() -> RouteGroup {
    RouteGroup::new("v1/membership/")
        .namespace("membership")
        .pattern(Pattern::leaf("plans/", "membership::plan_list").named("plan_list"))
        .pattern(Pattern::leaf("plans/<int:pk>/", "membership::plan_detail").named("plan_detail"))
        .pattern(Pattern::leaf("subscriptions/", "membership::subscription_list").named("subscription_list"))
        .pattern(
            Pattern::leaf("subscriptions/<int:pk>/", "membership::subscription_detail")
                .named("subscription_detail"),
        )
        .pattern(
            Pattern::leaf("subscriptions/<int:pk>/cancel/", "membership::subscription_cancel")
                .named("subscription_cancel"),
        )
}
