//! Authentication routes.

use crate::routing::{Pattern, RouteGroup};

pub fn routes() -> RouteGroup {
    RouteGroup::new("v1/auth")
        .namespace("auth")
        .pattern(Pattern::leaf("/login", "auth::token_obtain_pair").named("login"))
        .pattern(Pattern::leaf("/refresh-token", "auth::token_refresh").named("refresh_token"))
        .pattern(Pattern::leaf("/login/<uuid:uuid>", "auth::token_obtain_pair_from_token").named("login_as"))
        .pattern(
            Pattern::leaf("/<uuid:uuid>/billing-info", "auth::client_billing_create")
                .named("client_billing_info_create"),
        )
}
