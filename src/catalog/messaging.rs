//! Messaging routes.

use crate::routing::{Pattern, RouteGroup};

pub fn routes() -> RouteGroup {
    RouteGroup::new("v1/messaging/")
        .namespace("messaging")
        .pattern(Pattern::leaf("threads/", "messaging::thread_list").named("list"))
        .pattern(Pattern::leaf("threads/unread/", "messaging::unread_count").named("unread"))
        .pattern(Pattern::leaf("threads/<int:pk>/", "messaging::thread_detail").named("detail"))
        .pattern(Pattern::leaf("threads/<int:pk>/messages/", "messaging::message_list").named("messages"))
}
