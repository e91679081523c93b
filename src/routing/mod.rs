//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Table Assembly (at startup / reload):
//!     Mount[] (catalog groups, some behind FeatureGates)
//!     → gate.rs (evaluate conditions against FeatureFlags, once)
//!     → group.rs (concatenate prefixes + namespaces, depth-first)
//!     → pattern.rs (compile full templates)
//!     → router.rs (duplicate-name check, freeze as immutable Router)
//!
//! Incoming path
//!     → router.rs resolve (first match in declaration order)
//!     → Return: RouteMatch{entry, params, remainder} or NotFound
//!
//! Route name + params
//!     → router.rs reverse → pattern.rs render → URL
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)
//! - Gates decide table membership, never per-request behavior

pub mod error;
pub mod gate;
pub mod group;
pub mod pattern;
pub mod router;

pub use error::RoutingError;
pub use gate::{Condition, FeatureFlags, FeatureGate};
pub use group::{Mount, RouteGroup};
pub use pattern::{Converter, HandlerRef, Pattern, PatternKind, Template};
pub use router::{RouteEntry, RouteMatch, Router, NO_PARAMS};
