//! Account and social-graph service.
//!
//! Registers and authenticates users and records directed follow edges with
//! denormalized follower and following counters. PostgreSQL is the source of
//! truth, Redis holds a read cache and the outbound event stream, and the
//! [`domain::AccountCoordinator`] keeps the three consistent.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
