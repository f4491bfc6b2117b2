// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: DB and session adapters
// - presentation: HTTP handlers and routing
// - application: ordering/pagination/hierarchy policies and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
