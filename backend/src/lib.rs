//! Recipe backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, permission rules and the
//! services behind the driving ports; [`inbound::http`] adapts them to
//! actix-web; [`outbound`] implements the driven ports over PostgreSQL or
//! memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
