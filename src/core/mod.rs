//! Domain types, classification rules, aggregation, and reconciliation.
//!
//! Everything here is plain data plus pure functions; the only stateful
//! piece is the per-diagnostic [`Session`].

mod aggregate;
mod classify;
mod error;
mod reconcile;
mod session;
mod types;

pub use aggregate::*;
pub use classify::*;
pub use error::*;
pub use reconcile::*;
pub use session::*;
pub use types::*;
