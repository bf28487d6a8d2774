// ── Domain model ──
//
// Catalog records come straight from `where2go-api`; only the session has
// client-side semantics of its own.

pub mod session;

pub use session::{Readiness, Session, SessionPatch};
