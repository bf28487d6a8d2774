//! Session and catalog layer between `where2go-api` and its front ends.
//!
//! - **[`SessionStore`]** — the single observable session container.
//!   `get()` / `set()` / `subscribe()` over a `tokio::sync::watch` channel;
//!   subscribers select a slice of the [`Session`] and are woken only when
//!   that slice changes.
//!
//! - **[`SessionActions`]** — `login`, `logout` and the run-once
//!   `fetch_profile` that moves the session out of [`Readiness::Unknown`].
//!
//! - **[`SessionContext`]** — composition root. Owns the client, the store
//!   and the actions; [`SessionContext::initialize`] awaits the profile fetch
//!   so nothing downstream ever sees an undecided session.
//!
//! - **[`Catalog`]** — state / city / destination operations with both error
//!   tiers (transport and `success: false`) folded into [`CoreError`].
//!
//! - **[`validation`]** and **[`notify`]** — form rules and the user-facing
//!   failure messages shared by every front end.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod session;
pub mod store;
pub mod stream;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, CityForm, StateForm, Selectable};
pub use config::{ClientConfig, TlsVerification};
pub use error::CoreError;
pub use model::{Readiness, Session, SessionPatch};
pub use notify::{Notification, NotificationVariant};
pub use session::{SessionActions, SessionContext};
pub use store::SessionStore;
pub use stream::Selection;

// Backend records pass through unchanged.
pub use where2go_api::{
    ApiClient, ApiResponse, City, CityDetail, Destination, Pincode, Profile, State, StateDetail,
};
