// where2go-api: Async Rust client for the Where2Go catalog admin API

pub mod catalog;
pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod transport;
pub mod user;

pub use client::{ApiClient, RequestResult};
pub use envelope::ApiResponse;
pub use error::Error;
pub use models::{
    City, CityDetail, CitySave, Destination, LoginPayload, LoginUser, Pincode, Profile, State,
    StateDetail, StateSave,
};
pub use transport::{TlsMode, TransportConfig};
