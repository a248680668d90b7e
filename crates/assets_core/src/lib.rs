//! Keeps an in-memory copy of a course's assets in step with the assets API.
//!
//! Collaborators issue commands on [`AssetsClient`] and read snapshots from
//! [`AssetStore`]; every state change goes through an [`AssetEvent`] and the pure
//! transitions in [`reducer`].

pub mod attributes;
pub mod client;
pub mod config;
pub mod events;
pub mod filters;
pub mod reducer;
pub mod state;
pub mod store;
pub mod transport;
pub mod view;

pub use client::{AssetsClient, ListOutcome, QueryChange, UploadOutcome};
pub use config::{load_settings, AssetsSettings};
pub use events::AssetEvent;
pub use state::{AssetsState, PendingRequest};
pub use store::AssetStore;
pub use transport::{ReqwestTransport, Transport};
