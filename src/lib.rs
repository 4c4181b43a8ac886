//! tablon — flat-file CRUD backend for events, contacts, images, and
//! videos.
//!
//! Four independent resource types behind one small HTTP surface. Events
//! and contacts persist to delimited text files through a generic
//! [`RecordStore`] (whole-collection load/save, full rewrite on every
//! mutation); videos keep their record set in process memory only; images
//! are a bare blob capability. See the `store` module docs for the
//! single-writer assumption this design makes.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tablon::{http, BlobStore, ContactService, EventService, FileStore,
//!              InMemoryStore, VideoService};
//!
//! let state = http::AppState {
//!     events: Arc::new(EventService::new(FileStore::new("eventos.csv"))),
//!     contacts: Arc::new(ContactService::new(FileStore::new("contacts.csv"))),
//!     videos: Arc::new(VideoService::new(
//!         InMemoryStore::new(),
//!         BlobStore::open("static/videos")?,
//!     )),
//!     images: BlobStore::open("uploads")?,
//! };
//! http::serve(state, "0.0.0.0:3000").await?;
//! ```

pub mod blob;
pub mod codec;
pub mod config;
pub mod contacts;
pub mod error;
pub mod events;
pub mod http;
pub mod store;
pub mod videos;

pub use blob::BlobStore;
pub use codec::{CodecError, Record};
pub use config::Config;
pub use contacts::{Contact, ContactPatch, ContactService, NewContact};
pub use error::ServiceError;
pub use events::{Event, EventPatch, EventService, NewEvent};
pub use store::{FileStore, InMemoryStore, RecordStore, StoreError};
pub use videos::{Video, VideoService};
