//! `pnta-http` delivers JSON payloads to the PNTA push backend over HTTP PUT
//! with a per-attempt timeout and bounded exponential-backoff retry.
//!
//! - [`Sender::send`] — retrying PUT of any serializable JSON object
//! - [`PntaClient::identify`] / [`PntaClient::update_metadata`] — the
//!   `/api/v1/identification` and `/api/v1/metadata` endpoints
//! - [`Dispatcher`] — callback-style delivery through a [`CompletionExecutor`]

mod client;
mod completion;
mod encode;
mod error;
mod options;
mod request;
mod sender;
mod value;
mod wire;

pub mod retry;

pub use client::{endpoint_url, PntaClient, DEFAULT_BASE_URL};
pub use completion::{
    Completion, CompletionExecutor, CompletionQueue, Dispatcher, InlineExecutor, QueueExecutor,
};
pub use error::PntaError;
pub use options::SendOptions;
pub use request::PutRequest;
pub use sender::Sender;
pub use value::{Payload, Value};
pub use wire::{DeviceIdentifiers, IdentificationBody, MetadataBody, Platform};

pub type Result<T> = std::result::Result<T, PntaError>;
