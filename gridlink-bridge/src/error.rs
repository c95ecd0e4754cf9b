//! Error types surfaced by the bridge

use thiserror::Error;

/// Errors returned by the transform server, client and callback adapters.
///
/// None of these are retried internally; every error surfaces to the
/// immediate caller unchanged.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The forward request metadata does not carry the callback connection
    /// id exactly once.
    #[error("transform request metadata is missing broker_requestId")]
    MissingCallbackId,

    /// The callback connection id is not the decimal form of a u32.
    #[error("callback connection id `{0}` is not an unsigned 32-bit integer")]
    InvalidCallbackId(String),

    /// The broker could not dial the callback endpoint.
    #[error("failed to dial callback connection {id}")]
    CallbackDial {
        id: u32,
        #[source]
        source: BrokerError,
    },

    /// A result frame could not be encoded; the whole response is dropped.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Opaque failure from the underlying channel, passed through verbatim.
    #[error("transport error")]
    Transport(#[source] anyhow::Error),

    /// Opaque failure from a user handler, passed through verbatim.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

/// Errors produced by a [`Broker`](crate::Broker) implementation.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// No callback endpoint is registered under this connection id.
    #[error("no callback endpoint registered for connection {0}")]
    UnknownId(u32),

    /// The broker failed to establish or bind the connection.
    #[error("broker connection failed")]
    Connection(#[source] anyhow::Error),
}

/// A single frame failed to encode.
#[derive(Debug, Error)]
#[error("failed to encode frame `{name}`")]
pub struct EncodeError {
    /// Name of the offending frame.
    pub name: String,
    #[source]
    pub source: anyhow::Error,
}

impl EncodeError {
    pub fn new(name: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}
