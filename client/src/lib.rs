pub mod client;
pub mod controller;
pub mod dedup;
pub mod events;

pub use client::{Client, Settlement};
pub use controller::{RoundController, RoundError};
pub use dedup::{Deduplicator, Observation};
pub use events::Stream;

use janken_types::settle::SettlementParseError;
use thiserror::Error;

/// Error type for settlement-service operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("tungstenite error: {0}")]
    Tungstenite(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("failed: {0}")]
    Failed(reqwest::StatusCode),
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid data: {0}")]
    InvalidData(#[from] SettlementParseError),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
    #[error("not connected to a settlement service")]
    NotConnected,
}

/// Result type for settlement-service operations.
pub type Result<T> = std::result::Result<T, Error>;
