//! Weatherlet engine: HTTP transport, body decoding and the timer/fetch worker.
mod decode;
mod engine;
mod fetch;
mod types;

pub use decode::{decode_text, DecodedText};
pub use engine::{EngineError, EngineHandle};
pub use fetch::{fetch_text, FetchSettings, Fetcher, ReqwestFetcher};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FetchedText, Generation,
};
