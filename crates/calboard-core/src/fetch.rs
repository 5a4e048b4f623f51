use serde::Deserialize;
use thiserror::Error;

use crate::event::{
  EventsEnvelope,
  RawEvent
};

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum TransportError {
  #[error("events request failed: {0}")]
  Network(String),
  #[error(
    "events endpoint returned HTTP {0}"
  )]
  Status(u16),
  #[error(
    "malformed events envelope: {0}"
  )]
  Decode(String)
}

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum FetchError {
  /// The backend says the session is
  /// missing or no longer valid.
  #[error(
    "backend rejected the session: \
     {reason}"
  )]
  Unauthenticated { reason: String },
  #[error(transparent)]
  Transport(#[from] TransportError)
}

impl FetchError {
  pub fn is_auth(&self) -> bool {
    matches!(
      self,
      Self::Unauthenticated { .. }
    )
  }
}

#[derive(Debug, Deserialize)]
struct WireEnvelope {
  #[serde(default)]
  error:     Option<String>,
  #[serde(default)]
  regular:   Vec<RawEvent>,
  #[serde(default)]
  important: Vec<RawEvent>
}

/// Classifies one response from the
/// events endpoint.
///
/// A non-2xx status or an undecodable
/// body is a transport failure. A decoded
/// envelope carrying a non-empty `error`
/// is an authentication failure.
pub fn decode_envelope(
  status: u16,
  body: &str
) -> Result<EventsEnvelope, FetchError> {
  if !(200..300).contains(&status) {
    return Err(
      TransportError::Status(status).into()
    );
  }

  let wire: WireEnvelope =
    serde_json::from_str(body).map_err(
      |error| {
        TransportError::Decode(
          error.to_string()
        )
      }
    )?;

  if let Some(reason) = wire.error
    && !reason.is_empty()
  {
    return Err(
      FetchError::Unauthenticated {
        reason
      }
    );
  }

  Ok(EventsEnvelope {
    regular:   wire.regular,
    important: wire.important
  })
}

/// One request to the events backend per
/// call. Implementations never retry; the
/// next poll tick is the retry.
#[allow(async_fn_in_trait)]
pub trait EventSource {
  async fn fetch_events(
    &self
  ) -> Result<EventsEnvelope, FetchError>;
}
