use calboard_core::{
  EventSource,
  EventsEnvelope,
  FetchError,
  TransportError,
  decode_envelope
};
use gloo::net::http::Request;

/// Plain `GET` against the events
/// endpoint; the browser attaches the
/// session cookie.
#[derive(Debug, Clone)]
pub struct HttpEventSource {
  endpoint: String
}

impl HttpEventSource {
  pub fn new(
    endpoint: impl Into<String>
  ) -> Self {
    Self {
      endpoint: endpoint.into()
    }
  }
}

impl EventSource for HttpEventSource {
  async fn fetch_events(
    &self
  ) -> Result<EventsEnvelope, FetchError> {
    let response =
      Request::get(&self.endpoint)
        .send()
        .await
        .map_err(|error| {
          TransportError::Network(
            error.to_string()
          )
        })?;

    let status = response.status();
    let body =
      response.text().await.map_err(
        |error| {
          TransportError::Network(
            error.to_string()
          )
        }
      )?;

    tracing::trace!(
      status,
      bytes = body.len(),
      "events response received"
    );
    decode_envelope(status, &body)
  }
}
