use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use reqwest_eventsource::{Error as SseError, Event, EventSource};
use tracing::debug;

use scout_app_core::{EventStream, EventTransport, StreamEnd};
use scout_core::{OutboundEvent, ServerEvent};

/// Current stream endpoint.
const STREAM_PATH: &str = "/v1/events/stream";
/// Endpoint older backend deployments expose. Tried once when the current
/// path 404s.
const LEGACY_STREAM_PATH: &str = "/v1/events";
const SUBSCRIBE_PATH: &str = "/v1/events/subscribe";

/// Server-sent-events binding of the stream transport: one long-lived
/// authenticated GET for inbound events, plain POSTs for the few
/// client-to-backend messages.
pub struct SseTransport {
    client: Client,
}

impl SseTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn open_path(
        &self,
        origin: &str,
        path: &str,
        access_token: &str,
    ) -> Result<EventSource, OpenError> {
        let request = self
            .client
            .get(format!("{origin}{path}"))
            .bearer_auth(access_token);
        let mut es = EventSource::new(request).map_err(|e| OpenError::Other(e.into()))?;

        // The stream is usable only after the initial Open handshake.
        match es.next().await {
            Some(Ok(Event::Open)) => Ok(es),
            Some(Ok(Event::Message(_))) => {
                es.close();
                Err(OpenError::Other(anyhow::anyhow!(
                    "stream delivered a message before opening"
                )))
            }
            Some(Err(SseError::InvalidStatusCode(status, _))) if status == StatusCode::NOT_FOUND => {
                es.close();
                Err(OpenError::NotFound)
            }
            Some(Err(e)) => {
                es.close();
                Err(OpenError::Other(e.into()))
            }
            None => Err(OpenError::Other(anyhow::anyhow!(
                "stream ended before opening"
            ))),
        }
    }
}

impl Default for SseTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

enum OpenError {
    /// The endpoint does not exist on this deployment.
    NotFound,
    Other(anyhow::Error),
}

#[async_trait]
impl EventTransport for SseTransport {
    async fn open(
        &self,
        origin: &str,
        access_token: &str,
    ) -> anyhow::Result<Box<dyn EventStream>> {
        let es = match self.open_path(origin, STREAM_PATH, access_token).await {
            Ok(es) => es,
            Err(OpenError::NotFound) => {
                debug!("stream endpoint not found; falling back to legacy path");
                match self
                    .open_path(origin, LEGACY_STREAM_PATH, access_token)
                    .await
                {
                    Ok(es) => es,
                    Err(OpenError::NotFound) => {
                        anyhow::bail!("backend exposes no event stream endpoint")
                    }
                    Err(OpenError::Other(e)) => return Err(e),
                }
            }
            Err(OpenError::Other(e)) => return Err(e),
        };

        Ok(Box::new(SseStream {
            es,
            client: self.client.clone(),
            subscribe_url: format!("{origin}{SUBSCRIBE_PATH}"),
            access_token: access_token.to_string(),
        }))
    }
}

struct SseStream {
    es: EventSource,
    client: Client,
    subscribe_url: String,
    access_token: String,
}

#[async_trait]
impl EventStream for SseStream {
    async fn recv(&mut self) -> Result<ServerEvent, StreamEnd> {
        loop {
            match self.es.next().await {
                Some(Ok(Event::Open)) => continue,
                Some(Ok(Event::Message(msg))) => match ServerEvent::parse(&msg.event, &msg.data) {
                    Some(ev) => return Ok(ev),
                    None => {
                        debug!(event = %msg.event, "dropping unrecognized stream event");
                        continue;
                    }
                },
                Some(Err(SseError::StreamEnded)) | None => {
                    self.es.close();
                    return Err(StreamEnd::ServerClose);
                }
                Some(Err(e)) => {
                    // Reconnection policy lives in the supervisor, not here.
                    self.es.close();
                    return Err(StreamEnd::Lost(e.to_string()));
                }
            }
        }
    }

    async fn send(&mut self, event: OutboundEvent) -> anyhow::Result<()> {
        self.client
            .post(&self.subscribe_url)
            .bearer_auth(&self.access_token)
            .json(&event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
