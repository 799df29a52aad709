//! Statement transport.
//!
//! [`GremlinTransport`] is the seam between the client and the wire. The
//! production implementation, [`WsTransport`], owns one WebSocket session
//! for its whole lifetime.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::ConnectionSettings;
use crate::error::TransportError;
use crate::protocol::{self, status};
use crate::statement::Statement;

/// Submits statements to a Gremlin engine.
#[async_trait]
pub trait GremlinTransport: Send + Sync {
    /// Run one statement and return its result items, GraphSON-wrapped as
    /// the engine sent them.
    async fn submit(&self, statement: &Statement) -> Result<Vec<Value>, TransportError>;

    /// Release the session. Calling it again is a no-op.
    async fn close(&self) -> Result<(), TransportError>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// rustls 0.23 refuses to build a TLS config without a process-wide
/// provider. Another component may already have installed one.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Gremlin Server WebSocket session.
///
/// Calls are serialized through an async mutex, so concurrent callers queue
/// instead of interleaving frames. Dropping the transport drops the socket.
pub struct WsTransport {
    endpoint: String,
    username: String,
    password: String,
    session: Mutex<Option<WsStream>>,
}

impl WsTransport {
    /// Open a TLS session to the endpoint described by `settings`.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, TransportError> {
        Self::connect_url(&settings.endpoint(), settings.username(), settings.password()).await
    }

    /// Open a session to an explicit `ws://` or `wss://` URL.
    pub async fn connect_url(url: &str, username: &str, password: &str) -> Result<Self, TransportError> {
        install_crypto_provider();

        let (stream, _response) = connect_async(url).await.map_err(|e| TransportError::Connect {
            endpoint: url.to_string(),
            message: e.to_string(),
        })?;

        info!(endpoint = %url, "Gremlin session opened");

        Ok(Self {
            endpoint: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            session: Mutex::new(Some(stream)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn round_trip(&self, stream: &mut WsStream, statement: &Statement) -> Result<Vec<Value>, TransportError> {
        let request_id = Uuid::new_v4();
        let frame = protocol::encode(&protocol::eval_request(request_id, statement))?;
        stream.send(Message::Binary(frame)).await?;

        let expected_id = request_id.to_string();
        let mut data = Vec::new();
        let mut authenticated = false;

        loop {
            let bytes = match stream.next().await {
                Some(Ok(Message::Text(text))) => text.into_bytes(),
                Some(Ok(Message::Binary(bytes))) => bytes,
                Some(Ok(Message::Close(_))) | None => return Err(TransportError::Closed),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            };

            let response = protocol::decode(&bytes)?;
            if let Some(id) = response.request_id() {
                if id != expected_id {
                    warn!(expected = %expected_id, received = %id, "Skipping response for a different request");
                    continue;
                }
            }

            match response.status.code {
                status::SUCCESS | status::NO_CONTENT => {
                    data.extend(response.into_data());
                    return Ok(data);
                }
                status::PARTIAL_CONTENT => {
                    data.extend(response.into_data());
                }
                status::AUTHENTICATE if !authenticated => {
                    debug!("Answering SASL challenge");
                    authenticated = true;
                    let auth = protocol::auth_request(request_id, &self.username, &self.password);
                    stream.send(Message::Binary(protocol::encode(&auth)?)).await?;
                }
                code => {
                    return Err(TransportError::Rejected {
                        status: code,
                        message: response.describe(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl GremlinTransport for WsTransport {
    async fn submit(&self, statement: &Statement) -> Result<Vec<Value>, TransportError> {
        let mut session = self.session.lock().await;
        let stream = session.as_mut().ok_or(TransportError::Closed)?;
        self.round_trip(stream, statement).await
    }

    async fn close(&self) -> Result<(), TransportError> {
        let stream = self.session.lock().await.take();
        if let Some(mut stream) = stream {
            info!(endpoint = %self.endpoint, "Closing Gremlin session");
            stream.close(None).await?;
        }
        Ok(())
    }
}
