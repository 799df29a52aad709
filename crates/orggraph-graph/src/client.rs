//! Cosmos DB Gremlin client.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use orggraph_core::{BindingMode, CosmosSettings, Edge, Vertex};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{GraphError, GraphResult, Operation, TransportError};
use crate::graphson;
use crate::statement::Statement;
use crate::transport::{GremlinTransport, WsTransport};

/// Port of the Cosmos DB Gremlin endpoint. TLS is always on.
pub const COSMOS_GREMLIN_PORT: u16 = 443;

/// Path of the Gremlin WebSocket endpoint.
const GREMLIN_PATH: &str = "/gremlin";

/// Reduce a configured hostname to the bare host.
///
/// `https://acct.gremlin.cosmos.azure.com:443/` becomes
/// `acct.gremlin.cosmos.azure.com`.
pub fn normalize_hostname(raw: &str) -> String {
    let mut host = raw.trim();
    for prefix in ["https://", "wss://", "http://", "ws://"] {
        if let Some(rest) = host.strip_prefix(prefix) {
            host = rest;
            break;
        }
    }
    let host = host.trim_start_matches('/');
    let end = host.find([':', '/']).unwrap_or(host.len());
    host[..end].to_string()
}

/// Everything needed to open a session.
#[derive(Clone)]
pub struct ConnectionSettings {
    host: String,
    port: u16,
    username: String,
    password: String,
    binding_mode: BindingMode,
}

impl ConnectionSettings {
    /// Settings for `container` in `database`, authenticating with the
    /// account key `credential`.
    pub fn new(hostname: &str, credential: &str, database: &str, container: &str) -> Self {
        Self {
            host: normalize_hostname(hostname),
            port: COSMOS_GREMLIN_PORT,
            username: format!("/dbs/{database}/colls/{container}"),
            password: credential.to_string(),
            binding_mode: BindingMode::default(),
        }
    }

    pub fn from_cosmos(cosmos: &CosmosSettings) -> Self {
        Self::new(&cosmos.hostname, &cosmos.master_key, &cosmos.database, &cosmos.container)
            .with_binding_mode(cosmos.binding_mode)
    }

    pub fn with_binding_mode(mut self, mode: BindingMode) -> Self {
        self.binding_mode = mode;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Composite identity `/dbs/<database>/colls/<container>`.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub fn binding_mode(&self) -> BindingMode {
        self.binding_mode
    }

    /// `wss://<host>:443/gremlin`
    pub fn endpoint(&self) -> String {
        format!("wss://{}:{}{}", self.host, self.port, GREMLIN_PATH)
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("binding_mode", &self.binding_mode)
            .finish()
    }
}

/// Typed operations over one Gremlin session.
///
/// Every operation is exactly one round trip; nothing is batched, cached or
/// retried. Call [`GraphClient::close`] to release the session; dropping the
/// client releases it as well.
pub struct GraphClient {
    transport: Arc<dyn GremlinTransport>,
    binding_mode: BindingMode,
    closed: AtomicBool,
}

impl GraphClient {
    /// Open a session to the configured endpoint.
    pub async fn connect(settings: &ConnectionSettings) -> GraphResult<Self> {
        info!(host = %settings.host(), user = %settings.username(), "Connecting to Gremlin endpoint");

        let transport = WsTransport::connect(settings)
            .await
            .map_err(|e| GraphError::from_transport(Operation::Probe, e))?;

        Ok(Self::with_transport(Arc::new(transport), settings.binding_mode()))
    }

    /// Wrap an already-open transport.
    pub fn with_transport(transport: Arc<dyn GremlinTransport>, binding_mode: BindingMode) -> Self {
        Self {
            transport,
            binding_mode,
            closed: AtomicBool::new(false),
        }
    }

    pub fn binding_mode(&self) -> BindingMode {
        self.binding_mode
    }

    /// Start a statement in this client's binding mode.
    pub(crate) fn statement(&self) -> Statement {
        Statement::new(self.binding_mode)
    }

    /// Submit `statement`, classifying failures by `op`, and return the
    /// result items with GraphSON wrappers removed.
    pub(crate) async fn submit(&self, op: Operation, statement: Statement) -> GraphResult<Vec<Value>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(GraphError::from_transport(op, TransportError::Closed));
        }

        debug!(query = %statement.text(), bindings = statement.bindings().len(), "Submitting statement");

        let items = self
            .transport
            .submit(&statement)
            .await
            .map_err(|e| GraphError::from_transport(op, e))?;

        Ok(items.into_iter().map(graphson::strip_types).collect())
    }

    async fn count(&self, script: &str) -> GraphResult<i64> {
        let items = self.submit(Operation::Probe, Statement::script(script)).await?;
        items
            .first()
            .and_then(graphson::as_i64)
            .ok_or_else(|| GraphError::Protocol(format!("'{script}' returned no count")))
    }

    /// Liveness probe: the current vertex count.
    pub async fn test_connection(&self) -> GraphResult<i64> {
        self.count("g.V().count()").await
    }

    /// Number of vertices in the graph.
    pub async fn vertex_count(&self) -> GraphResult<i64> {
        self.count("g.V().count()").await
    }

    /// Number of edges in the graph.
    pub async fn edge_count(&self) -> GraphResult<i64> {
        self.count("g.E().count()").await
    }

    /// Create `vertex` with its label and every entry of its property bag.
    pub async fn add_vertex<V: Vertex + ?Sized>(&self, vertex: &V) -> GraphResult<()> {
        if vertex.id().trim().is_empty() {
            return Err(GraphError::InvalidEntity(format!(
                "{} vertex has an empty id",
                vertex.label()
            )));
        }

        let mut stmt = self.statement().step("g.addV(").arg(vertex.label()).step(")");
        for (key, value) in vertex.to_property_bag() {
            stmt = stmt.step(".property(").arg(key).step(", ").arg(value).step(")");
        }

        self.submit(Operation::Write, stmt).await?;
        debug!(id = %vertex.id(), label = vertex.label(), "Vertex added");
        Ok(())
    }

    /// Create `edge` between two existing vertices.
    ///
    /// Endpoints are not checked locally. If the engine creates nothing
    /// (no source vertex matched) the call fails rather than succeeding
    /// silently.
    pub async fn add_edge(&self, edge: &Edge) -> GraphResult<()> {
        if edge.label.trim().is_empty() {
            return Err(GraphError::InvalidEntity(format!(
                "edge {} -> {} has an empty label",
                edge.from_id, edge.to_id
            )));
        }

        let stmt = self
            .statement()
            .step("g.V(")
            .arg(edge.from_id.as_str())
            .step(").addE(")
            .arg(edge.label.as_str())
            .step(").to(g.V(")
            .arg(edge.to_id.as_str())
            .step("))");

        let created = self.submit(Operation::Write, stmt).await?;
        if created.is_empty() {
            return Err(GraphError::Write {
                message: format!(
                    "edge '{}' not created: vertex '{}' or '{}' does not exist",
                    edge.label, edge.from_id, edge.to_id
                ),
                status: None,
            });
        }

        debug!(from = %edge.from_id, to = %edge.to_id, label = %edge.label, "Edge added");
        Ok(())
    }

    /// Drop every vertex, and with them every edge. Irreversible.
    pub async fn clear_graph(&self) -> GraphResult<()> {
        self.submit(Operation::Write, Statement::script("g.V().drop()")).await?;
        info!("Graph cleared");
        Ok(())
    }

    /// Run an arbitrary script and return its unwrapped results.
    pub async fn submit_raw(&self, script: &str) -> GraphResult<Vec<Value>> {
        self.submit(Operation::Read, Statement::script(script)).await
    }

    /// Release the session. Only the first call reaches the transport.
    pub async fn close(&self) -> GraphResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.transport
            .close()
            .await
            .map_err(|e| GraphError::from_transport(Operation::Probe, e))
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
