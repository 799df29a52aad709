//! In-memory Gremlin engine used by the integration tests.
//!
//! Understands the statement shapes the client emits: `g.V(..)`, `g.E()`,
//! `addV/property`, `addE/to`, `out/in/values`, `count` and `drop`, with
//! bound or inline arguments. Results are shaped like Cosmos DB responses.
//! Each statement applies atomically: a failed statement changes nothing.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orggraph_core::BindingMode;
use orggraph_graph::escape::unquote_literal;
use orggraph_graph::{GraphClient, GremlinTransport, Statement, TransportError};
use serde_json::{json, Map, Value};

type EvalResult<T> = Result<T, TransportError>;

fn rejected(status: u16, message: impl Into<String>) -> TransportError {
    TransportError::Rejected {
        status,
        message: message.into(),
    }
}

#[derive(Debug, Clone)]
enum Arg {
    Value(Value),
    Traversal(Vec<Step>),
}

#[derive(Debug, Clone)]
struct Step {
    name: String,
    args: Vec<Arg>,
}

impl Step {
    fn value_arg(&self, i: usize) -> EvalResult<Value> {
        match self.args.get(i) {
            Some(Arg::Value(v)) => Ok(v.clone()),
            _ => Err(rejected(597, format!("{}() expects a value at position {i}", self.name))),
        }
    }

    fn string_arg(&self, i: usize) -> EvalResult<String> {
        match self.value_arg(i)? {
            Value::String(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }

    fn string_args(&self) -> EvalResult<Vec<String>> {
        (0..self.args.len()).map(|i| self.string_arg(i)).collect()
    }
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    bindings: &'a Map<String, Value>,
}

impl<'a> Parser<'a> {
    fn parse(text: &str, bindings: &'a Map<String, Value>) -> EvalResult<Vec<Step>> {
        let mut parser = Parser {
            chars: text.chars().collect(),
            pos: 0,
            bindings,
        };
        let steps = parser.traversal()?;
        parser.skip_ws();
        if parser.pos != parser.chars.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(steps)
    }

    fn error(&self, what: &str) -> TransportError {
        rejected(597, format!("ScriptEvaluationError: {what} at offset {}", self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> EvalResult<()> {
        self.skip_ws();
        if self.bump() == Some(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn traversal(&mut self) -> EvalResult<Vec<Step>> {
        self.skip_ws();
        if self.ident() != "g" {
            return Err(self.error("expected traversal source 'g'"));
        }

        let mut steps = Vec::new();
        while self.peek() == Some('.') {
            self.pos += 1;
            let name = self.ident();
            if name.is_empty() {
                return Err(self.error("expected step name"));
            }
            self.expect('(')?;

            let mut args = Vec::new();
            self.skip_ws();
            if self.peek() == Some(')') {
                self.pos += 1;
            } else {
                loop {
                    args.push(self.arg()?);
                    self.skip_ws();
                    match self.bump() {
                        Some(',') => continue,
                        Some(')') => break,
                        _ => return Err(self.error("expected ',' or ')'")),
                    }
                }
            }
            steps.push(Step { name, args });
        }
        Ok(steps)
    }

    fn arg(&mut self) -> EvalResult<Arg> {
        self.skip_ws();
        match self.peek() {
            Some('\'') => self.literal().map(|s| Arg::Value(Value::String(s))),
            Some('g') if self.chars.get(self.pos + 1) == Some(&'.') => self.traversal().map(Arg::Traversal),
            Some(_) => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c != ',' && c != ')') {
                    self.pos += 1;
                }
                let token: String = self.chars[start..self.pos].iter().collect();
                self.token_value(token.trim()).map(Arg::Value)
            }
            None => Err(self.error("unexpected end of script")),
        }
    }

    fn literal(&mut self) -> EvalResult<String> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('\'') => break,
                Some(_) => {}
                None => return Err(self.error("unterminated string literal")),
            }
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        unquote_literal(&raw).ok_or_else(|| self.error("invalid string literal"))
    }

    fn token_value(&self, token: &str) -> EvalResult<Value> {
        if let Some(bound) = self.bindings.get(token) {
            return Ok(bound.clone());
        }
        match token {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => token
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.error(&format!("no such property or binding: {token}"))),
        }
    }
}

#[derive(Debug, Clone)]
struct FakeVertex {
    id: String,
    label: String,
    properties: BTreeMap<String, Value>,
}

#[derive(Debug, Clone)]
struct FakeEdge {
    id: String,
    label: String,
    out_v: String,
    in_v: String,
}

#[derive(Debug, Clone)]
enum Item {
    Vertex(String),
    Edge(String),
    Value(Value),
    PendingEdge { label: String, out_v: String },
}

#[derive(Debug, Clone, Default)]
struct Graph {
    vertices: Vec<FakeVertex>,
    edges: Vec<FakeEdge>,
    next_id: u64,
}

impl Graph {
    fn vertex(&self, id: &str) -> Option<&FakeVertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    fn vertex_mut(&mut self, id: &str) -> Option<&mut FakeVertex> {
        self.vertices.iter_mut().find(|v| v.id == id)
    }

    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("gen-{}", self.next_id)
    }

    fn run(&mut self, steps: &[Step]) -> EvalResult<Vec<Item>> {
        let mut items: Vec<Item> = Vec::new();

        for (i, step) in steps.iter().enumerate() {
            items = match (i, step.name.as_str()) {
                (0, "V") => self.start_vertices(step)?,
                (0, "E") => self.edges.iter().map(|e| Item::Edge(e.id.clone())).collect(),
                (0, "addV") => {
                    let label = step.string_arg(0)?;
                    let id = self.fresh_id();
                    self.vertices.push(FakeVertex {
                        id: id.clone(),
                        label,
                        properties: BTreeMap::new(),
                    });
                    vec![Item::Vertex(id)]
                }
                (0, other) => return Err(rejected(597, format!("unsupported start step {other}()"))),
                (_, "property") => self.set_property(items, step)?,
                (_, "addE") => {
                    let label = step.string_arg(0)?;
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            Item::Vertex(out_v) => Some(Item::PendingEdge {
                                label: label.clone(),
                                out_v,
                            }),
                            _ => None,
                        })
                        .collect()
                }
                (_, "to") => self.connect(items, step)?,
                (_, "out") => self.hop(items, step, true)?,
                (_, "in") => self.hop(items, step, false)?,
                (_, "values") => self.values(items, step)?,
                (_, "count") => vec![Item::Value(json!({"@type": "g:Int64", "@value": items.len()}))],
                (_, "drop") => {
                    self.drop_items(&items);
                    Vec::new()
                }
                (_, other) => return Err(rejected(597, format!("unsupported step {other}()"))),
            };
        }

        if items.iter().any(|item| matches!(item, Item::PendingEdge { .. })) {
            return Err(rejected(597, "addE() requires to()"));
        }
        Ok(items)
    }

    fn start_vertices(&self, step: &Step) -> EvalResult<Vec<Item>> {
        if step.args.is_empty() {
            return Ok(self.vertices.iter().map(|v| Item::Vertex(v.id.clone())).collect());
        }
        let ids = step.string_args()?;
        Ok(ids
            .into_iter()
            .filter(|id| self.vertex(id).is_some())
            .map(Item::Vertex)
            .collect())
    }

    fn set_property(&mut self, items: Vec<Item>, step: &Step) -> EvalResult<Vec<Item>> {
        let key = step.string_arg(0)?;
        let value = step.value_arg(1)?;
        let mut out = Vec::with_capacity(items.len());

        for item in items {
            match item {
                Item::Vertex(id) if key == "id" => {
                    let new_id = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                    if new_id != id && self.vertex(&new_id).is_some() {
                        return Err(rejected(
                            409,
                            format!("Resource with specified id or name already exists: {new_id}"),
                        ));
                    }
                    if let Some(v) = self.vertex_mut(&id) {
                        v.id = new_id.clone();
                    }
                    out.push(Item::Vertex(new_id));
                }
                Item::Vertex(id) => {
                    if let Some(v) = self.vertex_mut(&id) {
                        v.properties.insert(key.clone(), value.clone());
                    }
                    out.push(Item::Vertex(id));
                }
                other => out.push(other),
            }
        }
        Ok(out)
    }

    fn connect(&mut self, items: Vec<Item>, step: &Step) -> EvalResult<Vec<Item>> {
        if items.is_empty() {
            return Ok(items);
        }

        let target = match step.args.first() {
            Some(Arg::Traversal(steps)) => self.run(steps)?,
            Some(Arg::Value(v)) => {
                let id = v.as_str().unwrap_or_default();
                match self.vertex(id) {
                    Some(_) => vec![Item::Vertex(id.to_string())],
                    None => Vec::new(),
                }
            }
            None => return Err(rejected(597, "to() expects a target")),
        };
        let Some(Item::Vertex(in_v)) = target.into_iter().next() else {
            return Err(rejected(597, "The provided traverser does not map to a value"));
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if let Item::PendingEdge { label, out_v } = item {
                let id = self.fresh_id();
                self.edges.push(FakeEdge {
                    id: id.clone(),
                    label,
                    out_v,
                    in_v: in_v.clone(),
                });
                out.push(Item::Edge(id));
            }
        }
        Ok(out)
    }

    fn hop(&self, items: Vec<Item>, step: &Step, outward: bool) -> EvalResult<Vec<Item>> {
        let labels = step.string_args()?;
        let mut out = Vec::new();

        for item in items {
            let Item::Vertex(id) = item else { continue };
            for edge in &self.edges {
                if !labels.is_empty() && !labels.contains(&edge.label) {
                    continue;
                }
                let (near, far) = if outward {
                    (&edge.out_v, &edge.in_v)
                } else {
                    (&edge.in_v, &edge.out_v)
                };
                if *near == id {
                    out.push(Item::Vertex(far.clone()));
                }
            }
        }
        Ok(out)
    }

    fn values(&self, items: Vec<Item>, step: &Step) -> EvalResult<Vec<Item>> {
        let keys = step.string_args()?;
        let mut out = Vec::new();

        for item in items {
            let Item::Vertex(id) = item else { continue };
            let Some(vertex) = self.vertex(&id) else { continue };
            for (key, value) in &vertex.properties {
                if keys.is_empty() || keys.contains(key) {
                    out.push(Item::Value(value.clone()));
                }
            }
        }
        Ok(out)
    }

    fn drop_items(&mut self, items: &[Item]) {
        for item in items {
            match item {
                Item::Vertex(id) => {
                    self.vertices.retain(|v| &v.id != id);
                    self.edges.retain(|e| &e.out_v != id && &e.in_v != id);
                }
                Item::Edge(id) => self.edges.retain(|e| &e.id != id),
                _ => {}
            }
        }
    }

    fn label_of(&self, id: &str) -> String {
        self.vertex(id).map(|v| v.label.clone()).unwrap_or_default()
    }

    fn render(&self, item: Item) -> Value {
        match item {
            Item::Vertex(id) => match self.vertex(&id) {
                Some(v) => {
                    let properties: Map<String, Value> = v
                        .properties
                        .iter()
                        .map(|(key, value)| {
                            (
                                key.clone(),
                                json!([{"id": format!("{}|{}", v.id, key), "value": value}]),
                            )
                        })
                        .collect();
                    json!({
                        "id": v.id,
                        "label": v.label,
                        "type": "vertex",
                        "properties": properties,
                    })
                }
                None => Value::Null,
            },
            Item::Edge(id) => match self.edges.iter().find(|e| e.id == id) {
                Some(e) => json!({
                    "id": e.id,
                    "label": e.label,
                    "type": "edge",
                    "inVLabel": self.label_of(&e.in_v),
                    "outVLabel": self.label_of(&e.out_v),
                    "inV": e.in_v,
                    "outV": e.out_v,
                }),
                None => Value::Null,
            },
            Item::Value(value) => value,
            Item::PendingEdge { .. } => Value::Null,
        }
    }
}

#[derive(Default)]
struct State {
    graph: Graph,
    statements: Vec<Statement>,
    pending_failure: Option<(u16, String)>,
    close_calls: usize,
    closed: bool,
}

/// A [`GremlinTransport`] backed by an in-memory graph.
#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<State>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A client talking to this engine.
    pub fn client(self: &Arc<Self>, mode: BindingMode) -> GraphClient {
        let transport: Arc<dyn GremlinTransport> = Arc::clone(self) as Arc<dyn GremlinTransport>;
        GraphClient::with_transport(transport, mode)
    }

    /// Make the next submission fail with `status`.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.state.lock().unwrap().pending_failure = Some((status, message.to_string()));
    }

    /// Every statement received, in order, including failed ones.
    pub fn statements(&self) -> Vec<Statement> {
        self.state.lock().unwrap().statements.clone()
    }

    pub fn submissions(&self) -> usize {
        self.state.lock().unwrap().statements.len()
    }

    pub fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }

    pub fn vertex_ids(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.graph.vertices.iter().map(|v| v.id.clone()).collect()
    }

    pub fn vertex_label(&self, id: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.graph.vertex(id).map(|v| v.label.clone())
    }

    pub fn vertex_property(&self, id: &str, key: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.graph.vertex(id).and_then(|v| v.properties.get(key).cloned())
    }

    /// `(from, to, label)` of every edge.
    pub fn edges(&self) -> Vec<(String, String, String)> {
        let state = self.state.lock().unwrap();
        state
            .graph
            .edges
            .iter()
            .map(|e| (e.out_v.clone(), e.in_v.clone(), e.label.clone()))
            .collect()
    }
}

#[async_trait]
impl GremlinTransport for FakeEngine {
    async fn submit(&self, statement: &Statement) -> Result<Vec<Value>, TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(TransportError::Closed);
        }
        state.statements.push(statement.clone());

        if let Some((status, message)) = state.pending_failure.take() {
            return Err(rejected(status, message));
        }

        let steps = Parser::parse(statement.text(), statement.bindings())?;
        let mut work = state.graph.clone();
        let items = work.run(&steps)?;
        let rendered = items.into_iter().map(|item| work.render(item)).collect();
        state.graph = work;
        Ok(rendered)
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.close_calls += 1;
        state.closed = true;
        Ok(())
    }
}
