//! Gremlin statement construction.
//!
//! A [`Statement`] is the script text plus its bindings. Fixed traversal
//! text goes in through [`Statement::step`]; anything that carries data goes
//! in through [`Statement::arg`], which either registers a named binding or
//! renders an escaped literal, depending on the [`BindingMode`].

use orggraph_core::{BindingMode, PropertyValue};
use serde_json::{Map, Value};

use crate::escape::quote_literal;

/// A Gremlin script with its bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    bindings: Map<String, Value>,
    mode: BindingMode,
}

impl Statement {
    /// Start an empty statement.
    pub fn new(mode: BindingMode) -> Self {
        Self {
            text: String::new(),
            bindings: Map::new(),
            mode,
        }
    }

    /// A fixed script with no arguments.
    pub fn script(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bindings: Map::new(),
            mode: BindingMode::Bound,
        }
    }

    /// Append fixed traversal text.
    pub fn step(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    /// Append a data-bearing argument.
    pub fn arg(mut self, value: impl Into<PropertyValue>) -> Self {
        let value = value.into();
        match self.mode {
            BindingMode::Bound => {
                let name = format!("p{}", self.bindings.len());
                self.text.push_str(&name);
                self.bindings.insert(name, to_json(value));
            }
            BindingMode::Inline => match value {
                PropertyValue::String(s) => self.text.push_str(&quote_literal(&s)),
                PropertyValue::Integer(i) => self.text.push_str(&i.to_string()),
                PropertyValue::Boolean(b) => self.text.push_str(if b { "true" } else { "false" }),
            },
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bindings(&self) -> &Map<String, Value> {
        &self.bindings
    }

    pub fn mode(&self) -> BindingMode {
        self.mode
    }
}

fn to_json(value: PropertyValue) -> Value {
    match value {
        PropertyValue::String(s) => Value::String(s),
        PropertyValue::Integer(i) => Value::from(i),
        PropertyValue::Boolean(b) => Value::Bool(b),
    }
}
