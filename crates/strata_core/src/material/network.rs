//! Shading networks: nodes with named parameters, wired by connections.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A literal parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Float(f32),
    Vector(Vec<f32>),
    String(String),
}

impl ParamValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ParamValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// First three components of a 3 or 4 component vector.
    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            ParamValue::Vector(v) if v.len() == 3 || v.len() == 4 => Some([v[0], v[1], v[2]]),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(value) => Some(value),
            _ => None,
        }
    }
}

/// One edge of a shading network.
///
/// Data flows from the `input` side (the upstream node producing a value) to
/// the `output` side (the downstream node whose parameter consumes it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Upstream node path
    pub input_id: String,
    /// Upstream output name (`r`, `rgb`, `a`, ...)
    pub input_name: String,
    /// Downstream node path
    pub output_id: String,
    /// Downstream parameter name
    pub output_name: String,
}

/// Where a connected parameter gets its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub node: String,
    pub output: String,
}

/// A consumer of one of a node's outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downstream {
    pub node: String,
    pub input: String,
}

/// A parameter as seen after finalize: a literal or a connection, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter<'a> {
    Literal(&'a ParamValue),
    Connected(&'a Upstream),
}

#[derive(Debug, Clone, Default)]
pub struct MaterialNode {
    pub path: String,
    literals: HashMap<String, ParamValue>,
    inputs: HashMap<String, Upstream>,
    outputs: HashMap<String, Vec<Downstream>>,
}

impl MaterialNode {
    pub fn new(path: impl Into<String>, params: HashMap<String, ParamValue>) -> Self {
        Self {
            path: path.into(),
            literals: params,
            ..Default::default()
        }
    }

    /// Look up a parameter. A connection shadows a literal of the same name.
    pub fn param(&self, name: &str) -> Option<Parameter<'_>> {
        if let Some(upstream) = self.inputs.get(name) {
            return Some(Parameter::Connected(upstream));
        }
        self.literals.get(name).map(Parameter::Literal)
    }

    pub fn literal(&self, name: &str) -> Option<&ParamValue> {
        self.literals.get(name)
    }

    /// Names of every literal and connected parameter.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.literals
            .keys()
            .chain(self.inputs.keys().filter(|k| !self.literals.contains_key(*k)))
            .map(String::as_str)
    }

    pub fn downstream(&self, output: &str) -> &[Downstream] {
        self.outputs.get(output).map(Vec::as_slice).unwrap_or(&[])
    }

    fn clear_wiring(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkState {
    #[default]
    Building,
    Resolved,
}

/// The nodes of one material, kept in the order they were first delivered.
#[derive(Debug, Clone, Default)]
pub struct ShadingNetwork {
    nodes: Vec<MaterialNode>,
    state: NetworkState,
}

impl ShadingNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Add a node, or replace the parameters of an existing one.
    pub fn update_node(&mut self, path: &str, params: HashMap<String, ParamValue>) {
        match self.nodes.iter_mut().find(|n| n.path == path) {
            Some(node) => node.literals = params,
            None => self.nodes.push(MaterialNode::new(path, params)),
        }
        self.state = NetworkState::Building;
    }

    /// Wire every connection whose endpoints both exist.
    ///
    /// Wiring is rebuilt from scratch, so finalizing twice with the same
    /// connections gives the same network.
    pub fn finalize(&mut self, connections: &[Connection]) {
        for node in &mut self.nodes {
            node.clear_wiring();
        }

        for connection in connections {
            let upstream = self.index_of(&connection.input_id);
            let downstream = self.index_of(&connection.output_id);
            let (Some(upstream), Some(downstream)) = (upstream, downstream) else {
                log::debug!(
                    "Skipping dangling connection {}.{} -> {}.{}",
                    connection.input_id,
                    connection.input_name,
                    connection.output_id,
                    connection.output_name
                );
                continue;
            };

            self.nodes[downstream].inputs.insert(
                connection.output_name.clone(),
                Upstream {
                    node: connection.input_id.clone(),
                    output: connection.input_name.clone(),
                },
            );
            self.nodes[upstream]
                .outputs
                .entry(connection.input_name.clone())
                .or_default()
                .push(Downstream {
                    node: connection.output_id.clone(),
                    input: connection.output_name.clone(),
                });
        }

        self.state = NetworkState::Resolved;
    }

    /// First node, in delivery order, carrying the marker parameter.
    pub fn main_node(&self, marker: &str) -> Option<&MaterialNode> {
        self.nodes.iter().find(|n| n.param(marker).is_some())
    }

    pub fn node(&self, path: &str) -> Option<&MaterialNode> {
        self.nodes.iter().find(|n| n.path == path)
    }

    pub fn nodes(&self) -> &[MaterialNode] {
        &self.nodes
    }

    fn index_of(&self, path: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.path == path)
    }
}
