//! Declarative graph documents.
//!
//! ```json
//! {
//!   "modules": [
//!     { "id": "vco1", "kind": "VCO", "params": { "freq": 6 } },
//!     { "id": "out",  "kind": "OUTPUT" }
//!   ],
//!   "connections": [
//!     { "from": { "id": "vco1", "port": "out" }, "to": { "id": "out", "port": "in" } }
//!   ]
//! }
//! ```
//!
//! Either endpoint may also be written as an `"id.port"` string. The module id
//! is everything before the last `.`, so ids may themselves contain dots.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PortAddressError;
use crate::params::Params;

/// Reference to one port of one module.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PortRefRepr")]
pub struct PortRef {
    /// Module id.
    pub id: String,
    /// Port name.
    pub port: String,
}

impl PortRef {
    /// Creates a port reference.
    pub fn new(id: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            port: port.into(),
        }
    }
}

impl core::fmt::Display for PortRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.id, self.port)
    }
}

impl FromStr for PortRef {
    type Err = PortAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, port) = s
            .rsplit_once('.')
            .ok_or_else(|| PortAddressError::MissingSeparator(s.to_string()))?;
        if id.is_empty() || port.is_empty() {
            return Err(PortAddressError::EmptyPart(s.to_string()));
        }
        Ok(Self::new(id, port))
    }
}

impl From<(&str, &str)> for PortRef {
    fn from((id, port): (&str, &str)) -> Self {
        Self::new(id, port)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRefRepr {
    Address(String),
    Pair { id: String, port: String },
}

impl TryFrom<PortRefRepr> for PortRef {
    type Error = PortAddressError;

    fn try_from(repr: PortRefRepr) -> Result<Self, Self::Error> {
        match repr {
            PortRefRepr::Address(address) => address.parse(),
            PortRefRepr::Pair { id, port } => Ok(Self { id, port }),
        }
    }
}

/// A directed port-to-port connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Source output port.
    pub from: PortRef,
    /// Destination input port.
    pub to: PortRef,
}

impl Connection {
    /// Creates a connection.
    pub fn new(from: impl Into<PortRef>, to: impl Into<PortRef>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl core::fmt::Display for Connection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// One module declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    /// Unique module id.
    pub id: String,
    /// Kind tag, matched case-insensitively.
    pub kind: String,
    /// Parameters; unknown keys are ignored, missing keys use defaults.
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
}

impl ModuleDef {
    /// Creates a module with no parameters.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            params: Params::new(),
        }
    }

    /// Builder-style parameter insert.
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::params::ParamValue>,
    ) -> Self {
        self.params.insert(key, value);
        self
    }
}

/// A complete graph definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
    /// Modules in declaration order.
    #[serde(default)]
    pub modules: Vec<ModuleDef>,
    /// Connections in declaration order.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl GraphDef {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style module append.
    pub fn module(mut self, module: ModuleDef) -> Self {
        self.modules.push(module);
        self
    }

    /// Builder-style connection append from `"id.port"` addresses.
    ///
    /// An address without a `.` is kept as a module id with an empty port,
    /// which compilation then rejects as an unknown port (or a dangling
    /// connection if the id is not declared either).
    pub fn connect(mut self, from: &str, to: &str) -> Self {
        let parse = |address: &str| {
            address
                .parse::<PortRef>()
                .unwrap_or_else(|_| PortRef::new(address, ""))
        };
        self.connections.push(Connection::new(parse(from), parse(to)));
        self
    }

    /// Looks up a module by id.
    pub fn find(&self, id: &str) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// The reference patch: an LFO sweeping a VCA over a VCO, panned to stereo.
    pub fn reference() -> Self {
        Self::new()
            .module(ModuleDef::new("lfo1", "LFO").with_param("freq", -5.0f32))
            .module(ModuleDef::new("vco1", "VCO").with_param("freq", 6.0f32))
            .module(ModuleDef::new("vca1", "VCA"))
            .module(ModuleDef::new("pan1", "PAN"))
            .module(ModuleDef::new("out", "OUTPUT"))
            .connect("lfo1.out", "vca1.cv")
            .connect("vco1.out", "vca1.in")
            .connect("vca1.out", "pan1.in")
            .connect("pan1.outL", "out.inL")
            .connect("pan1.outR", "out.inR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_address_round_trip() {
        let port: PortRef = "vco1.out".parse().unwrap();
        assert_eq!(port, PortRef::new("vco1", "out"));
        assert_eq!(port.to_string(), "vco1.out");
        assert_eq!(port.to_string().parse::<PortRef>().unwrap(), port);
    }

    #[test]
    fn dotted_ids_split_on_last_dot() {
        let port: PortRef = "voice.1.osc.fm".parse().unwrap();
        assert_eq!(port.id, "voice.1.osc");
        assert_eq!(port.port, "fm");
        assert_eq!(port.to_string(), "voice.1.osc.fm");
    }

    #[test]
    fn malformed_addresses() {
        assert_eq!(
            "vco1".parse::<PortRef>(),
            Err(PortAddressError::MissingSeparator("vco1".into()))
        );
        assert_eq!(
            ".out".parse::<PortRef>(),
            Err(PortAddressError::EmptyPart(".out".into()))
        );
        assert_eq!(
            "vco1.".parse::<PortRef>(),
            Err(PortAddressError::EmptyPart("vco1.".into()))
        );
    }

    #[test]
    fn json_accepts_both_endpoint_forms() {
        let json = r#"{
            "modules": [
                {"id": "a", "kind": "VCO", "params": {"freq": 2, "shape": "sine"}},
                {"id": "b", "kind": "OUTPUT"}
            ],
            "connections": [
                {"from": {"id": "a", "port": "out"}, "to": "b.in"}
            ]
        }"#;
        let graph: GraphDef = serde_json::from_str(json).unwrap();
        assert_eq!(graph.modules.len(), 2);
        assert_eq!(graph.modules[0].params.number("freq"), Some(2.0));
        assert!(graph.modules[1].params.is_empty());
        assert_eq!(graph.connections[0], Connection::new(("a", "out"), ("b", "in")));
    }

    #[test]
    fn json_serializes_object_form() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("a", "VCO"))
            .connect("a.out", "b.in");
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["connections"][0]["from"]["id"], "a");
        assert_eq!(json["connections"][0]["to"]["port"], "in");
        assert!(json["modules"][0].get("params").is_none());

        let back: GraphDef = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn malformed_address_in_json_is_an_error() {
        let json = r#"{"connections": [{"from": "nodot", "to": "b.in"}]}"#;
        assert!(serde_json::from_str::<GraphDef>(json).is_err());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let graph: GraphDef = serde_json::from_str("{}").unwrap();
        assert!(graph.modules.is_empty());
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn connection_display() {
        let conn = Connection::new(("pan1", "outL"), ("out", "inL"));
        assert_eq!(conn.to_string(), "pan1.outL -> out.inL");
    }

    #[test]
    fn reference_patch_shape() {
        let graph = GraphDef::reference();
        assert_eq!(graph.modules.len(), 5);
        assert_eq!(graph.connections.len(), 5);
        assert_eq!(graph.find("vco1").unwrap().params.number("freq"), Some(6.0));
        assert!(graph.find("missing").is_none());
    }
}
