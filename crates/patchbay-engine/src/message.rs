//! Control and status messages.
//!
//! Both directions serialise to JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "loadGraph", "graph": {"modules": [], "connections": []}}
//! {"type": "graphLoaded", "success": true}
//! {"type": "error", "message": "connection ghost.out -> out.in references missing module 'ghost'"}
//! {"type": "scopeData", "frames": [{"id": "vco1", "samples": [0.0, 0.1]}]}
//! ```

use patchbay_core::GraphDef;
use serde::{Deserialize, Serialize};

/// Controller → engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlMessage {
    /// Replace the whole graph.
    LoadGraph {
        /// New graph definition.
        graph: GraphDef,
    },
}

/// Engine → controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineMessage {
    /// A `loadGraph` command compiled and is now running.
    GraphLoaded {
        /// Always `true`; failures are reported as [`EngineMessage::Error`].
        success: bool,
    },
    /// A `loadGraph` command failed; the previous graph keeps running.
    Error {
        /// Human-readable reason naming the offending module or connection.
        message: String,
    },
    /// Periodic snapshot of every unit's first output.
    ScopeData {
        /// One frame per unit, in execution order.
        frames: Vec<ScopeFrame>,
    },
}

/// One unit's output block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScopeFrame {
    /// Module id.
    pub id: String,
    /// Samples of the unit's first output port.
    pub samples: Vec<f32>,
}

impl ControlMessage {
    /// Parses a JSON message.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialises to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl EngineMessage {
    /// Parses a JSON message.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialises to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GraphLoaded { .. } => "graphLoaded",
            Self::Error { .. } => "error",
            Self::ScopeData { .. } => "scopeData",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::ModuleDef;

    #[test]
    fn load_graph_wire_format() {
        let json = r#"{
            "type": "loadGraph",
            "graph": {
                "modules": [{"id": "o", "kind": "OUTPUT"}],
                "connections": []
            }
        }"#;
        let ControlMessage::LoadGraph { graph } = ControlMessage::from_json(json).unwrap();
        assert_eq!(graph.modules, vec![ModuleDef::new("o", "OUTPUT")]);
    }

    #[test]
    fn engine_messages_are_tagged() {
        let loaded = EngineMessage::GraphLoaded { success: true };
        assert_eq!(loaded.to_json().unwrap(), r#"{"type":"graphLoaded","success":true}"#);

        let err = EngineMessage::Error {
            message: "boom".into(),
        };
        assert_eq!(err.to_json().unwrap(), r#"{"type":"error","message":"boom"}"#);
        assert_eq!(err.kind(), "error");

        let scope = EngineMessage::ScopeData {
            frames: vec![ScopeFrame {
                id: "vco1".into(),
                samples: vec![0.5, -0.5],
            }],
        };
        let json = scope.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"scopeData","frames":[{"id":"vco1","samples":[0.5,-0.5]}]}"#
        );
        assert_eq!(EngineMessage::from_json(&json).unwrap(), scope);
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(ControlMessage::from_json(r#"{"type":"reboot"}"#).is_err());
    }
}
