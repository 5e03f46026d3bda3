//! Errors raised while loading a graph definition.

/// Error compiling a [`GraphDef`](super::GraphDef) into a [`Rack`](super::Rack).
///
/// Every variant aborts the whole load; nothing is built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A module's kind tag has no unit implementation.
    #[error("module '{module}' has unknown kind '{kind}'")]
    UnknownKind {
        /// Offending module id.
        module: String,
        /// Kind tag as written.
        kind: String,
    },
    /// A connection references a module id that is not declared.
    #[error("connection {connection} references missing module '{missing}'")]
    DanglingConnection {
        /// Connection in `a.out -> b.in` form.
        connection: String,
        /// The id that could not be resolved.
        missing: String,
    },
    /// A connection references a port the unit kind does not have.
    #[error("connection {connection} references unknown port '{port}'")]
    UnknownPort {
        /// Connection in `a.out -> b.in` form.
        connection: String,
        /// The unresolved port in `id.port` form.
        port: String,
    },
    /// Two modules share an id.
    #[error("duplicate module id '{0}'")]
    DuplicateId(String),
}

impl GraphError {
    /// Returns the module id the error is about, where there is exactly one.
    pub fn module_id(&self) -> Option<&str> {
        match self {
            Self::UnknownKind { module, .. } => Some(module),
            Self::DanglingConnection { missing, .. } => Some(missing),
            Self::DuplicateId(id) => Some(id),
            Self::UnknownPort { .. } => None,
        }
    }
}

/// Error parsing an `"{id}.{port}"` port address.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PortAddressError {
    /// No `.` separates the id from the port.
    #[error("port address '{0}' must have the form 'id.port'")]
    MissingSeparator(String),
    /// The id or the port part is empty.
    #[error("port address '{0}' has an empty module id or port name")]
    EmptyPart(String),
}
