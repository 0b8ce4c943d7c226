use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::{EntityKind, FileState, ModuleState};

/// Result type for generation operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Every failure aborts the generation run; nothing here is recoverable.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("'{alias}' is an alias of '{target}', which was never registered")]
    #[diagnostic(
        code(vkcereal::unresolved_alias),
        help("register '{target}' before the end of the file")
    )]
    UnresolvedAlias { alias: String, target: String },

    #[error("alias cycle while resolving '{name}': {}", .chain.join(" -> "))]
    #[diagnostic(code(vkcereal::alias_cycle))]
    AliasCycle { name: String, chain: Vec<String> },

    #[error("{kind} '{name}' was already registered with different content")]
    #[diagnostic(code(vkcereal::duplicate_entity))]
    DuplicateEntity { kind: EntityKind, name: String },

    #[error("unknown entity '{name}'")]
    #[diagnostic(
        code(vkcereal::unknown_entity),
        help("entities must be registered before they are referenced")
    )]
    UnknownEntity { name: String },

    #[error("no module with index {index} is configured")]
    #[diagnostic(code(vkcereal::unknown_module))]
    UnknownModule { index: usize },

    #[error("cannot {operation} module '{module}' while it is {state}")]
    #[diagnostic(code(vkcereal::module_state))]
    ModuleState {
        module: String,
        operation: &'static str,
        state: ModuleState,
    },

    #[error("end_feature called with no open feature")]
    #[diagnostic(code(vkcereal::empty_feature_scope))]
    EmptyFeatureScope,

    #[error("{stage} reached with open features: {}", .open.join(", "))]
    #[diagnostic(
        code(vkcereal::unbalanced_features),
        help("every begin_feature needs a matching end_feature")
    )]
    UnbalancedFeatures {
        stage: &'static str,
        open: Vec<String>,
    },

    #[error("cannot {operation} while the generator is {state}")]
    #[diagnostic(code(vkcereal::file_state))]
    FileState {
        operation: &'static str,
        state: FileState,
    },

    #[error("the generation run was aborted by an earlier error")]
    #[diagnostic(code(vkcereal::aborted))]
    Aborted,

    #[error("emitter '{emitter}' failed on {kind} '{entity}'")]
    #[diagnostic(code(vkcereal::emitter))]
    Emitter {
        emitter: &'static str,
        kind: EntityKind,
        entity: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to write '{path}'")]
    #[diagnostic(code(vkcereal::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }

    /// True for errors that signal a driver or emitter breaking the event protocol.
    ///
    /// An emitter failure counts when the emitter was stopped by one of these.
    pub fn is_protocol_violation(&self) -> bool {
        match self {
            Error::ModuleState { .. }
            | Error::EmptyFeatureScope
            | Error::UnbalancedFeatures { .. }
            | Error::FileState { .. }
            | Error::UnknownModule { .. } => true,
            Error::Emitter { source, .. } => source
                .downcast_ref::<Error>()
                .is_some_and(Error::is_protocol_violation),
            _ => false,
        }
    }

    /// True for errors caused by inconsistent schema events.
    pub fn is_schema_inconsistency(&self) -> bool {
        matches!(
            self,
            Error::UnresolvedAlias { .. }
                | Error::AliasCycle { .. }
                | Error::DuplicateEntity { .. }
                | Error::UnknownEntity { .. }
        )
    }
}
