use std::process::ExitStatus;

/// Coarse category of a [`ConvertError`], comparable in tests and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Lookup,
    Parse,
    Ordering,
    UnknownCommand,
    Range,
    Syntax,
    DegeneratePath,
    Flatten,
    Io,
    Xml,
    Config,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("could not find {kind} '{key}' (found {found} matches, expected exactly 1)")]
    Lookup {
        kind: &'static str,
        key: String,
        found: usize,
    },
    #[error("malformed {what}: {reason}")]
    Parse { what: String, reason: String },
    #[error("'{command}' {reason}")]
    Ordering {
        command: String,
        reason: &'static str,
    },
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("{what} out of range")]
    Range { what: String },
    #[error("bad arguments to '{command}': {reason}")]
    Syntax { command: String, reason: String },
    #[error("path '{id}' has {vertices} vertices, at least 2 are required")]
    DegeneratePath { id: String, vertices: usize },
    #[error("flattener '{program}' exited with {status}: {stderr}")]
    Flatten {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid SVG document")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid options")]
    Config(#[from] serde_json::Error),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Lookup { .. } => ErrorKind::Lookup,
            ConvertError::Parse { .. } => ErrorKind::Parse,
            ConvertError::Ordering { .. } => ErrorKind::Ordering,
            ConvertError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            ConvertError::Range { .. } => ErrorKind::Range,
            ConvertError::Syntax { .. } => ErrorKind::Syntax,
            ConvertError::DegeneratePath { .. } => ErrorKind::DegeneratePath,
            ConvertError::Flatten { .. } => ErrorKind::Flatten,
            ConvertError::Io { .. } => ErrorKind::Io,
            ConvertError::Xml(_) => ErrorKind::Xml,
            ConvertError::Config(_) => ErrorKind::Config,
        }
    }

    /// Names the path in a [`ConvertError::DegeneratePath`] raised by a geometry helper.
    pub fn for_path(self, path_id: &str) -> Self {
        match self {
            ConvertError::DegeneratePath { vertices, .. } => ConvertError::DegeneratePath {
                id: path_id.to_string(),
                vertices,
            },
            other => other,
        }
    }

    pub(crate) fn parse(what: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::Parse {
            what: what.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ConvertError::Io {
            context: context.into(),
            source,
        }
    }
}

/// A [`ConvertError`] tied to the script line that raised it.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: '{}' failed", .command.as_deref().unwrap_or("<unreadable>"))]
pub struct ScriptError {
    pub line: usize,
    /// Command keyword, `None` when the line itself could not be read.
    pub command: Option<String>,
    #[source]
    pub error: ConvertError,
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
