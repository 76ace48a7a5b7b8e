use std::{fmt, path::PathBuf};

/// Problems reading a grammar definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError {
    pub problem: String,
    pub details: String,
    pub filename: PathBuf,
}

impl fmt::Display for LoadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self
            .details
            .is_empty()
        {
            write!(f, "{}: {}", self.problem, self.filename.display())
        } else {
            write!(
                f,
                "{}: {}: {}",
                self.problem,
                self.filename.display(),
                self.details
            )
        }
    }
}

impl std::error::Error for LoadingError {}

/// Problems turning a grammar definition into a Language.
#[derive(Debug)]
pub enum DefinitionError {
    Syntax(serde_json::Error),
    /// A mode was referred to by a name not declared in `modes`.
    UnknownMode(String),
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::Syntax(error) => write!(f, "{}", error),
            DefinitionError::UnknownMode(name) => write!(f, "no mode named \"{}\"", name),
        }
    }
}

impl std::error::Error for DefinitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DefinitionError::Syntax(error) => Some(error),
            DefinitionError::UnknownMode(_) => None,
        }
    }
}

impl From<serde_json::Error> for DefinitionError {
    fn from(error: serde_json::Error) -> Self {
        DefinitionError::Syntax(error)
    }
}
