use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty or clashing sink file names).
    ConfigValidation(String),
    /// A configured header name is absent from the source file.
    MissingColumn { source: String, column: String },
    /// Header row has fewer than the three key columns.
    ShortHeader { source: String, fields: usize },
    /// Grade term outside the four-term grade vocabulary.
    UnknownGrade(String),
    /// CSV decode error (invalid UTF-8, malformed record).
    Csv { path: String, message: String },
    /// IO error (file open, read, append).
    Io { path: String, message: String },
}

impl ReconError {
    pub(crate) fn io(path: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::Io { path: path.into(), message: err.to_string() }
    }

    pub(crate) fn csv(path: impl Into<String>, err: &csv::Error) -> Self {
        // csv wraps IO failures too; keep those classified as IO.
        if let csv::ErrorKind::Io(io) = err.kind() {
            return Self::io(path, io);
        }
        Self::Csv { path: path.into(), message: err.to_string() }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::ShortHeader { source, fields } => {
                write!(f, "{source}: expected at least 3 columns, found {fields}")
            }
            Self::UnknownGrade(term) => write!(f, "unknown grade: '{term}'"),
            Self::Csv { path, message } => write!(f, "{path}: CSV error: {message}"),
            Self::Io { path, message } => write!(f, "{path}: IO error: {message}"),
        }
    }
}

impl std::error::Error for ReconError {}
