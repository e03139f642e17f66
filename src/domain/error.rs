//! Domain error types.

/// A parse error with position information for query parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!("{input}\n{caret}\n{err}", err = self)
    }
}

/// Top-level error type for tickdigits.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("insufficient history: requested {requested} ticks, have {available}")]
    InsufficientHistory { requested: usize, available: usize },

    #[error("malformed quote for {symbol}: {raw:?}")]
    MalformedQuote { symbol: String, raw: String },

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error(transparent)]
    QueryParse(#[from] ParseError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("tick data error: {reason}")]
    TickData { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TickError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TickError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl From<&TickError> for std::process::ExitCode {
    fn from(err: &TickError) -> Self {
        let code: u8 = match err {
            TickError::Io(_) => 1,
            TickError::ConfigParse { .. }
            | TickError::ConfigMissing { .. }
            | TickError::ConfigInvalid { .. } => 2,
            TickError::TickData { .. }
            | TickError::MalformedQuote { .. }
            | TickError::UnknownSymbol { .. } => 3,
            TickError::QueryParse(_) | TickError::InvalidArgument { .. } => 4,
            TickError::InsufficientHistory { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
