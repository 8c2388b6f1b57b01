/// Process-level error: a message plus the exit code `qc` should return.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Everything that can go wrong between "user pressed Enter" and "series ready".
///
/// The UI never distinguishes these; it shows `Display` in the error region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// The symbol input was empty after trimming.
    #[error("Please enter a stock symbol")]
    EmptySymbol,
    /// The quote service answered with a non-success HTTP status.
    #[error("Failed to fetch data: {status}")]
    Fetch { status: u16 },
    /// The envelope carried no result entry (typically an unknown symbol).
    #[error("No data available for this stock symbol")]
    DataUnavailable,
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),
    /// The body was not a chart envelope.
    #[error("Failed to parse quote response: {0}")]
    Decode(String),
}

impl QuoteError {
    pub fn is_validation(&self) -> bool {
        matches!(self, QuoteError::EmptySymbol)
    }
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        let code = if err.is_validation() { 2 } else { 4 };
        AppError::new(code, err.to_string())
    }
}
