pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Quiz unavailable: {0}")]
    QuizUnavailable(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Index {index} is out of bounds for {len} questions")]
    OutOfBounds { index: usize, len: usize },

    #[error("Attempt has already been submitted")]
    AttemptClosed,

    #[error("Attempt has not been submitted yet")]
    NotSubmitted,

    #[error("Submission gateway returned {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl Error {
    /// Short notice shown to the person taking the quiz.
    pub fn user_message(&self) -> String {
        match self {
            Error::QuizUnavailable(_) | Error::Validation(_) => {
                "This quiz is unavailable right now.".to_string()
            }
            Error::Unauthenticated(_) => "Please log in to save your results.".to_string(),
            Error::OutOfBounds { index, len } => {
                format!("Question {} does not exist (quiz has {}).", index + 1, len)
            }
            Error::AttemptClosed => "This attempt has already been submitted.".to_string(),
            Error::NotSubmitted => "Results are available after submission.".to_string(),
            Error::Gateway { .. } | Error::Timeout(_) | Error::Reqwest(_) => {
                "Submission failed, your results may not be saved.".to_string()
            }
            Error::InvalidCommand(msg) => msg.clone(),
            Error::Config(msg) => format!("Configuration problem: {}", msg),
            _ => "An unexpected error occurred".to_string(),
        }
    }
}
