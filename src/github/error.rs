/// Classification of API errors for the traversal failure policies
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRetryableError {
    /// Errors worth requesting again (5xx server errors, network issues, timeouts)
    Retryable(String),
    /// Rate limiting errors (429, or 403 with a rate limit message)
    RateLimit,
    /// Client errors that will fail the same way again (4xx except 429)
    NonRetryable(String),
}

impl ApiRetryableError {
    /// Convert octocrab error to appropriate retry category
    pub fn from_octocrab_error(error: octocrab::Error) -> Self {
        tracing::debug!("Raw octocrab error: {:?}", error);

        match &error {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                let detailed_error = format!(
                    "GitHub API error - Status: {}, Message: {}",
                    status, source.message
                );

                match status {
                    429 => Self::RateLimit,
                    403 if source.message.contains("rate limit") => Self::RateLimit,
                    500..=599 => Self::Retryable(detailed_error),
                    _ => Self::NonRetryable(detailed_error),
                }
            }
            octocrab::Error::Http { .. } | octocrab::Error::Hyper { .. } => {
                Self::Retryable(format!("HTTP layer error: {}", error))
            }
            // Also raised for error pages that are not GitHub JSON, e.g. a gateway 502
            octocrab::Error::Json { .. } | octocrab::Error::Serde { .. } => {
                Self::Retryable(format!("Response parsing error: {}", error))
            }
            octocrab::Error::Uri { .. } => Self::NonRetryable(format!("URI error: {}", error)),
            _ => Self::NonRetryable(format!("Unknown error type: {}", error)),
        }
    }

    /// Classification of an arbitrary error, if it carries one
    pub fn classify(error: &anyhow::Error) -> Option<&Self> {
        error.downcast_ref::<Self>()
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NonRetryable(_))
    }
}

impl std::fmt::Display for ApiRetryableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Retryable(msg) => write!(f, "Retryable error: {}", msg),
            Self::RateLimit => write!(f, "Rate limit error"),
            Self::NonRetryable(msg) => write!(f, "Non-retryable error: {}", msg),
        }
    }
}

impl std::error::Error for ApiRetryableError {}
