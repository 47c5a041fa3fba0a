use crate::github::error::ApiRetryableError;

/// Classifies the `errors` array of a GraphQL response.
///
/// GitHub answers most GraphQL failures with HTTP 200, so the message text is the
/// only signal available.
pub fn classify_graphql_error(error_msg: &str) -> ApiRetryableError {
    if error_msg.contains("rate limit") || error_msg.contains("API rate limit") {
        tracing::warn!("GraphQL rate limit error: {}", error_msg);
        ApiRetryableError::RateLimit
    } else if error_msg.contains("timeout") || error_msg.contains("server error") {
        tracing::warn!("GraphQL server error: {}", error_msg);
        ApiRetryableError::Retryable(format!("GraphQL server error: {}", error_msg))
    } else if error_msg.contains("Could not resolve to an Organization")
        || error_msg.contains("Could not resolve to a User")
    {
        tracing::info!("GraphQL owner not found: {}", error_msg);
        ApiRetryableError::NonRetryable(format!("Owner not found: {}", error_msg))
    } else if error_msg.contains("validation")
        || error_msg.contains("syntax")
        || error_msg.contains("Field '")
    {
        tracing::error!("GraphQL validation error: {}", error_msg);
        ApiRetryableError::NonRetryable(format!("GraphQL validation error: {}", error_msg))
    } else if error_msg.contains("Resource not accessible") || error_msg.contains("scope") {
        ApiRetryableError::NonRetryable(format!("GraphQL permission error: {}", error_msg))
    } else {
        tracing::warn!("Unknown GraphQL error: {}", error_msg);
        ApiRetryableError::Retryable(format!("GraphQL error: {}", error_msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_graphql_error() {
        assert_eq!(
            classify_graphql_error("API rate limit exceeded for user"),
            ApiRetryableError::RateLimit
        );
        assert!(matches!(
            classify_graphql_error("Could not resolve to an Organization with the login of 'x'."),
            ApiRetryableError::NonRetryable(_)
        ));
        assert!(matches!(
            classify_graphql_error("Something went wrong"),
            ApiRetryableError::Retryable(_)
        ));
    }
}
