use thiserror::Error;

/// Returned by [`Coalescer::schedule_in`](super::Coalescer::schedule_in)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The delay string is neither a shorthand duration nor a millisecond count
    #[error("Invalid delay: '{0}'")]
    InvalidDuration(String),
}

#[cfg(test)]
mod tests {
    use super::ScheduleError;

    #[test]
    fn converts_into_boxed_error_with_message() {
        let err: Box<dyn std::error::Error> = ScheduleError::InvalidDuration("5 S".to_string()).into();
        assert_eq!(err.to_string(), "Invalid delay: '5 S'");
    }
}
