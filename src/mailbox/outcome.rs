use crate::error::{AppError, AppResult};

/// Result of a public mailbox operation. Failures are already logged by the
/// time an `Outcome` reaches the caller.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    Success(T),
    Failure(AppError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AppError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.success().unwrap_or(default)
    }

    pub fn into_result(self) -> AppResult<T> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

impl<T> From<AppResult<T>> for Outcome<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}
