use crate::{config::ConfigError, isr::IsrError, trace::TraceWriteError};

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Isr(#[from] IsrError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Write(#[from] TraceWriteError),

    #[error("{msg} >> {err}")]
    Context { msg: String, err: Box<dyn std::error::Error> }
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Attach a human readable step to a failing `Result`
pub trait ErrorContext<T>: Sized {
    /// `f` runs only when `self` is an error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> TraceResult<T>;

    fn context<S: Into<String>>(self, msg: S) -> TraceResult<T> {
        self.with_context(move || msg)
    }
}

impl<T, E: std::error::Error + 'static> ErrorContext<T> for Result<T, E> {
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> TraceResult<T> {
        self.map_err(|err| TraceError::Context { msg: f().into(), err: Box::new(err) })
    }
}
