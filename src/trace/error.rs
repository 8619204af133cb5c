#[derive(Debug, thiserror::Error)]
pub enum TraceWriteError {
    #[error("instruction written after EOC")]
    WriteAfterEoc,

    #[error("trace closed without EOC")]
    MissingEoc,
}
