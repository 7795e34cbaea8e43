/// Failures talking to the spreadsheet service.
///
/// These never reach a client: the resolver logs them and degrades to an
/// empty result.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
