//! Error codes shared by every layer of the viewer.

use canvas::render::RenderError;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::SessionError;
use crate::source::ContainerError;

/// Grepable error code and retryable flag for logged failures.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

impl ErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        RenderError::error_code(self)
    }
}

/// Top-level failure of one CLI invocation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("no diagram was rendered")]
    NothingRendered,
}

impl ErrorCode for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Container(e) => e.error_code(),
            Self::Api(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Io(_) => "E_IO",
            Self::NothingRendered => "E_NOTHING_RENDERED",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.retryable(),
            Self::Session(e) => e.retryable(),
            _ => false,
        }
    }
}
