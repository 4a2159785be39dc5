use crate::{
    access::AccessError,
    dto::error::{Error, ErrorCode},
};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured error used between layers. Never crosses the Candid boundary:
/// endpoints convert it into the public `dto::error::Error` envelope.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    class: InternalErrorClass,
    origin: InternalErrorOrigin,
    code: ErrorCode,
    message: String,
}

impl InternalError {
    pub fn new(
        class: InternalErrorClass,
        origin: InternalErrorOrigin,
        message: impl Into<String>,
    ) -> Self {
        Self {
            class,
            origin,
            code: class.default_code(),
            message: message.into(),
        }
    }

    pub fn domain(origin: InternalErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(InternalErrorClass::Domain, origin, message)
    }

    pub fn invariant(origin: InternalErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(InternalErrorClass::Invariant, origin, message)
    }

    pub fn infra(origin: InternalErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(InternalErrorClass::Infra, origin, message)
    }

    pub fn ops(origin: InternalErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(InternalErrorClass::Ops, origin, message)
    }

    pub fn workflow(origin: InternalErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(InternalErrorClass::Workflow, origin, message)
    }

    /// Override the public code derived from the class.
    #[must_use]
    pub const fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    #[must_use]
    pub const fn class(&self) -> InternalErrorClass {
        self.class
    }

    #[must_use]
    pub const fn origin(&self) -> InternalErrorOrigin {
        self.origin
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }
}

impl From<AccessError> for InternalError {
    fn from(err: AccessError) -> Self {
        Self::new(
            InternalErrorClass::Access,
            InternalErrorOrigin::Access,
            err.to_string(),
        )
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.code, err.message)
    }
}

///
/// InternalErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum InternalErrorClass {
    Access,
    Domain,
    Infra,
    Ops,
    Workflow,
    Invariant,
}

impl InternalErrorClass {
    const fn default_code(self) -> ErrorCode {
        match self {
            Self::Access => ErrorCode::Unauthorized,
            Self::Domain => ErrorCode::InvalidInput,
            Self::Invariant => ErrorCode::InvariantViolation,
            Self::Infra | Self::Ops | Self::Workflow => ErrorCode::Internal,
        }
    }
}

///
/// InternalErrorOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum InternalErrorOrigin {
    Access,
    Config,
    Domain,
    Infra,
    Ops,
    Storage,
    Workflow,
}

///
/// TESTS
///
