use crate::types::{Format, Height};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrataError {
    /// The value's type cannot be carried in the format required at this height.
    ///
    /// This is a programming or data-shape error, never transient. Callers must
    /// reject the enclosing transaction or message.
    #[error("Type {type_name} is not {format}-encodable at height {height}")]
    IncompatibleType {
        type_name: &'static str,
        height: Height,
        format: Format,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Interface not registered: {0}")]
    UnregisteredInterface(String),

    #[error("Concrete type '{tag}' not registered for interface {interface} ({format})")]
    UnregisteredConcrete {
        interface: String,
        tag: String,
        format: Format,
    },

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Key must not be empty")]
    EmptyKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// True for errors that mean the input itself is unusable under the
    /// active format (as opposed to misconfiguration of the node).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StrataError::IncompatibleType { .. }
                | StrataError::Decode(_)
                | StrataError::UnregisteredConcrete { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StrataError>;

// Custom Error Types:
//
// Modules built on top of strata can carry their own error enums and convert
// into `StrataError::Other` through `anyhow`, or wrap `StrataError` directly:
//
// #[derive(Error, Debug)]
// pub enum StakingError {
//     #[error("Validator not found: {0}")]
//     ValidatorNotFound(String),
//
//     #[error(transparent)]
//     State(#[from] StrataError),
// }
