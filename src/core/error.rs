//! Typed errors for resolver construction and argument handling
//!
//! Two families are exposed:
//!
//! - [`ConfigError`]: raised while building a resolver or loading its
//!   options. These are fatal; a field that fails to build must not be
//!   registered.
//! - [`ArgumentError`]: raised while applying a runtime argument value to a
//!   query (e.g. an unknown sort value).
//!
//! Failures reported by a data source are not wrapped here; they travel as
//! `anyhow::Error` exactly as the data source produced them.

use thiserror::Error;

/// Errors raised at construction time
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The data-source handle is missing a model name or schema
    #[error("not a valid data-source handle: {reason}")]
    InvalidDataSource { reason: String },

    /// The output type is not a usable object type
    #[error("not a valid output type '{type_name}': {reason}")]
    InvalidOutputType { type_name: String, reason: String },

    /// An option holds a value the resolver cannot use
    #[error("invalid resolver option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    /// Failed to parse an options document
    #[error("failed to parse resolver options{}: {message}", file_suffix(.file))]
    Parse {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading an options file
    #[error("failed to read resolver options '{path}': {message}")]
    Io { path: String, message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" '{}'", f))
        .unwrap_or_default()
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidDataSource { .. } => "INVALID_DATA_SOURCE",
            ConfigError::InvalidOutputType { .. } => "INVALID_OUTPUT_TYPE",
            ConfigError::InvalidOption { .. } => "INVALID_OPTION",
            ConfigError::Parse { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
        }
    }

    pub(crate) fn invalid_data_source(reason: impl Into<String>) -> Self {
        ConfigError::InvalidDataSource {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_output_type(
        type_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidOutputType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while applying runtime argument values
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// The value does not fit the argument's type
    #[error("invalid value for argument '{argument}': {message}")]
    InvalidValue { argument: String, message: String },
}

impl ArgumentError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ArgumentError::InvalidValue { .. } => "INVALID_ARGUMENT",
        }
    }

    pub(crate) fn invalid_value(argument: impl Into<String>, message: impl Into<String>) -> Self {
        ArgumentError::InvalidValue {
            argument: argument.into(),
            message: message.into(),
        }
    }
}
