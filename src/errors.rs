use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use crate::prompt::errors::UnfilledPlaceholders;

/// Any failure while evaluating a variant. A run that fails produces no partial result.
#[derive(Debug)]
pub enum EvalError {
    /// The inputs lack a value for a template placeholder.
    Template(UnfilledPlaceholders),
    /// A checklist pattern is not a valid regular expression.
    Pattern(regex::Error),
    /// The mock output could not be serialized.
    Serialize(serde_json::Error),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Template(err) => write!(f, "template binding failed: {}", err),
            EvalError::Pattern(err) => write!(f, "invalid checklist pattern: {}", err),
            EvalError::Serialize(err) => write!(f, "failed to serialize output: {}", err),
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EvalError::Template(err) => Some(err),
            EvalError::Pattern(err) => Some(err),
            EvalError::Serialize(err) => Some(err),
        }
    }
}

impl From<UnfilledPlaceholders> for EvalError {
    fn from(err: UnfilledPlaceholders) -> Self {
        EvalError::Template(err)
    }
}

impl From<regex::Error> for EvalError {
    fn from(err: regex::Error) -> Self {
        EvalError::Pattern(err)
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::Serialize(err)
    }
}
