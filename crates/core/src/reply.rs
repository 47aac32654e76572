//! Evaluation replies
//!
//! A [`Reply`] is the decoded value the backend sends back for an `eval`.
//! The executor does not interpret replies beyond two questions: does the
//! value carry the `try-error` class, and what strings does it hold. The
//! remaining accessors exist for callers that do look inside.
//!
//! ## Shape
//!
//! - `data`: one of the backend's vector types, or a list of replies
//! - `classes`: the value's class attribute, in declaration order
//!
//! Missing values (`NA`) are `None` in the logical, integer and string
//! vectors. Doubles keep `NA` as a NaN payload like the backend does.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::TRY_ERROR_CLASS;

/// Payload of an evaluation reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplyData {
    /// `NULL`
    Null,
    /// Logical vector
    Logical(Vec<Option<bool>>),
    /// Integer vector
    Integer(Vec<Option<i32>>),
    /// Double vector
    Double(Vec<f64>),
    /// Character vector
    Strings(Vec<Option<String>>),
    /// Raw byte vector
    Raw(Vec<u8>),
    /// Generic vector of nested replies
    List(Vec<Reply>),
}

/// A reply could not be viewed as the requested type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reply mismatch: expected {expected}, got {actual}")]
pub struct ReplyMismatch {
    /// Type the caller asked for
    pub expected: &'static str,
    /// Type the reply actually holds
    pub actual: &'static str,
}

/// Decoded value returned by the backend for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    data: ReplyData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    classes: Vec<String>,
}

impl Reply {
    /// Create a reply without a class attribute
    pub fn new(data: ReplyData) -> Self {
        Reply {
            data,
            classes: Vec::new(),
        }
    }

    /// `NULL`
    pub fn null() -> Self {
        Reply::new(ReplyData::Null)
    }

    /// Logical vector without missing values
    pub fn logical(values: impl IntoIterator<Item = bool>) -> Self {
        Reply::new(ReplyData::Logical(values.into_iter().map(Some).collect()))
    }

    /// Integer vector without missing values
    pub fn integer(values: impl IntoIterator<Item = i32>) -> Self {
        Reply::new(ReplyData::Integer(values.into_iter().map(Some).collect()))
    }

    /// Double vector
    pub fn double(values: impl IntoIterator<Item = f64>) -> Self {
        Reply::new(ReplyData::Double(values.into_iter().collect()))
    }

    /// Character vector without missing values
    pub fn strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Reply::new(ReplyData::Strings(
            values.into_iter().map(|s| Some(s.into())).collect(),
        ))
    }

    /// Raw byte vector
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Reply::new(ReplyData::Raw(bytes.into()))
    }

    /// Generic vector
    pub fn list(items: impl IntoIterator<Item = Reply>) -> Self {
        Reply::new(ReplyData::List(items.into_iter().collect()))
    }

    /// What the trap envelope returns when the wrapped expression fails
    ///
    /// A character vector of the error messages with class `try-error`.
    pub fn try_error<S: Into<String>>(messages: impl IntoIterator<Item = S>) -> Self {
        Reply::strings(messages).with_class(TRY_ERROR_CLASS)
    }

    /// Append a class to the class attribute
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Payload of the reply
    pub fn data(&self) -> &ReplyData {
        &self.data
    }

    /// Class attribute of the reply
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check whether the class attribute contains `class`
    pub fn inherits(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Check whether this reply is an error caught by the trap envelope
    pub fn is_try_error(&self) -> bool {
        self.inherits(TRY_ERROR_CLASS)
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self.data {
            ReplyData::Null => "Null",
            ReplyData::Logical(_) => "Logical",
            ReplyData::Integer(_) => "Integer",
            ReplyData::Double(_) => "Double",
            ReplyData::Strings(_) => "Strings",
            ReplyData::Raw(_) => "Raw",
            ReplyData::List(_) => "List",
        }
    }

    /// View the reply as strings, rendering missing values as `NA`
    pub fn as_strings(&self) -> Result<Vec<String>, ReplyMismatch> {
        match &self.data {
            ReplyData::Strings(values) => Ok(values
                .iter()
                .map(|v| v.clone().unwrap_or_else(|| "NA".to_string()))
                .collect()),
            _ => Err(self.mismatch("Strings")),
        }
    }

    /// View a length-one logical reply as a bool
    ///
    /// The load commands wrap their assignment in `is.null(...)`, so a
    /// successful load answers with a single `FALSE`.
    pub fn as_bool(&self) -> Result<bool, ReplyMismatch> {
        match &self.data {
            ReplyData::Logical(values) if values.len() == 1 => {
                values[0].ok_or_else(|| self.mismatch("Logical (non-NA)"))
            }
            _ => Err(self.mismatch("Logical of length 1")),
        }
    }

    /// Check if this is `NULL`
    pub fn is_null(&self) -> bool {
        matches!(self.data, ReplyData::Null)
    }

    fn mismatch(&self, expected: &'static str) -> ReplyMismatch {
        ReplyMismatch {
            expected,
            actual: self.type_name(),
        }
    }
}
