//! Backend command grammar.
//!
//! Every command the executor sends is built here, so the exact R text lives
//! in one place. Commands are:
//! - **Rendered by `Display`**: `Command::to_string()` is the text sent to R
//! - **Quoted**: caller-supplied names go through [`string_literal`]
//! - **Unwrapped**: the trap envelope is applied by [`trap`] at send time

use std::fmt;

/// A backend command built by the executor.
///
/// | Variant | Rendered as |
/// |---------|-------------|
/// | `SaveImage` | `base::save.image()` |
/// | `LoadImage` | `base::load(file='<file>', envir=<envir>)` |
/// | `ReadParquet` | `is.null(base::assign('<symbol>', value={arrow::read_parquet('<file>'...)}))` |
/// | `ReadResource` | `is.null(base::assign('<symbol>', value={resourcer::newResourceClient(base::readRDS('<file>'))}))` |
/// | `Unlink` | `base::unlink('<file>')` |
///
/// The `is.null(...)` wrapper makes the load commands answer with a single
/// logical instead of shipping the loaded value back over the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Serialize the whole session state to the workspace file.
    SaveImage,

    /// Deserialize a workspace file into an environment.
    ///
    /// `envir` is an R expression and is emitted verbatim.
    LoadImage {
        /// Workspace file in the scratch directory
        file: &'a str,
        /// Target environment expression
        envir: &'a str,
    },

    /// Bind a parquet file to `symbol`, optionally projecting columns.
    ///
    /// Requested columns missing from the file are skipped rather than
    /// raising, via `tidyselect::any_of`.
    ReadParquet {
        /// Global binding to assign
        symbol: &'a str,
        /// Staged parquet file
        file: &'a str,
        /// Columns to keep; empty keeps all
        columns: &'a [String],
    },

    /// Bind a resource client built from a serialized descriptor to `symbol`.
    ReadResource {
        /// Global binding to assign
        symbol: &'a str,
        /// Staged RDS file
        file: &'a str,
    },

    /// Delete a file from the session's scratch directory.
    Unlink {
        /// File to remove
        file: &'a str,
    },
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SaveImage => f.write_str("base::save.image()"),
            Command::LoadImage { file, envir } => {
                write!(f, "base::load(file={}, envir={})", string_literal(file), envir)
            }
            Command::ReadParquet {
                symbol,
                file,
                columns,
            } => {
                if columns.is_empty() {
                    write!(
                        f,
                        "is.null(base::assign({}, value={{arrow::read_parquet({})}}))",
                        string_literal(symbol),
                        string_literal(file)
                    )
                } else {
                    write!(
                        f,
                        "is.null(base::assign({}, value={{arrow::read_parquet({}, col_select = tidyselect::any_of({}))}}))",
                        string_literal(symbol),
                        string_literal(file),
                        string_vector(*columns)
                    )
                }
            }
            Command::ReadResource { symbol, file } => write!(
                f,
                "is.null(base::assign({}, value={{resourcer::newResourceClient(base::readRDS({}))}}))",
                string_literal(symbol),
                string_literal(file)
            ),
            Command::Unlink { file } => write!(f, "base::unlink({})", string_literal(file)),
        }
    }
}

/// Wrap an expression in the trap envelope: `try({<expr>})`.
///
/// Inside the envelope a runtime error becomes a `try-error` value instead
/// of a protocol fault that would tear the session down.
pub fn trap(expr: &str) -> String {
    format!("try({{{}}})", expr)
}

/// Flatten a logical name into a single scratch-directory file name.
///
/// Every `/` becomes `_`; the scratch directory has no subdirectories.
pub fn remote_file_name(logical: &str) -> String {
    logical.replace('/', "_")
}

/// Render `value` as a single-quoted R string literal.
///
/// Backslash, single quote, newline, carriage return and tab are escaped,
/// so the literal always ends where the executor expects it to.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render names as an R character vector: `c('a','b')`.
pub fn string_vector<S: AsRef<str>>(values: &[S]) -> String {
    if values.is_empty() {
        return "character(0)".to_string();
    }
    let items: Vec<String> = values.iter().map(|v| string_literal(v.as_ref())).collect();
    format!("c({})", items.join(","))
}
