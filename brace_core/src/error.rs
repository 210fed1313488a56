use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum BraceError {
	#[error(transparent)]
	#[diagnostic(code(brace::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(brace::config_parse),
		help("check that brace.toml is valid TOML with an optional `now` key and a [nodes] section")
	)]
	ConfigParse(String),

	#[error("failed to load node data file `{path}`: {reason}")]
	#[diagnostic(code(brace::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported node data format: `{0}`")]
	#[diagnostic(
		code(brace::unsupported_format),
		help("supported formats: text, json, toml, yaml, yml, kdl, ini")
	)]
	UnsupportedDataFormat(String),

	#[error("unconvertible float value in node data file `{path}`: {value}")]
	#[diagnostic(
		code(brace::unconvertible_float),
		help("NaN and Infinity are not valid JSON numbers")
	)]
	UnconvertibleFloat { path: String, value: String },

	#[error("invalid node name: `{0}`")]
	#[diagnostic(
		code(brace::node_name),
		help("node names must start with a letter, `_` or `$` and contain only letters, digits, `_` or `$`")
	)]
	InvalidNodeName(String),

	#[error("invalid node argument: `{0}`")]
	#[diagnostic(code(brace::node_argument), help("use the form `--node Name=path/to/data.json`"))]
	InvalidNodeArgument(String),

	#[error("invalid timestamp for `now`: `{0}`")]
	#[diagnostic(
		code(brace::invalid_timestamp),
		help("use an RFC 3339 timestamp such as `2024-01-01T00:00:00Z`")
	)]
	InvalidTimestamp(String),
}

/// A failure while tokenizing, parsing or interpreting a single snippet.
///
/// These never escape the public `evaluate` / `validate` operations. The
/// `Display` output is the bare message placed inside an `[Error: ...]`
/// marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EvalError {
	/// The snippet is not a well-formed expression.
	#[error("{message}")]
	Syntax { message: String, offset: usize },
	/// An unknown identifier or an invalid operation at evaluation time.
	#[error("{0}")]
	Resolution(String),
}

impl EvalError {
	pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
		Self::Syntax {
			message: message.into(),
			offset,
		}
	}

	pub fn resolution(message: impl Into<String>) -> Self {
		Self::Resolution(message.into())
	}

	pub fn is_syntax(&self) -> bool {
		matches!(self, Self::Syntax { .. })
	}
}

pub type BraceResult<T> = Result<T, BraceError>;
pub type EvalResult<T> = Result<T, EvalError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
