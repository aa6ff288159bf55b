use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum YamtError {
	#[error(transparent)]
	#[diagnostic(code(yamt::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(yamt::config_parse),
		help("check that yamt.toml is valid TOML with optional `descriptor`, `max_file_size` and [format] entries")
	)]
	ConfigParse(String),

	#[error("project descriptor not found: `{path}`")]
	#[diagnostic(
		code(yamt::descriptor_not_found),
		help("create a project.yaml file or point to one with `--file`")
	)]
	DescriptorNotFound { path: String },

	#[error("failed to read project descriptor `{path}`: {reason}")]
	#[diagnostic(code(yamt::descriptor_read))]
	DescriptorRead { path: String, reason: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(yamt::file_too_large),
		help("increase `max_file_size` in yamt.toml")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("cannot add children to `{key}` because it holds a scalar value")]
	#[diagnostic(
		code(yamt::not_a_container),
		help("only entries written as `{key}:` with nothing after the colon can hold nested entries")
	)]
	NotAContainer { key: String },

	#[error("no entry found at path `{path}`")]
	#[diagnostic(
		code(yamt::missing_node),
		help("paths are dot-separated keys matched from the top level, e.g. `classes` or `backend.scripts`")
	)]
	MissingNode { path: String },

	#[error("entries must have a non-empty key")]
	#[diagnostic(code(yamt::empty_key))]
	EmptyKey,

	#[error("cannot write `{key}`: {reason}")]
	#[diagnostic(
		code(yamt::unsupported_text),
		help("keys and values cannot contain `:`, `#` or line breaks; comments must start with `#` and fit on one line")
	)]
	UnsupportedText { key: String, reason: String },

	#[error("`{key}` requires a non-empty value")]
	#[diagnostic(code(yamt::empty_value))]
	EmptyValue { key: String },

	#[error("unknown trigger type: `{0}`")]
	#[diagnostic(
		code(yamt::invalid_trigger_type),
		help("supported trigger types: jsonrpc, http, cron")
	)]
	InvalidTriggerType(String),
}

pub type YamtResult<T> = Result<T, YamtError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
