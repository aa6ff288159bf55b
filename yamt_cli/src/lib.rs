use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use yamt_core::MethodEntry;
use yamt_core::TriggerType;
use yamt_core::YamtError;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Format and edit project descriptor files without losing their comments.",
	long_about = "yamt reads a project descriptor (project.yaml by default), keeps every comment \
	              and blank line, and writes it back in a canonical layout.\n\nQuick start:\n  \
	              yamt fmt         Rewrite the descriptor in canonical form\n  yamt fmt --check \
	              Fail when the descriptor is not formatted\n  yamt show        Print the \
	              parsed entries\n  yamt add-class   Register a class in the descriptor"
)]
pub struct YamtCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Path to the descriptor file. Overrides `descriptor` in yamt.toml.
	#[arg(long, short, global = true)]
	pub file: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Rewrite the descriptor in canonical form.
	///
	/// Entries are re-indented from their nesting (four columns per
	/// container level, sequence items hanging two columns left) while all
	/// comments and blank lines are kept.
	Fmt {
		/// Do not write anything. Exit with status 1 when the descriptor is
		/// not already formatted.
		#[arg(long, default_value_t = false)]
		check: bool,

		/// Print a diff between the current and the formatted descriptor.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Print the parsed descriptor.
	Show {
		/// Output format. Use `text` for an outline or `json` for the full
		/// tree including comments.
		#[arg(long, value_enum, default_value_t = ShowFormat::Text)]
		format: ShowFormat,
	},
	/// Add an entry under an existing container and save the descriptor.
	///
	/// PARENT is a dot-separated key path such as `backend.scripts`; use `.`
	/// for the top level. Without VALUE the new entry is an empty container.
	Add {
		/// Container to add the entry to.
		parent: String,
		/// Key of the new entry.
		key: String,
		/// Scalar value of the new entry.
		value: Option<String>,
		/// Inline comment for the new entry. A leading `#` is added when
		/// missing.
		#[arg(long)]
		comment: Option<String>,
	},
	/// Register a class under `classes` and save the descriptor.
	///
	/// Does nothing when a class with the same path is already listed.
	AddClass {
		/// Path of the class source file, relative to the project.
		#[arg(value_name = "PATH")]
		class_path: String,
		/// How the class is invoked.
		#[arg(long = "type", default_value = "jsonrpc")]
		trigger: TriggerType,
		/// A method to list, as `NAME`, `NAME:TYPE` or `NAME:cron:SCHEDULE`.
		/// Can be repeated.
		#[arg(long = "method", value_parser = parse_method)]
		methods: Vec<MethodEntry>,
	},
	/// Print the resolved config and descriptor locations.
	Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShowFormat {
	/// An indented outline of keys and values.
	Text,
	/// The full tree as JSON.
	Json,
}

/// Parse a `--method` argument.
pub fn parse_method(value: &str) -> Result<MethodEntry, YamtError> {
	let mut segments = value.splitn(3, ':').map(str::trim);
	let name = segments.next().unwrap_or_default();
	if name.is_empty() {
		return Err(YamtError::EmptyValue {
			key: "method".to_string(),
		});
	}

	let trigger = match segments.next() {
		Some(trigger) if !trigger.is_empty() => trigger.parse()?,
		_ => TriggerType::default(),
	};
	let method = MethodEntry::new(name, trigger);

	Ok(match segments.next().filter(|schedule| !schedule.is_empty()) {
		Some(schedule) => method.with_cron_string(schedule),
		None => method,
	})
}
