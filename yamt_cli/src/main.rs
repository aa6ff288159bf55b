use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use yamt_cli::Commands;
use yamt_cli::ShowFormat;
use yamt_cli::YamtCli;
use yamt_core::AnyEmptyResult;
use yamt_core::AnyResult;
use yamt_core::ClassEntry;
use yamt_core::COMMENT_MARKER;
use yamt_core::MethodEntry;
use yamt_core::Node;
use yamt_core::ProjectDescriptor;
use yamt_core::TriggerType;
use yamt_core::YamtConfig;
use yamt_core::YamtError;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "YAMT_LOG";

static USE_COLOR: AtomicBool = AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(Ordering::Relaxed)
}

/// Apply an `owo_colors` style only when color is enabled.
macro_rules! colored {
	($text:expr, $style:ident) => {
		if color_enabled() {
			format!("{}", $text.$style())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = YamtCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	USE_COLOR.store(use_color, Ordering::Relaxed);

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Fmt { check, diff }) => run_fmt(&args, *check, *diff),
		Some(Commands::Show { format }) => run_show(&args, *format).map(|()| true),
		Some(Commands::Add {
			parent,
			key,
			value,
			comment,
		}) => {
			run_add(
				&args,
				parent,
				key,
				value.as_deref(),
				comment.as_deref(),
			)
			.map(|()| true)
		}
		Some(Commands::AddClass {
			class_path,
			trigger,
			methods,
		}) => run_add_class(&args, class_path, *trigger, methods).map(|()| true),
		Some(Commands::Info) => run_info(&args).map(|()| true),
		None => {
			eprintln!("No subcommand specified. Run `yamt --help` for usage.");
			process::exit(2);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			match e.downcast::<YamtError>() {
				Ok(yamt_err) => {
					let report: miette::Report = (*yamt_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `YAMT_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &YamtCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// The `--file` descriptor, with relative paths taken from the project root.
fn explicit_file(args: &YamtCli, root: &Path) -> Option<PathBuf> {
	args.file.as_ref().map(|file| root.join(file))
}

fn load_descriptor(args: &YamtCli) -> AnyResult<ProjectDescriptor> {
	let root = resolve_root(args);
	let config = YamtConfig::load_or_default(&root)?;

	let descriptor = match explicit_file(args, &root) {
		Some(file) => {
			ProjectDescriptor::load(file, config.max_file_size)?
				.with_render_options(config.format.clone())
		}
		None => ProjectDescriptor::discover(&root, &config)?,
	};
	tracing::debug!(path = %descriptor.path().display(), "loaded descriptor");

	Ok(descriptor)
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<16} {value}");
}

/// Returns `false` when `--check` finds a descriptor that is not formatted.
fn run_fmt(args: &YamtCli, check: bool, diff: bool) -> AnyResult<bool> {
	let mut descriptor = load_descriptor(args)?;
	let root = resolve_root(args);
	let display = make_relative(descriptor.path(), &root);
	let rendered = descriptor.render();

	if rendered == descriptor.source() {
		println!(
			"{} {display} is already formatted.",
			colored!("✓", green)
		);
		return Ok(true);
	}

	if diff {
		print_diff(descriptor.source(), &rendered);
	}

	if check {
		eprintln!(
			"{} {display} is not formatted. Run `yamt fmt` to rewrite it.",
			colored!("✗", red)
		);
		return Ok(false);
	}

	descriptor.save()?;
	println!("{} Formatted {display}.", colored!("✓", green));

	Ok(true)
}

fn run_show(args: &YamtCli, format: ShowFormat) -> AnyEmptyResult {
	let descriptor = load_descriptor(args)?;

	match format {
		ShowFormat::Json => {
			println!("{}", serde_json::to_string_pretty(descriptor.tree())?);
		}
		ShowFormat::Text => {
			for (depth, node) in descriptor.tree().walk() {
				let indent = "  ".repeat(depth);
				if node.is_container() {
					println!("{indent}{}:", colored!(node.key, bold));
				} else {
					println!("{indent}{}: {}", colored!(node.key, bold), node.value_str());
				}
			}
		}
	}

	Ok(())
}

fn run_add(
	args: &YamtCli,
	parent: &str,
	key: &str,
	value: Option<&str>,
	comment: Option<&str>,
) -> AnyEmptyResult {
	let mut descriptor = load_descriptor(args)?;

	let mut node = Node::new(key, value.unwrap_or_default());
	if let Some(comment) = comment {
		node = node.with_inline_comment(as_comment(comment));
	}

	descriptor.tree_mut().graft(parent, node)?;
	descriptor.save()?;

	let parent = if parent.trim_matches('.').is_empty() {
		"the top level"
	} else {
		parent
	};
	println!("{} Added `{}` under {parent}.", colored!("✓", green), key.trim());

	Ok(())
}

fn run_add_class(
	args: &YamtCli,
	path: &str,
	trigger: TriggerType,
	methods: &[MethodEntry],
) -> AnyEmptyResult {
	let mut descriptor = load_descriptor(args)?;

	let entry = methods
		.iter()
		.cloned()
		.fold(ClassEntry::new(path, trigger), ClassEntry::with_method);

	if !descriptor.graft_class(&entry)? {
		println!(
			"{} Class {} is already listed.",
			colored!("•", yellow),
			entry.path
		);
		return Ok(());
	}

	descriptor.save()?;
	println!(
		"{} Added class {} ({trigger}).",
		colored!("✓", green),
		entry.path
	);

	Ok(())
}

fn run_info(args: &YamtCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config_path = YamtConfig::resolve_path(&root);
	let config = YamtConfig::load_or_default(&root)?;
	let descriptor_path =
		explicit_file(args, &root).unwrap_or_else(|| config.descriptor_path(&root));

	print_section("Project");
	print_field("Root", root.display());
	print_field(
		"Config",
		config_path.map_or_else(|| "none".to_string(), |path| make_relative(&path, &root)),
	);
	print_field("Max file size", format!("{} bytes", config.max_file_size));
	print_field(
		"Comment padding",
		config.format.inline_comment_padding,
	);

	print_section("Descriptor");
	print_field("Path", make_relative(&descriptor_path, &root));

	if !descriptor_path.is_file() {
		print_field("Status", colored!("missing", yellow));
		return Ok(());
	}

	let descriptor = load_descriptor(args)?;
	let tree = descriptor.tree();
	print_field("Entries", tree.root.descendant_count());
	print_field("Classes", descriptor.class_paths().len());
	print_field("End comments", tree.end_comments.len());
	print_field(
		"Formatted",
		if descriptor.is_canonical() {
			colored!("yes", green)
		} else {
			colored!("no", yellow)
		},
	);

	Ok(())
}

/// Prefix `text` with a comment marker unless it already has one.
fn as_comment(text: &str) -> String {
	let text = text.trim();
	if text.starts_with(COMMENT_MARKER) {
		text.to_string()
	} else {
		format!("{COMMENT_MARKER} {text}")
	}
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
