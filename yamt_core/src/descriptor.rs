use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::MetadataTree;
use crate::Node;
use crate::RenderOptions;
use crate::YamtConfig;
use crate::YamtError;
use crate::YamtResult;

/// Top-level key holding the deployed classes.
pub const CLASSES_KEY: &str = "classes";
/// Sequence item key that starts a class entry.
pub const CLASS_PATH_KEY: &str = "- path";
/// Sequence item key that starts a method entry.
pub const METHOD_NAME_KEY: &str = "- name";
pub const TYPE_KEY: &str = "type";
pub const METHODS_KEY: &str = "methods";
pub const CRON_STRING_KEY: &str = "cronString";

/// How a deployed class or method is invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TriggerType {
	#[default]
	Jsonrpc,
	Http,
	Cron,
}

impl TriggerType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Jsonrpc => "jsonrpc",
			Self::Http => "http",
			Self::Cron => "cron",
		}
	}
}

impl fmt::Display for TriggerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TriggerType {
	type Err = YamtError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"jsonrpc" => Ok(Self::Jsonrpc),
			"http" => Ok(Self::Http),
			"cron" => Ok(Self::Cron),
			_ => Err(YamtError::InvalidTriggerType(value.to_string())),
		}
	}
}

/// A method discovered on a deployed class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEntry {
	pub name: String,
	#[serde(default, rename = "type")]
	pub trigger: TriggerType,
	#[serde(default)]
	pub cron_string: Option<String>,
}

impl MethodEntry {
	pub fn new(name: impl Into<String>, trigger: TriggerType) -> Self {
		Self {
			name: name.into(),
			trigger,
			cron_string: None,
		}
	}

	#[must_use]
	pub fn with_cron_string(mut self, cron_string: impl Into<String>) -> Self {
		self.cron_string = Some(cron_string.into());
		self
	}

	fn append_to(&self, methods: &mut Node) -> YamtResult<()> {
		if self.name.trim().is_empty() {
			return Err(YamtError::EmptyValue {
				key: METHOD_NAME_KEY.to_string(),
			});
		}

		methods.push_child(Node::new(METHOD_NAME_KEY, self.name.trim()))?;
		methods.push_child(Node::new(TYPE_KEY, self.trigger.as_str()))?;

		if let Some(cron_string) = self
			.cron_string
			.as_deref()
			.map(str::trim)
			.filter(|value| !value.is_empty())
		{
			methods.push_child(Node::new(CRON_STRING_KEY, cron_string))?;
		}

		Ok(())
	}
}

/// A class inferred by an external scanner that should be listed in the
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
	pub path: String,
	#[serde(default, rename = "type")]
	pub trigger: TriggerType,
	#[serde(default)]
	pub methods: Vec<MethodEntry>,
}

impl ClassEntry {
	pub fn new(path: impl Into<String>, trigger: TriggerType) -> Self {
		Self {
			path: path.into(),
			trigger,
			methods: vec![],
		}
	}

	#[must_use]
	pub fn with_method(mut self, method: MethodEntry) -> Self {
		self.methods.push(method);
		self
	}
}

/// A project descriptor file loaded into a [`MetadataTree`].
///
/// The descriptor keeps the text it was loaded from so callers can tell
/// whether rendering would change the file.
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
	path: PathBuf,
	source: String,
	tree: MetadataTree,
	options: RenderOptions,
}

impl ProjectDescriptor {
	/// Read and parse the descriptor at `path`.
	#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
	pub fn load(path: impl AsRef<Path>, max_file_size: u64) -> YamtResult<Self> {
		let path = path.as_ref();
		let display = path.display().to_string();

		let metadata = match std::fs::metadata(path) {
			Ok(metadata) => metadata,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				return Err(YamtError::DescriptorNotFound { path: display });
			}
			Err(e) => {
				return Err(YamtError::DescriptorRead {
					path: display,
					reason: e.to_string(),
				});
			}
		};

		if metadata.len() > max_file_size {
			return Err(YamtError::FileTooLarge {
				path: display,
				size: metadata.len(),
				limit: max_file_size,
			});
		}

		let source = std::fs::read_to_string(path).map_err(|e| {
			YamtError::DescriptorRead {
				path: display,
				reason: e.to_string(),
			}
		})?;

		Ok(Self::from_source(path, source))
	}

	/// Locate the descriptor for the project at `root` using `config` and load
	/// it. The config's format options are used when rendering.
	pub fn discover(root: &Path, config: &YamtConfig) -> YamtResult<Self> {
		let path = config.descriptor_path(root);
		let descriptor = Self::load(path, config.max_file_size)?;

		Ok(descriptor.with_render_options(config.format.clone()))
	}

	/// Build a descriptor from text that is (or will be) stored at `path`.
	pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
		let source = source.into();
		let tree = MetadataTree::parse(&source);

		Self {
			path: path.into(),
			source,
			tree,
			options: RenderOptions::default(),
		}
	}

	#[must_use]
	pub fn with_render_options(mut self, options: RenderOptions) -> Self {
		self.options = options;
		self
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The text the descriptor was loaded from.
	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn tree(&self) -> &MetadataTree {
		&self.tree
	}

	pub fn tree_mut(&mut self) -> &mut MetadataTree {
		&mut self.tree
	}

	pub fn render(&self) -> String {
		self.tree.render_with_options(&self.options)
	}

	/// Returns `true` when rendering the tree reproduces the source text
	/// exactly.
	pub fn is_canonical(&self) -> bool {
		self.render() == self.source
	}

	/// The `path` values of every class listed under `classes`, in order.
	pub fn class_paths(&self) -> Vec<&str> {
		self.tree
			.get(CLASSES_KEY)
			.map(|classes| {
				classes
					.find_all(CLASS_PATH_KEY)
					.map(Node::value_str)
					.collect()
			})
			.unwrap_or_default()
	}

	/// Returns `true` if a class with an equivalent path is already listed.
	pub fn has_class(&self, path: &str) -> bool {
		let wanted = normalize_class_path(path);
		self.class_paths()
			.into_iter()
			.any(|existing| normalize_class_path(existing) == wanted)
	}

	/// Append `entry` to the `classes` list, creating the list when the
	/// descriptor has none. Returns `false` without changing anything when the
	/// class is already listed.
	pub fn graft_class(&mut self, entry: &ClassEntry) -> YamtResult<bool> {
		let path = entry.path.trim();
		if path.is_empty() {
			return Err(YamtError::EmptyValue {
				key: CLASS_PATH_KEY.to_string(),
			});
		}

		if self.has_class(path) {
			tracing::debug!(path, "class already listed");
			return Ok(false);
		}

		let mut entries = vec![
			Node::new(CLASS_PATH_KEY, path),
			Node::new(TYPE_KEY, entry.trigger.as_str()),
		];

		if !entry.methods.is_empty() {
			let mut methods = Node::container(METHODS_KEY);
			for method in &entry.methods {
				method.append_to(&mut methods)?;
			}
			entries.push(methods);
		}
		entries.iter().try_for_each(Node::validate)?;

		if self.tree.get(CLASSES_KEY).is_none() {
			self.tree.push(Node::container(CLASSES_KEY))?;
		}

		let classes = self
			.tree
			.get_mut(CLASSES_KEY)
			.ok_or_else(|| YamtError::MissingNode {
				path: CLASSES_KEY.to_string(),
			})?;
		if !classes.is_container() {
			return Err(YamtError::NotAContainer {
				key: CLASSES_KEY.to_string(),
			});
		}

		for node in entries {
			classes.push_child(node)?;
		}

		tracing::info!(path, trigger = %entry.trigger, methods = entry.methods.len(), "added class to descriptor");

		Ok(true)
	}

	/// Write the rendered tree back to the descriptor's path.
	pub fn save(&mut self) -> YamtResult<()> {
		let rendered = self.render();
		std::fs::write(&self.path, &rendered)?;
		tracing::debug!(path = %self.path.display(), bytes = rendered.len(), "saved descriptor");
		self.source = rendered;

		Ok(())
	}
}

/// Normalize a class path for comparison: surrounding quotes, a leading `./`
/// and Windows separators are ignored.
pub fn normalize_class_path(path: &str) -> String {
	let path = path.trim().trim_matches(|c| c == '"' || c == '\'');
	let path = path.replace('\\', "/");
	let mut path = path.as_str();
	while let Some(rest) = path.strip_prefix("./") {
		path = rest;
	}
	path.to_string()
}
