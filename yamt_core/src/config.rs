use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::RenderOptions;
use crate::YamtError;
use crate::YamtResult;

/// Default maximum descriptor size in bytes (1 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["yamt.toml", ".config/yamt.toml"];

/// Descriptor file names tried when the config does not name one.
pub const DESCRIPTOR_FILE_CANDIDATES: [&str; 2] = ["project.yaml", "project.yml"];

/// Configuration loaded from a `yamt.toml` file.
///
/// ```toml
/// descriptor = "deploy/project.yaml"
/// max_file_size = 1048576
///
/// [format]
/// inline_comment_padding = 8
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct YamtConfig {
	/// Path to the project descriptor, relative to the project root. When
	/// absent the first existing [`DESCRIPTOR_FILE_CANDIDATES`] entry is
	/// used.
	#[serde(default)]
	pub descriptor: Option<PathBuf>,
	/// Descriptors larger than this many bytes are rejected. Defaults to 1
	/// MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// Output layout options.
	#[serde(default)]
	pub format: RenderOptions,
}

impl Default for YamtConfig {
	fn default() -> Self {
		Self {
			descriptor: None,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			format: RenderOptions::default(),
		}
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl YamtConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> YamtResult<Option<YamtConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: YamtConfig =
			toml::from_str(&content).map_err(|e| YamtError::ConfigParse(e.to_string()))?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Like [`YamtConfig::load`], falling back to the defaults when no config
	/// file exists.
	pub fn load_or_default(root: &Path) -> YamtResult<YamtConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// The descriptor path for a project rooted at `root`.
	///
	/// An explicitly configured path is returned as is (joined to `root`),
	/// even when the file does not exist. Otherwise the first existing
	/// candidate wins, falling back to the first candidate name.
	pub fn descriptor_path(&self, root: &Path) -> PathBuf {
		if let Some(descriptor) = &self.descriptor {
			return root.join(descriptor);
		}

		DESCRIPTOR_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
			.unwrap_or_else(|| root.join(DESCRIPTOR_FILE_CANDIDATES[0]))
	}
}
