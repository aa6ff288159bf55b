use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::Node;
use crate::RenderOptions;
use crate::Trivia;
use crate::Walk;
use crate::YamtError;
use crate::YamtResult;
use crate::parser;
use crate::serializer;

/// Separator for the key paths accepted by [`MetadataTree::get_path`] and
/// [`MetadataTree::graft`].
pub const PATH_SEPARATOR: char = '.';

/// A parsed descriptor document.
///
/// The root is a synthetic container with an empty key. It is never rendered
/// itself; its children are the top-level entries of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataTree {
	pub root: Node,
	/// Comments and blank lines after the last entry.
	pub end_comments: Vec<Trivia>,
}

impl Default for MetadataTree {
	fn default() -> Self {
		Self {
			root: Node::container(""),
			end_comments: vec![],
		}
	}
}

impl MetadataTree {
	/// Parse descriptor text. See [`parser::parse`].
	pub fn parse(content: impl AsRef<str>) -> Self {
		parser::parse(content)
	}

	/// Render the tree in the canonical layout.
	pub fn render(&self) -> String {
		serializer::render(self)
	}

	pub fn render_with_options(&self, options: &RenderOptions) -> String {
		serializer::render_with_options(self, options)
	}

	/// The top-level entries.
	pub fn entries(&self) -> &[Node] {
		self.root.children()
	}

	/// The first top-level entry with the given key.
	pub fn get(&self, key: &str) -> Option<&Node> {
		self.root.find(key)
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
		self.root.find_mut(key)
	}

	/// Resolve a dot-separated key path such as `backend.language`. Each
	/// segment matches the first child with that key. An empty path or `.`
	/// resolves to the root.
	pub fn get_path(&self, path: &str) -> Option<&Node> {
		path_segments(path).try_fold(&self.root, |node, key| node.find(key))
	}

	pub fn get_path_mut(&mut self, path: &str) -> Option<&mut Node> {
		path_segments(path).try_fold(&mut self.root, |node, key| node.find_mut(key))
	}

	/// Append a top-level entry.
	pub fn push(&mut self, node: Node) -> YamtResult<()> {
		self.root.push_child(node)
	}

	/// Append `node` as the last child of the container at `parent_path`.
	pub fn graft(&mut self, parent_path: &str, node: Node) -> YamtResult<()> {
		let parent = self
			.get_path_mut(parent_path)
			.ok_or_else(|| YamtError::MissingNode {
				path: parent_path.to_string(),
			})?;

		tracing::debug!(parent = parent_path, key = %node.key, "grafting node");
		parent.push_child(node)
	}

	/// Iterate over every entry in document order together with its depth.
	pub fn walk(&self) -> Walk<'_> {
		Walk::new(self.root.children())
	}

	/// Total number of entries in the document.
	pub fn len(&self) -> usize {
		self.root.descendant_count()
	}

	pub fn is_empty(&self) -> bool {
		self.root.children().is_empty()
	}
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
	path.split(PATH_SEPARATOR)
		.map(str::trim)
		.filter(|segment| !segment.is_empty())
}

impl FromStr for MetadataTree {
	type Err = Infallible;

	fn from_str(content: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse(content))
	}
}

impl fmt::Display for MetadataTree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}
