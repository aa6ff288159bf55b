use serde::Serialize;

use crate::COMMENT_MARKER;
use crate::KEY_VALUE_SEPARATOR;
use crate::YamtError;
use crate::YamtResult;

/// Keys beginning with this marker are sequence items (`- name: value`).
pub const SEQUENCE_ITEM_MARKER: char = '-';

/// Extra indentation applied to the children of a container node.
pub const CONTAINER_CHILD_INDENT: usize = 4;

/// Extra indentation applied to the children of a leaf node.
pub const LEAF_CHILD_INDENT: usize = 2;

/// Characters that would split or end a line when a key or value is written.
const RESERVED_CHARACTERS: [char; 4] = [KEY_VALUE_SEPARATOR, COMMENT_MARKER, '\n', '\r'];

/// A standalone line that is not an entry: either a full-line comment or a
/// blank line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum Trivia {
	/// An empty (or whitespace only) line.
	Blank,
	/// A comment, stored verbatim starting at the `#` marker.
	Comment(String),
}

impl Trivia {
	/// The text printed for this line, without indentation.
	pub fn text(&self) -> &str {
		match self {
			Self::Blank => "",
			Self::Comment(text) => text.as_str(),
		}
	}

	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Blank)
	}
}

/// The payload of a [`Node`]. A line either carries a scalar value or opens a
/// container for the more deeply indented lines that follow, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum NodeValue {
	Leaf(String),
	Container(Vec<Node>),
}

/// A single `key: value` entry of a metadata tree together with the comments
/// that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	/// The text before the first colon, trimmed. Sequence items keep their
	/// leading `-` (e.g. `- path`).
	pub key: String,
	pub value: NodeValue,
	/// A trailing `# ...` comment on the node's own line.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inline_comment: Option<String>,
	/// Comments and blank lines directly above the node.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub comments_above: Vec<Trivia>,
}

impl Node {
	/// Create a node the way the parser would classify it: an empty value
	/// produces a container, anything else a leaf.
	/// Surrounding whitespace is trimmed from both key and value.
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		let value = value.into();
		let value = match value.trim() {
			"" => NodeValue::Container(vec![]),
			trimmed => NodeValue::Leaf(trimmed.to_string()),
		};
		let key = key.into().trim().to_string();

		Self {
			key,
			value,
			inline_comment: None,
			comments_above: vec![],
		}
	}

	/// Create an empty container node.
	pub fn container(key: impl Into<String>) -> Self {
		Self::new(key, "")
	}

	#[must_use]
	pub fn with_inline_comment(mut self, comment: impl Into<String>) -> Self {
		self.inline_comment = Some(comment.into());
		self
	}

	#[must_use]
	pub fn with_comment_above(mut self, trivia: Trivia) -> Self {
		self.comments_above.push(trivia);
		self
	}

	/// Add a child and return `self`, for building small subtrees inline.
	///
	/// This is a no-op on a leaf: the child is dropped and a warning is
	/// logged. Use [`Node::push_child`] to get an error instead.
	#[must_use]
	pub fn with_child(mut self, child: Node) -> Self {
		match &mut self.value {
			NodeValue::Container(children) => children.push(child),
			NodeValue::Leaf(_) => {
				tracing::warn!(key = %self.key, child = %child.key, "leaf cannot hold children, child dropped");
			}
		}
		self
	}

	pub fn is_container(&self) -> bool {
		matches!(self.value, NodeValue::Container(_))
	}

	/// The scalar value, or an empty string for containers.
	pub fn value_str(&self) -> &str {
		match &self.value {
			NodeValue::Leaf(value) => value.as_str(),
			NodeValue::Container(_) => "",
		}
	}

	pub fn is_sequence_item(&self) -> bool {
		self.key.starts_with(SEQUENCE_ITEM_MARKER)
	}

	/// Additional columns applied to this node's children when rendering.
	pub fn child_indent(&self) -> usize {
		match self.value {
			NodeValue::Container(_) => CONTAINER_CHILD_INDENT,
			NodeValue::Leaf(_) => LEAF_CHILD_INDENT,
		}
	}

	pub fn children(&self) -> &[Node] {
		match &self.value {
			NodeValue::Container(children) => children.as_slice(),
			NodeValue::Leaf(_) => &[],
		}
	}

	pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
		match &mut self.value {
			NodeValue::Container(children) => Some(children),
			NodeValue::Leaf(_) => None,
		}
	}

	/// Append `child` as the last child of this node.
	///
	/// The child and its descendants are checked with [`Node::validate`]
	/// first, so grafted entries always parse back unchanged.
	pub fn push_child(&mut self, child: Node) -> YamtResult<()> {
		child.validate()?;

		match &mut self.value {
			NodeValue::Container(children) => {
				children.push(child);
				Ok(())
			}
			NodeValue::Leaf(_) => {
				Err(YamtError::NotAContainer {
					key: self.key.clone(),
				})
			}
		}
	}

	/// Check that this node and its descendants can be written out and parsed
	/// back into the same tree.
	///
	/// Keys must be non-empty. Keys and values must not contain `:`, `#` or
	/// line breaks, or have surrounding whitespace. Comments must start with
	/// `#` and fit on one line.
	pub fn validate(&self) -> YamtResult<()> {
		if self.key.trim().is_empty() {
			return Err(YamtError::EmptyKey);
		}

		check_text(&self.key, "key", &self.key)?;
		if let NodeValue::Leaf(value) = &self.value {
			check_text(&self.key, "value", value)?;
		}
		if let Some(comment) = &self.inline_comment {
			check_comment(&self.key, "inline comment", comment)?;
		}
		for trivia in &self.comments_above {
			if let Trivia::Comment(text) = trivia {
				check_comment(&self.key, "comment above", text)?;
			}
		}

		self.children().iter().try_for_each(Node::validate)
	}

	/// The first direct child with the given key.
	pub fn find(&self, key: &str) -> Option<&Node> {
		self.children().iter().find(|child| child.key == key)
	}

	pub fn find_mut(&mut self, key: &str) -> Option<&mut Node> {
		self.children_mut()?
			.iter_mut()
			.find(|child| child.key == key)
	}

	/// All direct children with the given key, in source order.
	pub fn find_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
		self.children().iter().filter(move |child| child.key == key)
	}

	/// Number of nodes below this one.
	pub fn descendant_count(&self) -> usize {
		self.children()
			.iter()
			.map(|child| 1 + child.descendant_count())
			.sum()
	}
}

/// Pre-order iterator over a node's descendants, yielding each with its
/// structural depth (direct children are depth `0`).
pub struct Walk<'a> {
	stack: Vec<(usize, &'a Node)>,
}

impl<'a> Walk<'a> {
	pub(crate) fn new(nodes: &'a [Node]) -> Self {
		Self {
			stack: nodes.iter().rev().map(|node| (0, node)).collect(),
		}
	}
}

impl<'a> Iterator for Walk<'a> {
	type Item = (usize, &'a Node);

	fn next(&mut self) -> Option<Self::Item> {
		let (depth, node) = self.stack.pop()?;
		self.stack
			.extend(node.children().iter().rev().map(|child| (depth + 1, child)));

		Some((depth, node))
	}
}

fn check_text(key: &str, part: &str, text: &str) -> YamtResult<()> {
	if let Some(found) = text.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
		return Err(unsupported(key, format!("the {part} contains {found:?}")));
	}

	if text.trim() != text {
		return Err(unsupported(
			key,
			format!("the {part} has leading or trailing whitespace"),
		));
	}

	Ok(())
}

fn check_comment(key: &str, part: &str, text: &str) -> YamtResult<()> {
	if !text.starts_with(COMMENT_MARKER) {
		return Err(unsupported(
			key,
			format!("the {part} does not start with `{COMMENT_MARKER}`"),
		));
	}

	if text.contains(['\n', '\r']) {
		return Err(unsupported(key, format!("the {part} contains a line break")));
	}

	Ok(())
}

fn unsupported(key: &str, reason: String) -> YamtError {
	YamtError::UnsupportedText {
		key: key.to_string(),
		reason,
	}
}
