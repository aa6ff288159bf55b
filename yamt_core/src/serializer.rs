use serde::Deserialize;
use serde::Serialize;

use crate::MetadataTree;
use crate::Node;
use crate::NodeValue;
use crate::Trivia;

/// Default number of spaces between a value and its inline comment.
pub const DEFAULT_INLINE_COMMENT_PADDING: usize = 8;

/// Sequence items are printed this many columns to the left of their mapping
/// siblings so the dash hangs in front of the key column.
pub const SEQUENCE_ITEM_SHIFT: usize = 2;

/// Options controlling the rendered text.
///
/// ```toml
/// [format]
/// inline_comment_padding = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Spaces inserted between an entry and its inline comment.
	pub inline_comment_padding: usize,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			inline_comment_padding: DEFAULT_INLINE_COMMENT_PADDING,
		}
	}
}

/// Render a tree using the canonical layout.
pub fn render(tree: &MetadataTree) -> String {
	render_with_options(tree, &RenderOptions::default())
}

/// Render a tree back into descriptor text.
///
/// The output depends only on the structure of the tree: top-level entries
/// start at column zero, children of a container are indented by four more
/// columns and sequence items are shifted two columns left. Trailing trivia
/// is appended without indentation.
pub fn render_with_options(tree: &MetadataTree, options: &RenderOptions) -> String {
	let mut output = String::new();

	for node in tree.root.children() {
		write_node(&mut output, node, 0, options);
	}

	for trivia in &tree.end_comments {
		write_trivia(&mut output, trivia, 0);
	}

	output
}

fn write_node(output: &mut String, node: &Node, width: usize, options: &RenderOptions) {
	for trivia in &node.comments_above {
		write_trivia(output, trivia, width);
	}

	let line_width = if node.is_sequence_item() {
		width.saturating_sub(SEQUENCE_ITEM_SHIFT)
	} else {
		width
	};

	push_spaces(output, line_width);
	output.push_str(&node.key);
	output.push(':');

	if let NodeValue::Leaf(value) = &node.value {
		output.push(' ');
		output.push_str(value);
	}

	if let Some(comment) = &node.inline_comment {
		push_spaces(output, options.inline_comment_padding);
		output.push_str(comment);
	}

	output.push('\n');

	let child_width = width + node.child_indent();
	for child in node.children() {
		write_node(output, child, child_width, options);
	}
}

fn write_trivia(output: &mut String, trivia: &Trivia, width: usize) {
	if let Trivia::Comment(text) = trivia {
		push_spaces(output, width);
		output.push_str(text);
	}

	output.push('\n');
}

fn push_spaces(output: &mut String, count: usize) {
	output.extend(std::iter::repeat_n(' ', count));
}
