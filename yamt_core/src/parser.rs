use crate::MetadataTree;
use crate::Node;
use crate::NodeValue;
use crate::SEQUENCE_ITEM_MARKER;
use crate::SEQUENCE_ITEM_SHIFT;
use crate::Trivia;

/// Number of leading whitespace characters that make up one nesting level.
pub const INDENT_UNIT: usize = 2;

/// Starts a comment. There is no escaping: the first marker on a line always
/// begins the comment, even inside a value.
pub const COMMENT_MARKER: char = '#';

/// Separates a key from its value. Only the first two segments of a line are
/// used; anything after a second separator is discarded.
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Parse descriptor text into a [`MetadataTree`].
///
/// Parsing never fails. Lines are processed in a single pass and every line
/// either becomes a node or is kept as trivia (comment or blank line) attached
/// to the next node, so the tree can be rendered back without losing the
/// author's annotations.
pub fn parse(content: impl AsRef<str>) -> MetadataTree {
	let content = content.as_ref();
	let mut state = ParseState::default();

	for line in content.lines() {
		state.feed(line);
	}

	let tree = state.finish();
	tracing::debug!(
		nodes = tree.root.descendant_count(),
		end_comments = tree.end_comments.len(),
		"parsed metadata tree"
	);

	tree
}

/// A container whose children are still being collected.
#[derive(Debug)]
struct OpenContainer {
	node: Node,
	children: Vec<Node>,
	/// Column where the container's key text starts.
	anchor: usize,
}

impl OpenContainer {
	fn new(node: Node, anchor: usize) -> Self {
		Self {
			node,
			children: vec![],
			anchor,
		}
	}

	fn close(self) -> Node {
		let Self {
			mut node, children, ..
		} = self;
		node.value = NodeValue::Container(children);
		node
	}
}

/// Running state of a single parse.
///
/// `open` holds every container that can still receive children, innermost
/// last. The innermost open container (or the root when none are open) is the
/// parent of the next entry line.
///
/// A line closes open containers while there are more of them than its
/// nesting depth. It also closes every container up to and including one whose
/// key starts at exactly the line's key column, so rendered output (children
/// four columns in) parses back into the same tree.
#[derive(Debug)]
struct ParseState {
	root: OpenContainer,
	open: Vec<OpenContainer>,
	pending: Vec<Trivia>,
}

impl Default for ParseState {
	fn default() -> Self {
		Self {
			root: OpenContainer::new(Node::container(""), 0),
			open: vec![],
			pending: vec![],
		}
	}
}

impl ParseState {
	fn feed(&mut self, line: &str) {
		let (content, comment) = split_comment(line);

		if content.trim().is_empty() {
			self.pending.push(comment.map_or(Trivia::Blank, |text| {
				Trivia::Comment(text.to_string())
			}));
			return;
		}

		let trimmed = content.trim();
		let column = leading_whitespace(content);
		let depth = column / INDENT_UNIT;
		let anchor = key_column(column, trimmed);

		while self.open.len() > depth || self.is_aligned_with_open(anchor) {
			self.close_innermost();
		}

		let (key, value) = split_entry(trimmed);
		let mut node = Node::new(key, value);
		node.comments_above = std::mem::take(&mut self.pending);
		node.inline_comment = comment.map(str::to_string);

		if node.is_container() {
			self.open.push(OpenContainer::new(node, anchor));
		} else {
			self.current().children.push(node);
		}
	}

	/// Whether a line keyed at `anchor` lines up with the key of an open
	/// container, making it that container's sibling.
	fn is_aligned_with_open(&self, anchor: usize) -> bool {
		self.open.iter().any(|container| container.anchor == anchor)
	}

	fn current(&mut self) -> &mut OpenContainer {
		match self.open.last_mut() {
			Some(container) => container,
			None => &mut self.root,
		}
	}

	fn close_innermost(&mut self) {
		if let Some(container) = self.open.pop() {
			tracing::trace!(key = %container.node.key, children = container.children.len(), "closed container");
			let node = container.close();
			self.current().children.push(node);
		}
	}

	fn finish(mut self) -> MetadataTree {
		while !self.open.is_empty() {
			self.close_innermost();
		}

		MetadataTree {
			root: self.root.close(),
			end_comments: self.pending,
		}
	}
}

/// Split a raw line into its content and the comment starting at the first
/// comment marker, if any.
fn split_comment(line: &str) -> (&str, Option<&str>) {
	match line.find(COMMENT_MARKER) {
		Some(index) => (&line[..index], Some(&line[index..])),
		None => (line, None),
	}
}

/// Number of leading whitespace characters. Tabs count as a single column.
/// The nesting depth is this divided by [`INDENT_UNIT`], rounding down.
fn leading_whitespace(content: &str) -> usize {
	content.chars().take_while(|c| c.is_whitespace()).count()
}

/// The column where the key text of a line starts, looking past the marker
/// of a sequence item.
fn key_column(column: usize, trimmed: &str) -> usize {
	if trimmed.starts_with(SEQUENCE_ITEM_MARKER) {
		column + SEQUENCE_ITEM_SHIFT
	} else {
		column
	}
}

/// Split a trimmed line into `(key, value)`. A line without a separator is a
/// key with an empty value.
fn split_entry(line: &str) -> (&str, &str) {
	let mut segments = line.split(KEY_VALUE_SEPARATOR);
	let key = segments.next().unwrap_or_default().trim();
	let value = segments.next().unwrap_or_default().trim();
	(key, value)
}
