//! `yamt_core` is the core library for [yamt](https://github.com/ifiokjr/yamt), a round-trip editor for project descriptor files. It parses a small, indentation based `key: value` dialect into a tree that keeps every comment and blank line, lets callers add entries, and renders the tree back without losing the author's annotations.
//!
//! ## Processing Pipeline
//!
//! ```text
//! project.yaml
//!   → Parser (one pass over lines, tracks open containers, buffers comments)
//!   → MetadataTree (root entries + trailing comments)
//!   → Grafting (callers append entries under existing containers)
//!   → Serializer (canonical indentation, comments re-attached)
//! ```
//!
//! ## Dialect
//!
//! - Two spaces per nesting level.
//! - `#` starts a comment wherever it appears; there is no escaping.
//! - A line is split at its first `:`. Text after a second `:` is dropped.
//! - An entry with nothing after the colon is a container for the more
//!   deeply indented lines that follow it.
//! - Keys starting with `-` are sequence items.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `yamt.toml`.
//! - [`descriptor`]: Loading, editing and saving a project descriptor file.
//!
//! ## Quick Start
//!
//! ```rust
//! use yamt_core::MetadataTree;
//! use yamt_core::Node;
//!
//! let mut tree = MetadataTree::parse("# services\nbackend:\n  language: js\n");
//! tree.graft("backend", Node::new("runtime", "node18")).unwrap();
//!
//! assert_eq!(
//! 	tree.render(),
//! 	"# services\nbackend:\n    language: js\n    runtime: node18\n"
//! );
//! ```

pub use config::*;
pub use descriptor::*;
pub use error::*;
pub use node::*;
pub use parser::*;
pub use serializer::*;
pub use tree::*;

pub mod config;
pub mod descriptor;
#[allow(unused_assignments)]
mod error;
mod node;
mod parser;
mod serializer;
mod tree;

#[cfg(test)]
mod __fixtures;
