#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

/// An unformatted descriptor using two-space indentation.
pub const UNFORMATTED: &str = "name: app\n# client sdk\nsdk:\n  language: ts   # generated\n";

/// The canonical rendering of [`UNFORMATTED`].
pub const FORMATTED: &str = "name: app\n# client sdk\nsdk:\n    language: ts        # generated\n";

pub fn yamt_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("yamt"));
	cmd.env("NO_COLOR", "1").env_remove("YAMT_LOG");
	cmd
}

pub fn write_descriptor(root: &Path, content: &str) -> std::io::Result<()> {
	std::fs::write(root.join("project.yaml"), content)
}

pub fn read_descriptor(root: &Path) -> std::io::Result<String> {
	std::fs::read_to_string(root.join("project.yaml"))
}
