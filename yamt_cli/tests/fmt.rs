mod common;

use predicates::prelude::PredicateBooleanExt;
use yamt_core::AnyEmptyResult;

#[test]
fn fmt_rewrites_descriptor() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::UNFORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Formatted project.yaml"));

	similar_asserts::assert_eq!(common::read_descriptor(tmp.path())?, common::FORMATTED);

	Ok(())
}

#[test]
fn fmt_leaves_formatted_descriptor_alone() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::FORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already formatted"));

	similar_asserts::assert_eq!(common::read_descriptor(tmp.path())?, common::FORMATTED);

	Ok(())
}

#[test]
fn fmt_check_fails_when_unformatted() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::UNFORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("is not formatted"));

	// `--check` never writes.
	similar_asserts::assert_eq!(common::read_descriptor(tmp.path())?, common::UNFORMATTED);

	Ok(())
}

#[test]
fn fmt_check_passes_when_formatted() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::FORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	Ok(())
}

#[test]
fn fmt_diff_shows_changed_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::UNFORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-  language: ts   # generated"))
		.stderr(predicates::str::contains("+    language: ts        # generated"))
		.stderr(predicates::str::contains("   name: app"));

	Ok(())
}

#[test]
fn fmt_uses_descriptor_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("deploy"))?;
	std::fs::write(tmp.path().join("deploy/app.yaml"), common::UNFORMATTED)?;
	std::fs::write(
		tmp.path().join("yamt.toml"),
		"descriptor = \"deploy/app.yaml\"\n",
	)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	similar_asserts::assert_eq!(
		std::fs::read_to_string(tmp.path().join("deploy/app.yaml"))?,
		common::FORMATTED
	);

	Ok(())
}

#[test]
fn fmt_respects_comment_padding_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), "name: app # main\n")?;
	std::fs::write(
		tmp.path().join("yamt.toml"),
		"[format]\ninline_comment_padding = 1\n",
	)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	similar_asserts::assert_eq!(common::read_descriptor(tmp.path())?, "name: app # main\n");

	Ok(())
}

#[test]
fn fmt_accepts_explicit_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("custom.yml");
	std::fs::write(&file, common::UNFORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--file")
		.arg(&file)
		.assert()
		.success();

	similar_asserts::assert_eq!(std::fs::read_to_string(&file)?, common::FORMATTED);

	Ok(())
}

#[test]
fn fmt_reports_missing_descriptor() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("yamt::descriptor_not_found"));

	Ok(())
}

#[test]
fn fmt_reports_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::FORMATTED)?;
	std::fs::write(tmp.path().join("yamt.toml"), "max_file_size = \"big\"\n")?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("yamt::config_parse"));

	Ok(())
}

#[test]
fn fmt_rejects_oversized_descriptor() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::UNFORMATTED)?;
	std::fs::write(tmp.path().join("yamt.toml"), "max_file_size = 4\n")?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("yamt::file_too_large"));

	similar_asserts::assert_eq!(common::read_descriptor(tmp.path())?, common::UNFORMATTED);

	Ok(())
}

#[test]
fn verbose_logs_to_stderr() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_descriptor(tmp.path(), common::FORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("parsed metadata tree"))
		.stdout(predicates::str::contains("parsed metadata tree").not());

	Ok(())
}

#[test]
fn fmt_resolves_relative_file_from_project_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("deploy"))?;
	std::fs::write(tmp.path().join("deploy/app.yaml"), common::UNFORMATTED)?;

	common::yamt_cmd()
		.arg("fmt")
		.arg("--path")
		.arg(tmp.path())
		.arg("--file")
		.arg("deploy/app.yaml")
		.assert()
		.success()
		.stdout(predicates::str::contains("Formatted deploy/app.yaml"));

	similar_asserts::assert_eq!(
		std::fs::read_to_string(tmp.path().join("deploy/app.yaml"))?,
		common::FORMATTED
	);

	Ok(())
}
