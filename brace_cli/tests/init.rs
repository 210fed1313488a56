mod common;

use brace_core::AnyEmptyResult;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::brace_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created brace.toml"))
		.stdout(predicates::str::contains("Created webhook.json"))
		.stdout(predicates::str::contains("Created template.md"));

	let config_content = std::fs::read_to_string(tmp.path().join("brace.toml"))?;
	assert!(config_content.contains("[nodes]"));
	assert!(tmp.path().join("webhook.json").exists());

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("brace.toml");
	std::fs::write(&config_path, "existing config")?;

	common::brace_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");

	Ok(())
}

#[test]
fn init_creates_renderable_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::brace_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::brace_cmd()
		.current_dir(tmp.path())
		.arg("render")
		.arg("template.md")
		.assert()
		.success()
		.stdout("Hello Alice,\n\nWe received $1,234.50 from alice@example.com.\n");

	Ok(())
}
