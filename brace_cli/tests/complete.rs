mod common;

use brace_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn complete_filters_by_query() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("complete")
		.arg("EMAIL")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Webhook.body.email"))
		.stdout(predicates::str::contains("\"alice@example.com\""))
		.stdout(predicates::str::contains("toUpper").not());

	Ok(())
}

#[test]
fn complete_json_lists_helpers_first() -> AnyEmptyResult {
	let tmp = common::sample_project();

	let output = common::brace_cmd()
		.arg("complete")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());

	let entries: Value = serde_json::from_slice(&output.stdout)?;
	let entries = entries.as_array().unwrap_or_else(|| panic!("expected array"));
	// 10 helpers + body, body.email, body.name, body.amount, status
	assert_eq!(entries.len(), 15);
	assert_eq!(entries[0]["path"], "toUpper");
	assert_eq!(entries[0]["type"], "function");
	assert_eq!(entries[9]["path"], "length");
	assert_eq!(entries[10]["path"], "Webhook.body");
	assert_eq!(entries[10]["isExpandable"], true);
	assert_eq!(entries[14]["path"], "Webhook.status");

	Ok(())
}

#[test]
fn inspect_variable() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("inspect")
		.arg("Webhook.body.email")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("string"))
		.stdout(predicates::str::contains("{{ Webhook.body.email }}"));

	Ok(())
}

#[test]
fn inspect_helper_as_json() -> AnyEmptyResult {
	let tmp = common::sample_project();

	let output = common::brace_cmd()
		.arg("inspect")
		.arg("formatDate")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());

	let descriptor: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(descriptor["type"], "function");
	assert_eq!(descriptor["usage"], "formatDate(value, \"YYYY-MM-DD\")");

	Ok(())
}

#[test]
fn inspect_unknown_token_fails() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("inspect")
		.arg("Nope")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("no variable or helper named `Nope`"));

	Ok(())
}
