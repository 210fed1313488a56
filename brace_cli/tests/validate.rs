mod common;

use brace_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn validate_reports_each_block() -> AnyEmptyResult {
	let tmp = common::sample_project();
	common::write(
		tmp.path(),
		"doc.md",
		"{{ Webhook.status }}\n  {{ Missing }}\n",
	);

	common::brace_cmd()
		.arg("validate")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("1:1 {{ Webhook.status }} ok"))
		.stdout(predicates::str::contains(
			"2:3 {{ Missing }} error: Missing is not defined",
		))
		.stdout(predicates::str::contains("2 block(s) checked, 1 invalid"));

	Ok(())
}

#[test]
fn validate_succeeds_when_every_block_is_valid() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("validate")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("Total: {{ round(Webhook.body.amount) }}")
		.assert()
		.success()
		.stdout(predicates::str::contains("1 block(s) checked, 0 invalid"));

	Ok(())
}

#[test]
fn validate_json_output() -> AnyEmptyResult {
	let tmp = common::sample_project();

	let output = common::brace_cmd()
		.arg("validate")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.arg("--format")
		.arg("json")
		.write_stdin("{{ Webhook.status }}\n{{ 1 + }}")
		.output()?;

	assert_eq!(output.status.code(), Some(1));

	let reports: Value = serde_json::from_slice(&output.stdout)?;
	let reports = reports.as_array().unwrap_or_else(|| panic!("expected array"));
	assert_eq!(reports.len(), 2);
	assert_eq!(reports[0]["isValid"], true);
	assert_eq!(reports[0]["rawMatch"], "{{ Webhook.status }}");
	assert_eq!(reports[0]["startOffset"], 0);
	assert!(reports[0].get("message").is_none());
	assert_eq!(reports[1]["isValid"], false);
	assert_eq!(reports[1]["message"], "Unexpected end of input");
	assert_eq!(reports[1]["line"], 2);
	assert_eq!(reports[1]["column"], 1);

	Ok(())
}
