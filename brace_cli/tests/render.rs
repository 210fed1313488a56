mod common;

use brace_core::AnyEmptyResult;

#[test]
fn render_resolves_blocks_and_isolates_errors() -> AnyEmptyResult {
	let tmp = common::sample_project();
	common::write(
		tmp.path(),
		"doc.md",
		"Hi {{ Webhook.body.name }} <{{ Webhook.body.email }}>\nPaid {{ \
		 formatCurrency(Webhook.body.amount) }} on {{ formatDate(now()) }}\n{{ Missing.x }}\n",
	);

	let output = common::brace_cmd()
		.arg("render")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout)?;
	insta::assert_snapshot!(stdout, @r"
	Hi Alice <alice@example.com>
	Paid $1,234.50 on 2024-01-01
	[Error: Missing is not defined]
	");

	Ok(())
}

#[test]
fn render_reads_stdin() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("render")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("{{ 1 + 1 }} {{ Webhook.status }}")
		.assert()
		.success()
		.stdout("2 200");

	Ok(())
}

#[test]
fn render_with_extra_node_argument() -> AnyEmptyResult {
	let tmp = common::sample_project();
	common::write(tmp.path(), "extra.yaml", "count: 3\n");

	common::brace_cmd()
		.arg("render")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.arg("--node")
		.arg("Extra=extra.yaml")
		.write_stdin("{{ Extra.count * 2 }}")
		.assert()
		.success()
		.stdout("6");

	Ok(())
}

#[test]
fn render_now_flag_overrides_config() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("render")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.arg("--now")
		.arg("2030-05-06T00:00:00Z")
		.write_stdin(r#"{{ formatDate(now(), "DD.MM.YYYY") }}"#)
		.assert()
		.success()
		.stdout("06.05.2030");

	Ok(())
}

#[test]
fn render_without_config_still_has_helpers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::brace_cmd()
		.arg("render")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("{{ toUpper('abc') }} {{ Webhook }}")
		.assert()
		.success()
		.stdout("ABC [Error: Webhook is not defined]");

	Ok(())
}

#[test]
fn render_invalid_config_exits_with_two() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "brace.toml", "[nodes\n");

	common::brace_cmd()
		.arg("render")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("{{ 1 }}")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn render_invalid_node_argument_exits_with_two() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("render")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.arg("--node")
		.arg("missing-equals")
		.write_stdin("{{ 1 }}")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid node argument"));

	Ok(())
}

#[test]
fn render_missing_file_exits_with_two() -> AnyEmptyResult {
	let tmp = common::sample_project();

	common::brace_cmd()
		.arg("render")
		.arg(tmp.path().join("nope.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to read"));

	Ok(())
}
