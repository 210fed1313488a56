use brace_cli::BraceCli;
use brace_cli::Commands;
use brace_cli::OutputFormat;
use clap::Parser;
use rstest::rstest;
use similar_asserts::assert_eq;

#[test]
fn parses_global_flags_after_subcommand() {
	let cli = BraceCli::try_parse_from([
		"brace",
		"render",
		"doc.md",
		"--node",
		"A=a.json",
		"-n",
		"B=b.yaml",
		"--now",
		"2024-01-01T00:00:00Z",
		"--verbose",
	])
	.unwrap_or_else(|e| panic!("parse: {e}"));

	assert_eq!(cli.nodes, vec!["A=a.json".to_string(), "B=b.yaml".to_string()]);
	assert_eq!(cli.now.as_deref(), Some("2024-01-01T00:00:00Z"));
	assert!(cli.verbose);
	assert!(matches!(cli.command, Some(Commands::Render { watch: false, .. })));
}

#[rstest]
#[case::text(&["brace", "validate", "doc.md"], false)]
#[case::json(&["brace", "validate", "doc.md", "--format", "json"], true)]
fn parses_validate_format(#[case] argv: &[&str], #[case] is_json: bool) {
	let cli = BraceCli::try_parse_from(argv).unwrap_or_else(|e| panic!("parse: {e}"));

	let Some(Commands::Validate { format, .. }) = cli.command else {
		panic!("expected validate");
	};
	assert_eq!(matches!(format, OutputFormat::Json), is_json);
}

#[test]
fn complete_query_is_optional() {
	let cli =
		BraceCli::try_parse_from(["brace", "complete"]).unwrap_or_else(|e| panic!("parse: {e}"));
	assert!(matches!(cli.command, Some(Commands::Complete { query: None, .. })));
}

#[test]
fn rejects_unknown_format() {
	assert!(BraceCli::try_parse_from(["brace", "complete", "--format", "yaml"]).is_err());
}
