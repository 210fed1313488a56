#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

pub fn brace_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("brace"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn write(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

/// A project with a `Webhook` node and a pinned `now()`.
pub fn sample_project() -> TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write(
		tmp.path(),
		"brace.toml",
		"now = \"2024-01-01T00:00:00Z\"\n\n[nodes]\nWebhook = \"webhook.json\"\n",
	);
	write(
		tmp.path(),
		"webhook.json",
		r#"{"body":{"email":"alice@example.com","name":"Alice","amount":1234.5},"status":200}"#,
	);
	tmp
}
