use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Resolve, validate and autocomplete `{{ }}` expressions against structured data.",
	long_about = "brace is a template-expression engine. Documents contain `{{ ... }}` blocks \
	              that reference named data nodes and built-in helper functions.\n\nNodes are \
	              declared in brace.toml or with `--node Name=path`.\n\nQuick start:\n  brace \
	              init              Create a sample config and node file\n  brace render \
	              FILE       Print FILE with every block resolved\n  brace validate FILE     \
	              Report the blocks that fail\n  brace complete [QUERY]  List variables and \
	              helpers"
)]
pub struct BraceCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where brace.toml is looked up.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Add a data node, as `Name=path/to/data.json`. May be repeated. Paths are
	/// relative to the project root.
	#[arg(long = "node", short = 'n', global = true, value_name = "NAME=PATH")]
	pub nodes: Vec<String>,

	/// Fixed RFC 3339 instant returned by `now()`. Overrides `now` in
	/// brace.toml.
	#[arg(long, global = true, value_name = "TIMESTAMP")]
	pub now: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample brace.toml and node data file.
	///
	/// Existing files are left untouched.
	Init,
	/// Print a document with every `{{ ... }}` block resolved.
	///
	/// Blocks that fail to resolve are replaced by `[Error: <message>]`; the
	/// rest of the document is unaffected. Use `-` to read from stdin.
	Render {
		/// The document to render, or `-` for stdin.
		file: PathBuf,

		/// Re-render whenever the document or the project files change.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Validate each `{{ ... }}` block of a document.
	///
	/// Exits with status 1 when any block is invalid.
	Validate {
		/// The document to validate, or `-` for stdin.
		file: PathBuf,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List autocomplete suggestions: helpers first, then node variables.
	Complete {
		/// Keep only entries whose path contains this text (case-insensitive).
		query: Option<String>,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Describe a variable path or helper function.
	///
	/// Exits with status 1 when nothing matches.
	Inspect {
		/// A dotted path such as `Webhook.body.email` or a helper name.
		token: String,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
