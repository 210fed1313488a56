use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use brace_cli::BraceCli;
use brace_cli::Commands;
use brace_cli::OutputFormat;
use brace_core::BraceError;
use brace_core::Clock;
use brace_core::DataNode;
use brace_core::EvaluationContext;
use brace_core::InterpolationBlock;
use brace_core::Validation;
use brace_core::VariableDescriptor;
use brace_core::ValueKind;
use brace_core::build_catalog;
use brace_core::build_context;
use brace_core::config::BraceConfig;
use brace_core::config::load_node;
use brace_core::config::parse_node_argument;
use brace_core::config::parse_timestamp;
use brace_core::evaluate;
use brace_core::filter_catalog;
use brace_core::insertion_text;
use brace_core::lookup;
use brace_core::validate_document;
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
	let args = BraceCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Render { file, watch }) => run_render(&args, file, *watch),
		Some(Commands::Validate { file, format }) => run_validate(&args, file, *format),
		Some(Commands::Complete { query, format }) => {
			run_complete(&args, query.as_deref(), *format)
		}
		Some(Commands::Inspect { token, format }) => run_inspect(&args, token, *format),
		None => {
			eprintln!("No subcommand specified. Run `brace --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<BraceError>() {
			Ok(brace_err) => {
				let report: miette::Report = (*brace_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &BraceCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Config nodes (sorted by name) followed by `--node` arguments, and the clock
/// for `now()`.
fn load_nodes(args: &BraceCli) -> CliResult<(Vec<DataNode>, Clock)> {
	let root = resolve_root(args);
	let config = BraceConfig::load(&root)?.unwrap_or_default();
	let mut nodes = config.load_nodes(&root)?;

	for argument in &args.nodes {
		let (name, path) = parse_node_argument(argument)?;
		nodes.push(load_node(&root, &name, &path, None)?);
	}

	let clock = match &args.now {
		Some(timestamp) => Clock::Fixed(parse_timestamp(timestamp)?),
		None => config.clock()?,
	};

	tracing::debug!(nodes = nodes.len(), ?clock, "loaded nodes");

	Ok((nodes, clock))
}

fn load_context(args: &BraceCli) -> CliResult<(Vec<DataNode>, EvaluationContext)> {
	let (nodes, clock) = load_nodes(args)?;
	let context = build_context(&nodes).with_clock(clock);
	Ok((nodes, context))
}

fn read_document(file: &Path) -> CliResult<String> {
	if file == Path::new("-") {
		let mut content = String::new();
		std::io::stdin().read_to_string(&mut content)?;
		return Ok(content);
	}

	std::fs::read_to_string(file).map_err(|e| format!("failed to read `{}`: {e}", file.display()).into())
}

fn run_init(args: &BraceCli) -> CliResult<()> {
	let root = resolve_root(args);
	let config_path = root.join("brace.toml");
	let data_path = root.join("webhook.json");
	let document_path = root.join("template.md");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
	} else {
		let sample_config = "# brace configuration\n\n# Pin the instant returned by now().\n# \
		                     now = \"2024-01-01T00:00:00Z\"\n\n# Map node names to data files. \
		                     Values are available in documents as {{ Name.key }}.\n# Supported \
		                     formats: json, toml, yaml, kdl, ini, text.\n[nodes]\nWebhook = \
		                     \"webhook.json\"\n";

		std::fs::write(&config_path, sample_config)?;
		println!("Created brace.toml");
	}

	if !data_path.exists() {
		let sample_data = "{\n  \"body\": {\n    \"name\": \"Alice\",\n    \"email\": \
		                   \"alice@example.com\",\n    \"amount\": 1234.5\n  }\n}\n";

		std::fs::write(&data_path, sample_data)?;
		println!("Created webhook.json");
	}

	if !document_path.exists() {
		let sample_document = "Hello {{ Webhook.body.name }},\n\nWe received {{ \
		                       formatCurrency(Webhook.body.amount) }} from {{ \
		                       toLower(Webhook.body.email) }}.\n";

		std::fs::write(&document_path, sample_document)?;
		println!("Created template.md");
	}

	println!();
	println!("Next steps:");
	println!("  1. Add your own data files under [nodes] in brace.toml");
	println!("  2. Run `brace render template.md`");
	println!("  3. Run `brace complete` to list every available path");

	Ok(())
}

fn run_render(args: &BraceCli, file: &Path, watch: bool) -> CliResult<()> {
	render_once(args, file)?;

	if !watch {
		return Ok(());
	}

	if file == Path::new("-") {
		return Err("`--watch` cannot be used when reading from stdin".into());
	}

	eprintln!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;
	watcher.watch(file, notify::RecursiveMode::NonRecursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		eprintln!("\nFile change detected, rendering...");
		if let Err(e) = render_once(args, file) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn render_once(args: &BraceCli, file: &Path) -> CliResult<()> {
	let document = read_document(file)?;
	let (_, context) = load_context(args)?;

	print!("{}", evaluate(document.as_str(), &context));

	Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockReport<'a> {
	#[serde(flatten)]
	block: &'a InterpolationBlock,
	line: usize,
	column: usize,
	#[serde(flatten)]
	validation: &'a Validation,
}

fn run_validate(args: &BraceCli, file: &Path, format: OutputFormat) -> CliResult<()> {
	let document = read_document(file)?;
	let (_, context) = load_context(args)?;
	let verdicts = validate_document(&document, &context);
	let invalid = verdicts
		.iter()
		.filter(|(_, validation)| !validation.is_valid)
		.count();

	match format {
		OutputFormat::Json => {
			let reports: Vec<BlockReport<'_>> = verdicts
				.iter()
				.map(|(block, validation)| {
					let (line, column) = line_column(&document, block.start_offset);
					BlockReport {
						block,
						line,
						column,
						validation,
					}
				})
				.collect();
			println!("{}", serde_json::to_string_pretty(&reports)?);
		}
		OutputFormat::Text => {
			for (block, validation) in &verdicts {
				let (line, column) = line_column(&document, block.start_offset);
				let location = colored!(format!("{line}:{column}"), dimmed);
				let snippet = block.raw_match.replace('\n', " ");

				match &validation.message {
					None => println!("{location} {snippet} {}", colored!("ok", green)),
					Some(message) => {
						println!("{location} {snippet} {} {message}", colored!("error:", red));
					}
				}
			}

			let summary = format!("{} block(s) checked, {invalid} invalid", verdicts.len());
			if invalid == 0 {
				println!("{}", colored!(summary, green));
			} else {
				println!("{}", colored!(summary, red));
			}
		}
	}

	if invalid > 0 {
		process::exit(1);
	}

	Ok(())
}

fn run_complete(args: &BraceCli, query: Option<&str>, format: OutputFormat) -> CliResult<()> {
	let (nodes, _) = load_nodes(args)?;
	let catalog = build_catalog(&nodes);
	let entries = filter_catalog(&catalog, query.unwrap_or_default());

	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
		OutputFormat::Text => {
			let width = entries
				.iter()
				.map(|descriptor| descriptor.path.len())
				.max()
				.unwrap_or_default();

			for descriptor in entries {
				let detail = match (&descriptor.r#type, &descriptor.description) {
					(ValueKind::Function, Some(description)) => description.clone(),
					_ => serde_json::to_string(&descriptor.value)?,
				};
				println!(
					"{:<width$}  {:<8}  {detail}",
					descriptor.path,
					descriptor.r#type.to_string(),
				);
			}
		}
	}

	Ok(())
}

fn run_inspect(args: &BraceCli, token: &str, format: OutputFormat) -> CliResult<()> {
	let (nodes, _) = load_nodes(args)?;
	let catalog = build_catalog(&nodes);

	let Some(descriptor) = lookup(&catalog, token) else {
		eprintln!("{} no variable or helper named `{token}`", colored!("error:", red));
		process::exit(1);
	};

	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(descriptor)?),
		OutputFormat::Text => print_descriptor(descriptor)?,
	}

	Ok(())
}

fn print_descriptor(descriptor: &VariableDescriptor) -> CliResult<()> {
	println!("{}", colored!(descriptor.path, bold));
	print_field("type", &descriptor.r#type);
	if let Some(description) = &descriptor.description {
		print_field("description", description);
	}
	if let Some(usage) = &descriptor.usage {
		print_field("usage", usage);
	} else {
		print_field("value", serde_json::to_string(&descriptor.value)?);
		print_field("expandable", descriptor.is_expandable);
	}
	print_field("insert", insertion_text(&descriptor.path));

	Ok(())
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("  {label:<12} {value}");
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(document: &str, offset: usize) -> (usize, usize) {
	let before = &document[..offset];
	let line = before.matches('\n').count() + 1;
	let line_start = before.rfind('\n').map_or(0, |index| index + 1);
	let column = before[line_start..].chars().count() + 1;

	(line, column)
}
