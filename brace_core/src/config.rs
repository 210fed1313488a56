use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::BraceError;
use crate::BraceResult;
use crate::Clock;
use crate::DataNode;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["brace.toml", ".brace.toml", ".config/brace.toml"];

/// Where a node's data comes from.
///
/// A bare string is a path whose extension picks the format:
///
/// ```toml
/// [nodes]
/// Webhook = "fixtures/webhook.json"
/// ```
///
/// A table can name the format explicitly:
///
/// ```toml
/// [nodes]
/// Sheet = { path = "data/sheet", format = "yaml" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum NodeSource {
	Path(PathBuf),
	Typed(TypedNodeSource),
}

#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedNodeSource {
	pub path: PathBuf,
	pub format: String,
}

impl NodeSource {
	pub fn path(&self) -> &Path {
		match self {
			Self::Path(path) => path.as_path(),
			Self::Typed(typed) => typed.path.as_path(),
		}
	}

	/// The explicit format override, if any.
	pub fn format(&self) -> Option<&str> {
		match self {
			Self::Path(_) => None,
			Self::Typed(typed) => Some(typed.format.as_str()),
		}
	}
}

/// Contents of `brace.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct BraceConfig {
	/// Fixed RFC 3339 instant reported by `now()`. The system clock is used
	/// when absent.
	#[serde(default)]
	pub now: Option<String>,
	/// Node name → data file.
	#[serde(default)]
	pub nodes: BTreeMap<String, NodeSource>,
}

impl BraceConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none.
	pub fn load(root: &Path) -> BraceResult<Option<BraceConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");

		let content = std::fs::read_to_string(&config_path)?;
		let config: BraceConfig =
			toml::from_str(&content).map_err(|e| BraceError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Read every configured node, sorted by name. Paths are relative to
	/// `root`.
	pub fn load_nodes(&self, root: &Path) -> BraceResult<Vec<DataNode>> {
		self.nodes
			.iter()
			.map(|(name, source)| load_node(root, name, source.path(), source.format()))
			.collect()
	}

	/// The clock `now()` reads from.
	pub fn clock(&self) -> BraceResult<Clock> {
		match &self.now {
			Some(timestamp) => Ok(Clock::Fixed(parse_timestamp(timestamp)?)),
			None => Ok(Clock::System),
		}
	}
}

/// Read one node's data file. Without an explicit `format` the file extension
/// decides.
pub fn load_node(
	root: &Path,
	name: &str,
	rel_path: &Path,
	format: Option<&str>,
) -> BraceResult<DataNode> {
	if !is_valid_node_name(name) {
		return Err(BraceError::InvalidNodeName(name.to_string()));
	}

	let abs_path = root.join(rel_path);
	let path_display = rel_path.display().to_string();
	let content = std::fs::read_to_string(&abs_path).map_err(|e| {
		BraceError::DataFile {
			path: path_display.clone(),
			reason: e.to_string(),
		}
	})?;
	let format = match format {
		Some(format) => format.trim().to_ascii_lowercase(),
		None => {
			abs_path
				.extension()
				.and_then(|e| e.to_str())
				.unwrap_or("")
				.to_ascii_lowercase()
		}
	};

	tracing::debug!(name, path = %path_display, format, "loading node");

	let data = parse_data_file(&content, &format, &path_display)?;
	Ok(DataNode::new(name, data))
}

/// Node names are identifiers so expressions can reference them.
pub fn is_valid_node_name(name: &str) -> bool {
	let mut chars = name.chars();

	let Some(first) = chars.next() else {
		return false;
	};

	(first.is_ascii_alphabetic() || matches!(first, '_' | '$'))
		&& chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '$'))
}

/// Split a `Name=path` command line argument.
pub fn parse_node_argument(argument: &str) -> BraceResult<(String, PathBuf)> {
	let Some((name, path)) = argument.split_once('=') else {
		return Err(BraceError::InvalidNodeArgument(argument.to_string()));
	};
	let name = name.trim();
	let path = path.trim();

	if path.is_empty() {
		return Err(BraceError::InvalidNodeArgument(argument.to_string()));
	}

	if !is_valid_node_name(name) {
		return Err(BraceError::InvalidNodeName(name.to_string()));
	}

	Ok((name.to_string(), PathBuf::from(path)))
}

/// Parse the fixed instant for `now()`.
pub fn parse_timestamp(text: &str) -> BraceResult<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(text.trim())
		.map(|instant| instant.with_timezone(&Utc))
		.map_err(|_| BraceError::InvalidTimestamp(text.to_string()))
}

/// Parse a data file's content into a `serde_json::Value` based on its
/// format.
pub fn parse_data_file(
	content: &str,
	format: &str,
	path_display: &str,
) -> BraceResult<serde_json::Value> {
	let data_error = |reason: String| {
		BraceError::DataFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"text" | "txt" => Ok(serde_json::Value::String(content.to_string())),
		"json" => serde_json::from_str(content).map_err(|e| data_error(e.to_string())),
		"toml" => {
			let toml_value: toml::Value =
				toml::from_str(content).map_err(|e| data_error(e.to_string()))?;
			toml_to_json(toml_value, path_display)
		}
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| data_error(e.to_string())),
		"kdl" => {
			let doc: kdl::KdlDocument = content
				.parse()
				.map_err(|e: kdl::KdlError| data_error(e.to_string()))?;
			kdl_document_to_value(&doc, path_display)
		}
		"ini" => serde_ini::from_str(content).map_err(|e| data_error(e.to_string())),
		other => Err(BraceError::UnsupportedDataFormat(other.to_string())),
	}
}

fn float_to_json(value: f64, path_display: &str) -> BraceResult<serde_json::Value> {
	serde_json::Number::from_f64(value)
		.map(serde_json::Value::Number)
		.ok_or_else(|| {
			BraceError::UnconvertibleFloat {
				path: path_display.to_string(),
				value: value.to_string(),
			}
		})
}

fn toml_to_json(value: toml::Value, path_display: &str) -> BraceResult<serde_json::Value> {
	let json = match value {
		toml::Value::String(s) => serde_json::Value::String(s),
		toml::Value::Integer(i) => serde_json::Value::Number(i.into()),
		toml::Value::Float(f) => float_to_json(f, path_display)?,
		toml::Value::Boolean(b) => serde_json::Value::Bool(b),
		toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
		toml::Value::Array(arr) => {
			let items: BraceResult<Vec<serde_json::Value>> = arr
				.into_iter()
				.map(|v| toml_to_json(v, path_display))
				.collect();
			serde_json::Value::Array(items?)
		}
		toml::Value::Table(table) => {
			let mut map = serde_json::Map::new();
			for (k, v) in table {
				map.insert(k, toml_to_json(v, path_display)?);
			}
			serde_json::Value::Object(map)
		}
	};

	Ok(json)
}

/// Top-level KDL nodes become object members.
fn kdl_document_to_value(
	doc: &kdl::KdlDocument,
	path_display: &str,
) -> BraceResult<serde_json::Value> {
	let mut map = serde_json::Map::new();

	for node in doc.nodes() {
		map.insert(node.name().to_string(), kdl_node_to_value(node, path_display)?);
	}

	Ok(serde_json::Value::Object(map))
}

fn kdl_node_to_value(node: &kdl::KdlNode, path_display: &str) -> BraceResult<serde_json::Value> {
	if let Some(children) = node.children() {
		return kdl_document_to_value(children, path_display);
	}

	let entries: Vec<&kdl::KdlEntry> = node.entries().iter().collect();

	match entries.as_slice() {
		[] => Ok(serde_json::Value::Null),
		[single] if single.name().is_none() => kdl_value_to_json(single.value(), path_display),
		_ if entries.iter().all(|entry| entry.name().is_some()) => {
			let mut map = serde_json::Map::new();
			for entry in &entries {
				if let Some(name) = entry.name() {
					map.insert(
						name.to_string(),
						kdl_value_to_json(entry.value(), path_display)?,
					);
				}
			}
			Ok(serde_json::Value::Object(map))
		}
		_ => {
			let values: BraceResult<Vec<serde_json::Value>> = entries
				.iter()
				.map(|entry| kdl_value_to_json(entry.value(), path_display))
				.collect();
			Ok(serde_json::Value::Array(values?))
		}
	}
}

fn kdl_value_to_json(value: &kdl::KdlValue, path_display: &str) -> BraceResult<serde_json::Value> {
	match value {
		kdl::KdlValue::String(s) => Ok(serde_json::Value::String(s.clone())),
		kdl::KdlValue::Integer(i) => {
			i64::try_from(*i).map_or_else(
				|_| float_to_json(*i as f64, path_display),
				|i| Ok(serde_json::Value::Number(i.into())),
			)
		}
		kdl::KdlValue::Float(f) => float_to_json(*f, path_display),
		kdl::KdlValue::Bool(b) => Ok(serde_json::Value::Bool(*b)),
		kdl::KdlValue::Null => Ok(serde_json::Value::Null),
	}
}
