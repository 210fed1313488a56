use serde::Deserialize;
use serde::Serialize;

use crate::ValueKind;

/// Maximum number of characters kept in an object or array preview.
pub const PREVIEW_LENGTH: usize = 20;

/// Metadata describing one addressable variable (or helper function) for
/// menus, tooltips and autocomplete.
///
/// `path` is unique within one flattening pass and is the node name joined
/// with the nested keys by `.`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDescriptor {
	/// Dotted path, e.g. `Webhook.body.email`.
	pub path: String,
	/// The last path segment, e.g. `email`.
	pub key: String,
	pub r#type: ValueKind,
	/// Advisory preview. Scalars are kept as-is, objects and arrays are
	/// serialized and truncated. Never used for evaluation.
	pub value: serde_json::Value,
	pub is_expandable: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub usage: Option<String>,
}

impl VariableDescriptor {
	/// The name of the root this descriptor belongs to (the first path
	/// segment).
	pub fn root(&self) -> &str {
		self.path.split('.').next().unwrap_or(&self.path)
	}

	/// Number of path segments below the root.
	pub fn depth(&self) -> usize {
		self.path.matches('.').count()
	}
}

/// Walk `value` and produce one descriptor per object member, depth first,
/// with every parent ahead of its descendants.
///
/// `null` and any non-object input produce an empty list. Arrays become leaf
/// descriptors; their elements are not individually addressable.
pub fn flatten(value: &serde_json::Value, parent_path: &str) -> Vec<VariableDescriptor> {
	let mut descriptors = Vec::new();

	if let serde_json::Value::Object(map) = value {
		flatten_into(map, parent_path, &mut descriptors);
	}

	tracing::trace!(
		parent = parent_path,
		count = descriptors.len(),
		"flattened schema"
	);

	descriptors
}

fn flatten_into(
	map: &serde_json::Map<String, serde_json::Value>,
	parent_path: &str,
	descriptors: &mut Vec<VariableDescriptor>,
) {
	for (key, child) in map {
		let path = if parent_path.is_empty() {
			key.clone()
		} else {
			format!("{parent_path}.{key}")
		};
		let kind = ValueKind::of_json(child);

		descriptors.push(VariableDescriptor {
			path: path.clone(),
			key: key.clone(),
			r#type: kind,
			value: preview(child),
			is_expandable: kind.is_expandable(),
			description: None,
			usage: None,
		});

		if let serde_json::Value::Object(child_map) = child {
			flatten_into(child_map, &path, descriptors);
		}
	}
}

/// Build the advisory preview for a value.
pub fn preview(value: &serde_json::Value) -> serde_json::Value {
	match value {
		serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
			let serialized = serde_json::to_string(value).unwrap_or_default();
			serde_json::Value::String(truncate_preview(&serialized))
		}
		scalar => scalar.clone(),
	}
}

fn truncate_preview(text: &str) -> String {
	if text.chars().count() <= PREVIEW_LENGTH {
		return text.to_string();
	}

	let mut truncated: String = text.chars().take(PREVIEW_LENGTH).collect();
	truncated.push_str("...");
	truncated
}
