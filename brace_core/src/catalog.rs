use crate::CLOSE_MARKER;
use crate::DataNode;
use crate::FunctionRegistry;
use crate::HelperFunction;
use crate::OPEN_MARKER;
use crate::ValueKind;
use crate::VariableDescriptor;
use crate::flatten;

/// Describe a helper function the same way variables are described.
///
/// The preview value of a function is its usage template.
pub fn function_descriptor(function: HelperFunction) -> VariableDescriptor {
	VariableDescriptor {
		path: function.name().to_string(),
		key: function.name().to_string(),
		r#type: ValueKind::Function,
		value: serde_json::Value::String(function.usage().to_string()),
		is_expandable: false,
		description: Some(function.description().to_string()),
		usage: Some(function.usage().to_string()),
	}
}

/// Every helper function, in registry order, followed by the flattened data
/// of each node in input order.
pub fn build_catalog(nodes: &[DataNode]) -> Vec<VariableDescriptor> {
	let mut catalog: Vec<VariableDescriptor> = FunctionRegistry::global()
		.iter()
		.map(function_descriptor)
		.collect();

	for node in nodes {
		catalog.extend(flatten(&node.data, &node.name));
	}

	tracing::debug!(entries = catalog.len(), nodes = nodes.len(), "built catalog");

	catalog
}

/// Entries whose path contains `query`, ignoring case. Order is preserved and
/// an empty query keeps everything.
pub fn filter_catalog<'a>(
	catalog: &'a [VariableDescriptor],
	query: &str,
) -> Vec<&'a VariableDescriptor> {
	let query = query.to_lowercase();

	catalog
		.iter()
		.filter(|descriptor| descriptor.path.to_lowercase().contains(&query))
		.collect()
}

/// Find the descriptor for a token.
///
/// An exact path match wins. Otherwise trailing segments are dropped until a
/// path matches, so `Webhook.body.email.length` finds `Webhook.body.email`.
pub fn lookup<'a>(catalog: &'a [VariableDescriptor], token: &str) -> Option<&'a VariableDescriptor> {
	let mut candidate = token;

	loop {
		if let Some(found) = catalog.iter().find(|descriptor| descriptor.path == candidate) {
			return Some(found);
		}

		let (parent, _) = candidate.rsplit_once('.')?;
		candidate = parent;
	}
}

/// The identifier or dotted path surrounding the byte offset `cursor`.
pub fn token_at(text: &str, cursor: usize) -> Option<&str> {
	let cursor = cursor.min(text.len());

	if !text.is_char_boundary(cursor) {
		return None;
	}

	let start = text[..cursor]
		.char_indices()
		.rev()
		.take_while(|(_, ch)| is_path_char(*ch))
		.last()
		.map_or(cursor, |(index, _)| index);
	let end = text[cursor..]
		.char_indices()
		.find(|(_, ch)| !is_path_char(*ch))
		.map_or(text.len(), |(index, _)| cursor + index);

	let token = text[start..end].trim_matches('.');
	(!token.is_empty()).then_some(token)
}

/// The partial path being typed at `cursor`, when the cursor sits inside an
/// unclosed `{{`. Returns an empty query right after the opening marker.
pub fn completion_query(text: &str, cursor: usize) -> Option<&str> {
	let cursor = cursor.min(text.len());

	if !text.is_char_boundary(cursor) {
		return None;
	}

	let before = &text[..cursor];
	let open = before.rfind(OPEN_MARKER)?;
	let inside = &before[open + OPEN_MARKER.len()..];

	if inside.contains(CLOSE_MARKER) {
		return None;
	}

	let start = inside
		.char_indices()
		.rev()
		.take_while(|(_, ch)| is_path_char(*ch))
		.last()
		.map_or(inside.len(), |(index, _)| index);

	Some(&inside[start..])
}

/// The text inserted when a suggestion is accepted.
pub fn insertion_text(path: &str) -> String {
	format!("{OPEN_MARKER} {path} {CLOSE_MARKER}")
}

fn is_path_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || matches!(ch, '_' | '$' | '.')
}
