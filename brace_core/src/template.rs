use serde::Deserialize;
use serde::Serialize;

use crate::EvalResult;
use crate::EvaluationContext;
use crate::Value;
use crate::evaluate_snippet;

/// Opens an interpolation block.
pub const OPEN_MARKER: &str = "{{";
/// Closes an interpolation block. The first one after an opening marker wins,
/// so a snippet cannot contain `}}`.
pub const CLOSE_MARKER: &str = "}}";

/// A matched `{{ ... }}` span within a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationBlock {
	/// The full match including both markers.
	pub raw_match: String,
	/// The text between the markers, untrimmed.
	pub inner_snippet: String,
	/// Byte offset of the opening marker.
	pub start_offset: usize,
	/// Byte offset just past the closing marker.
	pub end_offset: usize,
}

impl InterpolationBlock {
	/// The snippet as it is evaluated: trimmed, with `&gt;` and `&lt;`
	/// decoded.
	pub fn snippet(&self) -> String {
		clean_snippet(&self.inner_snippet)
	}
}

/// Find every non-overlapping interpolation block, left to right.
///
/// An opening marker without a matching close is left as literal text.
pub fn find_blocks(document: &str) -> Vec<InterpolationBlock> {
	let mut blocks = Vec::new();
	let mut search_from = 0;

	while let Some(open_offset) = document[search_from..].find(OPEN_MARKER) {
		let abs_open = search_from + open_offset;
		let after_open = abs_open + OPEN_MARKER.len();

		let Some(close_offset) = document[after_open..].find(CLOSE_MARKER) else {
			break;
		};
		let abs_close = after_open + close_offset;
		let abs_close_end = abs_close + CLOSE_MARKER.len();

		blocks.push(InterpolationBlock {
			raw_match: document[abs_open..abs_close_end].to_string(),
			inner_snippet: document[after_open..abs_close].to_string(),
			start_offset: abs_open,
			end_offset: abs_close_end,
		});

		search_from = abs_close_end;
	}

	blocks
}

/// Trim the snippet and decode the two entities rich-text editors produce for
/// comparison operators.
pub fn clean_snippet(inner: &str) -> String {
	inner.trim().replace("&gt;", ">").replace("&lt;", "<")
}

/// Evaluate a single block's snippet.
pub fn evaluate_block(block: &InterpolationBlock, context: &EvaluationContext) -> EvalResult<Value> {
	evaluate_snippet(&block.snippet(), context)
}

/// Resolve every interpolation block of `document` and substitute the result.
///
/// A block that fails is replaced by `[Error: <message>]`. Other blocks and
/// the literal text around them are unaffected. An empty or absent document
/// yields empty text.
pub fn evaluate<'a>(document: impl Into<Option<&'a str>>, context: &EvaluationContext) -> String {
	let Some(document) = document.into() else {
		return String::new();
	};

	if document.is_empty() {
		return String::new();
	}

	let mut output = String::with_capacity(document.len());
	let mut last = 0;

	for block in find_blocks(document) {
		output.push_str(&document[last..block.start_offset]);

		match evaluate_block(&block, context) {
			Ok(value) => {
				tracing::debug!(snippet = %block.inner_snippet.trim(), "resolved block");
				output.push_str(&value.to_display_string());
			}
			Err(error) => {
				tracing::debug!(snippet = %block.inner_snippet.trim(), %error, "block failed");
				output.push_str(&format!("[Error: {error}]"));
			}
		}

		last = block.end_offset;
	}

	output.push_str(&document[last..]);
	output
}
