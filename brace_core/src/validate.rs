use serde::Deserialize;
use serde::Serialize;

use crate::EvaluationContext;
use crate::InterpolationBlock;
use crate::clean_snippet;
use crate::evaluate_snippet;
use crate::find_blocks;

/// The verdict for one snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
	pub is_valid: bool,
	/// The underlying error message when the snippet is invalid.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl Validation {
	pub fn valid() -> Self {
		Self {
			is_valid: true,
			message: None,
		}
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		Self {
			is_valid: false,
			message: Some(message.into()),
		}
	}
}

/// Classify a snippet as valid or invalid by evaluating it and discarding the
/// value.
///
/// `snippet` is the text between the markers. It is cleaned exactly as
/// [`evaluate`](crate::evaluate) cleans it, so the two never disagree.
pub fn validate(snippet: &str, context: &EvaluationContext) -> Validation {
	let cleaned = clean_snippet(snippet);

	match evaluate_snippet(&cleaned, context) {
		Ok(_) => Validation::valid(),
		Err(error) => {
			tracing::debug!(snippet = %cleaned, %error, "invalid snippet");
			Validation::invalid(error.to_string())
		}
	}
}

/// Validate every interpolation block of a document independently.
pub fn validate_document(
	document: &str,
	context: &EvaluationContext,
) -> Vec<(InterpolationBlock, Validation)> {
	find_blocks(document)
		.into_iter()
		.map(|block| {
			let verdict = validate(&block.inner_snippet, context);
			(block, verdict)
		})
		.collect()
}
