//! `brace_core` is the engine behind [brace](https://github.com/ifiokjr/brace): it resolves `{{ ... }}` interpolation blocks in a document against named roots of structured data and a fixed library of helper functions, validates blocks one at a time for live feedback, and derives an autocomplete catalog from the same data.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Node data (JSON / TOML / YAML / KDL / INI / text)
//!   → Flattener (dotted paths + type tags + previews)  → Catalog (suggestions)
//!   → Context builder (node names + helper functions bound to values)
//!   → Block scanner (non-greedy `{{` … `}}`, trim, `&gt;` / `&lt;` decoding)
//!   → Expression language (lexer → parser → interpreter)
//!   → Rendered text, or one validity verdict per block
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Loading `brace.toml` and the node data files it names.
//! - [`expression`] — The brace expression language: grammar, tokenizer, parser and interpreter.
//!
//! ## Key Types
//!
//! - [`DataNode`] — A named root of structured data, e.g. `Webhook`.
//! - [`EvaluationContext`] — The flat identifier → value environment a snippet is evaluated against.
//! - [`VariableDescriptor`] — Path, type tag and preview of one addressable variable or helper.
//! - [`HelperFunction`] — One of the built-in helpers (`toUpper`, `formatDate`, `round`, …).
//! - [`InterpolationBlock`] — A matched `{{ ... }}` span with its byte offsets.
//! - [`Validation`] — The verdict for a single snippet.
//!
//! ## Fault Isolation
//!
//! Evaluation never fails as a whole. A block that cannot be resolved renders as `[Error: <message>]` and the rest of the document is unaffected.
//!
//! ## Quick Start
//!
//! ```rust
//! use brace_core::DataNode;
//! use brace_core::build_context;
//! use brace_core::evaluate;
//! use serde_json::json;
//!
//! let nodes = [DataNode::new("Webhook", json!({ "body": { "email": "alice@example.com" } }))];
//! let context = build_context(&nodes);
//!
//! assert_eq!(
//! 	evaluate("Hi {{ Webhook.body.email }}!", &context),
//! 	"Hi alice@example.com!"
//! );
//! assert_eq!(evaluate("{{ 1 + 1 }} and {{ Bad.ref }}", &context), "2 and [Error: Bad is not defined]");
//! ```

pub use catalog::*;
pub use context::*;
pub use error::*;
pub use expression::evaluate_snippet;
pub use flatten::*;
pub use functions::*;
pub use template::*;
pub use validate::*;
pub use value::*;

mod catalog;
pub mod config;
mod context;
mod error;
pub mod expression;
mod flatten;
mod functions;
mod template;
mod validate;
mod value;
