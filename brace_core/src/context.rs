use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

use crate::FunctionRegistry;
use crate::Value;

/// A named root of structured data that expressions can reference, e.g. the
/// output of a previous step available as `Webhook.body.email`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNode {
	/// The identifier expressions use to reach this node's data.
	pub name: String,
	/// Arbitrary nested data.
	pub data: serde_json::Value,
}

impl DataNode {
	pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
		Self {
			name: name.into(),
			data,
		}
	}
}

/// The source of the current instant for `now()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
	/// Read the system clock on every call.
	#[default]
	System,
	/// Always report the same instant.
	Fixed(DateTime<Utc>),
}

impl Clock {
	pub fn now(&self) -> DateTime<Utc> {
		match self {
			Self::System => Utc::now(),
			Self::Fixed(instant) => *instant,
		}
	}
}

/// The flat identifier → value environment a snippet is evaluated against.
///
/// Built fresh for each evaluation call and read-only afterwards. It derefs
/// to the underlying map for lookups.
#[derive(Debug, Clone, Default, Deref)]
pub struct EvaluationContext {
	#[deref]
	bindings: HashMap<String, Value>,
	clock: Clock,
}

impl EvaluationContext {
	/// Replace the clock used by `now()`.
	#[must_use]
	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;
		self
	}

	pub fn clock(&self) -> &Clock {
		&self.clock
	}

	pub fn lookup(&self, name: &str) -> Option<&Value> {
		self.bindings.get(name)
	}

	/// Resolve a dotted path such as `Webhook.body.email`. The first segment
	/// names a binding; the remaining segments walk object members (or list
	/// indices).
	pub fn resolve_path(&self, path: &str) -> Option<&Value> {
		let mut segments = path.split('.');
		let mut current = self.bindings.get(segments.next()?)?;

		for segment in segments {
			current = match current {
				Value::Object(map) => map.get(segment)?,
				Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
				_ => return None,
			};
		}

		Some(current)
	}
}

/// Bind every node's name to its data, then every helper function's name to
/// the helper.
///
/// Names are not checked for collisions. Bindings made later win, so a
/// helper shadows a node with the same name and a node shadows an earlier node
/// with the same name.
pub fn build_context(nodes: &[DataNode]) -> EvaluationContext {
	let mut bindings = HashMap::with_capacity(nodes.len() + FunctionRegistry::global().len());

	for node in nodes {
		bindings.insert(node.name.clone(), Value::from(&node.data));
	}

	for function in FunctionRegistry::global().iter() {
		if bindings.contains_key(function.name()) {
			tracing::warn!(
				name = function.name(),
				"node is shadowed by a helper function with the same name"
			);
		}
		bindings.insert(function.name().to_string(), Value::Function(function));
	}

	EvaluationContext {
		bindings,
		clock: Clock::default(),
	}
}
