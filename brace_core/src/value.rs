use std::fmt::Display;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use crate::HelperFunction;

/// Ordered key/value storage for object values. Keys keep the order in which
/// they were inserted, which is also the order of the source data.
pub type ObjectMap = IndexMap<String, Value>;

/// A runtime value produced while evaluating a snippet.
///
/// Node data enters the engine as `serde_json::Value` and is converted into
/// this closed set of variants once, when the evaluation context is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// The absence of a value, e.g. a missing object member.
	#[default]
	Undefined,
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	Array(Vec<Value>),
	Object(ObjectMap),
	/// A callable entry from the helper function registry.
	Function(HelperFunction),
}

/// The type tag attached to variable descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
	String,
	Number,
	Boolean,
	Object,
	Array,
	Null,
	Function,
}

impl ValueKind {
	/// Objects and arrays can be expanded into their members.
	pub fn is_expandable(self) -> bool {
		matches!(self, Self::Object | Self::Array)
	}

	/// Classify a piece of node data.
	pub fn of_json(value: &serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(_) => Self::Boolean,
			serde_json::Value::Number(_) => Self::Number,
			serde_json::Value::String(_) => Self::String,
			serde_json::Value::Array(_) => Self::Array,
			serde_json::Value::Object(_) => Self::Object,
		}
	}
}

impl Display for ValueKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::String => write!(f, "string"),
			Self::Number => write!(f, "number"),
			Self::Boolean => write!(f, "boolean"),
			Self::Object => write!(f, "object"),
			Self::Array => write!(f, "array"),
			Self::Null => write!(f, "null"),
			Self::Function => write!(f, "function"),
		}
	}
}

impl Value {
	/// The descriptor type tag for this value. `Undefined` has no tag.
	pub fn kind(&self) -> Option<ValueKind> {
		match self {
			Self::Undefined => None,
			Self::Null => Some(ValueKind::Null),
			Self::Bool(_) => Some(ValueKind::Boolean),
			Self::Number(_) => Some(ValueKind::Number),
			Self::String(_) => Some(ValueKind::String),
			Self::Array(_) => Some(ValueKind::Array),
			Self::Object(_) => Some(ValueKind::Object),
			Self::Function(_) => Some(ValueKind::Function),
		}
	}

	pub fn is_nullish(&self) -> bool {
		matches!(self, Self::Undefined | Self::Null)
	}

	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Undefined | Self::Null => false,
			Self::Bool(b) => *b,
			Self::Number(n) => *n != 0.0 && !n.is_nan(),
			Self::String(s) => !s.is_empty(),
			Self::Array(_) | Self::Object(_) | Self::Function(_) => true,
		}
	}

	/// Numeric coercion. Values without a numeric reading become `NaN`.
	pub fn to_number(&self) -> f64 {
		match self {
			Self::Null => 0.0,
			Self::Bool(b) => f64::from(u8::from(*b)),
			Self::Number(n) => *n,
			Self::String(s) => parse_numeric_text(s),
			Self::Array(items) => {
				match items.as_slice() {
					[] => 0.0,
					[single] => parse_numeric_text(&single.to_text()),
					_ => f64::NAN,
				}
			}
			Self::Undefined | Self::Object(_) | Self::Function(_) => f64::NAN,
		}
	}

	/// Text coercion, as used by string concatenation and the text helpers.
	pub fn to_text(&self) -> String {
		match self {
			Self::Undefined => "undefined".to_string(),
			Self::Null => "null".to_string(),
			Self::Bool(b) => b.to_string(),
			Self::Number(n) => format_number(*n),
			Self::String(s) => s.clone(),
			Self::Array(items) => join_values(items, ","),
			Self::Object(_) => "[object Object]".to_string(),
			Self::Function(function) => format!("function {}() {{ [native code] }}", function.name()),
		}
	}

	/// The text substituted for an interpolation block: nothing for
	/// `undefined`, compact JSON for objects and arrays, plain text otherwise.
	pub fn to_display_string(&self) -> String {
		match self {
			Self::Undefined => String::new(),
			Self::Array(_) | Self::Object(_) => self.to_compact_json().unwrap_or_default(),
			_ => self.to_text(),
		}
	}

	/// Convert to JSON. `undefined` and functions have no JSON form; inside
	/// arrays they become `null` and inside objects they are omitted.
	pub fn to_json(&self) -> Option<serde_json::Value> {
		match self {
			Self::Undefined | Self::Function(_) => None,
			Self::Null => Some(serde_json::Value::Null),
			Self::Bool(b) => Some(serde_json::Value::Bool(*b)),
			Self::Number(n) => {
				Some(
					json_number(*n)
						.map_or(serde_json::Value::Null, serde_json::Value::Number),
				)
			}
			Self::String(s) => Some(serde_json::Value::String(s.clone())),
			Self::Array(items) => {
				Some(serde_json::Value::Array(
					items
						.iter()
						.map(|item| item.to_json().unwrap_or(serde_json::Value::Null))
						.collect(),
				))
			}
			Self::Object(map) => {
				let mut object = serde_json::Map::new();
				for (key, value) in map {
					if let Some(json) = value.to_json() {
						object.insert(key.clone(), json);
					}
				}
				Some(serde_json::Value::Object(object))
			}
		}
	}

	pub fn to_compact_json(&self) -> Option<String> {
		self.to_json()
			.and_then(|json| serde_json::to_string(&json).ok())
	}

	pub fn to_pretty_json(&self) -> Option<String> {
		self.to_json()
			.and_then(|json| serde_json::to_string_pretty(&json).ok())
	}

	/// Element count for arrays, character count for text.
	pub fn length(&self) -> Option<usize> {
		match self {
			Self::String(s) => Some(s.encode_utf16().count()),
			Self::Array(items) => Some(items.len()),
			_ => None,
		}
	}
}

impl From<&serde_json::Value> for Value {
	fn from(value: &serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(*b),
			serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
			serde_json::Value::String(s) => Self::String(s.clone()),
			serde_json::Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
			serde_json::Value::Object(map) => {
				Self::Object(
					map.iter()
						.map(|(key, value)| (key.clone(), Self::from(value)))
						.collect(),
				)
			}
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		Self::from(&value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_display_string())
	}
}

/// Render a number the way scripting languages print them: integral values
/// without a fractional part, `NaN`, `Infinity`, and exponent notation from
/// `1e21` up and below `1e-6`.
pub fn format_number(number: f64) -> String {
	if number.is_nan() {
		return "NaN".to_string();
	}

	if number.is_infinite() {
		return if number.is_sign_positive() {
			"Infinity".to_string()
		} else {
			"-Infinity".to_string()
		};
	}

	if number == 0.0 {
		return "0".to_string();
	}

	if number.abs() >= 1e21 || number.abs() < 1e-6 {
		let formatted = format!("{number:e}");
		return match formatted.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => {
				format!("{mantissa}e+{exponent}")
			}
			_ => formatted,
		};
	}

	format!("{number}")
}

/// Join values with a separator. `null` and `undefined` members become empty
/// text.
pub fn join_values(items: &[Value], separator: &str) -> String {
	items
		.iter()
		.map(|item| {
			if item.is_nullish() {
				String::new()
			} else {
				item.to_text()
			}
		})
		.collect::<Vec<_>>()
		.join(separator)
}

fn json_number(number: f64) -> Option<serde_json::Number> {
	if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
		return Some(serde_json::Number::from(number as i64));
	}

	serde_json::Number::from_f64(number)
}

fn parse_numeric_text(text: &str) -> f64 {
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return 0.0;
	}

	match trimmed {
		"Infinity" | "+Infinity" => f64::INFINITY,
		"-Infinity" => f64::NEG_INFINITY,
		_ => {
			// `inf`, `nan` and friends are accepted by `f64::from_str` but are not
			// numeric text here.
			if trimmed.chars().any(|ch| ch.is_ascii_alphabetic() && ch != 'e' && ch != 'E') {
				return f64::NAN;
			}
			trimmed.parse::<f64>().unwrap_or(f64::NAN)
		}
	}
}
