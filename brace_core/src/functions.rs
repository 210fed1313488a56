use std::collections::HashMap;
use std::fmt::Display;
use std::sync::LazyLock;

use chrono::DateTime;
use chrono::Datelike;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::SecondsFormat;
use chrono::Timelike;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::Clock;
use crate::Value;
use crate::value::join_values;

/// The pattern used by `formatDate` when none is given.
pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD";
/// The currency used by `formatCurrency` when none is given.
pub const DEFAULT_CURRENCY: &str = "USD";
/// The separator used by `join` when none is given.
pub const DEFAULT_SEPARATOR: &str = ", ";
/// Returned by `formatDate` when its input cannot be read as a date.
pub const INVALID_DATE: &str = "Invalid Date";

/// A helper function callable from expressions.
///
/// The set is closed: every helper is known at compile time and carries a
/// fixed description and usage template for display.
///
/// Helpers never fail. Input they cannot interpret produces a sentinel (such
/// as `Invalid Date`) or a best-effort fallback instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum HelperFunction {
	/// Upper-case the text form of a value.
	ToUpper,
	/// Lower-case the text form of a value.
	ToLower,
	/// Cut text to a maximum length and append `...`.
	Truncate,
	/// Render a date using `YYYY`, `MM`, `DD`, `HH`, `mm` and `ss` tokens.
	FormatDate,
	/// The current instant as RFC 3339 text.
	Now,
	/// Render an amount as currency.
	FormatCurrency,
	/// Round half-up to a number of decimal places.
	Round,
	/// Pretty-printed JSON.
	Json,
	/// Join list members with a separator.
	Join,
	/// Element or character count.
	Length,
}

impl HelperFunction {
	/// Every helper, in the order they are listed in the autocomplete catalog.
	pub const ALL: [HelperFunction; 10] = [
		Self::ToUpper,
		Self::ToLower,
		Self::Truncate,
		Self::FormatDate,
		Self::Now,
		Self::FormatCurrency,
		Self::Round,
		Self::Json,
		Self::Join,
		Self::Length,
	];

	pub fn name(self) -> &'static str {
		match self {
			Self::ToUpper => "toUpper",
			Self::ToLower => "toLower",
			Self::Truncate => "truncate",
			Self::FormatDate => "formatDate",
			Self::Now => "now",
			Self::FormatCurrency => "formatCurrency",
			Self::Round => "round",
			Self::Json => "json",
			Self::Join => "join",
			Self::Length => "length",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		FunctionRegistry::global().get(name)
	}

	pub fn description(self) -> &'static str {
		match self {
			Self::ToUpper => "Convert text to uppercase",
			Self::ToLower => "Convert text to lowercase",
			Self::Truncate => "Shorten text to a maximum length, appending \"...\" when cut",
			Self::FormatDate => {
				"Format a date using YYYY, MM, DD, HH, mm and ss tokens (default \"YYYY-MM-DD\")"
			}
			Self::Now => "The current date and time as an ISO 8601 timestamp",
			Self::FormatCurrency => "Format a number as currency (default \"USD\")",
			Self::Round => "Round a number to a number of decimal places (default 0)",
			Self::Json => "Serialize a value as pretty-printed JSON",
			Self::Join => "Join list items with a separator (default \", \")",
			Self::Length => "The number of items in a list or characters in text",
		}
	}

	pub fn usage(self) -> &'static str {
		match self {
			Self::ToUpper => "toUpper(value)",
			Self::ToLower => "toLower(value)",
			Self::Truncate => "truncate(value, 20)",
			Self::FormatDate => "formatDate(value, \"YYYY-MM-DD\")",
			Self::Now => "now()",
			Self::FormatCurrency => "formatCurrency(amount, \"USD\")",
			Self::Round => "round(number, 2)",
			Self::Json => "json(value)",
			Self::Join => "join(list, \", \")",
			Self::Length => "length(value)",
		}
	}

	/// Invoke the helper. Missing arguments are `undefined`; extra arguments
	/// are ignored.
	pub fn call(self, args: &[Value], clock: &Clock) -> Value {
		let arg = |index: usize| args.get(index).unwrap_or(&Value::Undefined);

		match self {
			Self::ToUpper => Value::String(text_or_empty(arg(0)).to_uppercase()),
			Self::ToLower => Value::String(text_or_empty(arg(0)).to_lowercase()),
			Self::Truncate => Value::String(truncate(&text_or_empty(arg(0)), arg(1))),
			Self::FormatDate => {
				let pattern = optional_text(arg(1)).unwrap_or_else(|| DEFAULT_DATE_PATTERN.into());
				Value::String(format_date(arg(0), &pattern))
			}
			Self::Now => Value::String(clock.now().to_rfc3339_opts(SecondsFormat::Millis, true)),
			Self::FormatCurrency => {
				let currency = optional_text(arg(1)).unwrap_or_else(|| DEFAULT_CURRENCY.into());
				Value::String(format_currency(arg(0), &currency))
			}
			Self::Round => {
				let decimals = if arg(1).is_nullish() {
					0.0
				} else {
					arg(1).to_number()
				};
				Value::Number(round_half_up(arg(0).to_number(), decimals))
			}
			Self::Json => {
				arg(0)
					.to_pretty_json()
					.map_or(Value::Undefined, Value::String)
			}
			Self::Join => {
				match arg(0) {
					Value::Array(items) => {
						let separator =
							optional_text(arg(1)).unwrap_or_else(|| DEFAULT_SEPARATOR.into());
						Value::String(join_values(items, &separator))
					}
					other => Value::String(other.to_text()),
				}
			}
			Self::Length => length(arg(0)),
		}
	}
}

impl Display for HelperFunction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

/// The immutable name → helper table, built once on first use.
#[derive(Debug)]
pub struct FunctionRegistry {
	by_name: HashMap<&'static str, HelperFunction>,
}

static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(|| {
	FunctionRegistry {
		by_name: HelperFunction::ALL
			.iter()
			.map(|function| (function.name(), *function))
			.collect(),
	}
});

impl FunctionRegistry {
	pub fn global() -> &'static FunctionRegistry {
		&REGISTRY
	}

	pub fn get(&self, name: &str) -> Option<HelperFunction> {
		self.by_name.get(name).copied()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// Helpers in catalog order.
	pub fn iter(&self) -> impl Iterator<Item = HelperFunction> {
		HelperFunction::ALL.into_iter()
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}
}

fn text_or_empty(value: &Value) -> String {
	if value.is_nullish() {
		String::new()
	} else {
		value.to_text()
	}
}

fn optional_text(value: &Value) -> Option<String> {
	if value.is_nullish() {
		None
	} else {
		Some(value.to_text())
	}
}

fn truncate(text: &str, length: &Value) -> String {
	let length = length.to_number();
	if length.is_nan() {
		return text.to_string();
	}

	let count = text.chars().count();
	if (count as f64) <= length {
		return text.to_string();
	}

	let keep = if length.is_sign_negative() {
		0
	} else {
		length.trunc() as usize
	};
	let mut truncated: String = text.chars().take(keep).collect();
	truncated.push_str("...");
	truncated
}

/// Read a value as a UTC instant.
///
/// Accepts RFC 3339 / RFC 2822 timestamps, naive date-times (taken as UTC),
/// plain `YYYY-MM-DD` dates and epoch milliseconds.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
	match value {
		Value::String(text) => parse_date_text(text.trim()),
		Value::Number(_) | Value::Bool(_) | Value::Null => {
			let millis = value.to_number();
			if !millis.is_finite() {
				return None;
			}
			DateTime::from_timestamp_millis(millis.trunc() as i64)
		}
		_ => None,
	}
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
	if text.is_empty() {
		return None;
	}

	if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
		return Some(parsed.with_timezone(&Utc));
	}

	if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
		return Some(parsed.with_timezone(&Utc));
	}

	for format in [
		"%Y-%m-%dT%H:%M:%S%.f",
		"%Y-%m-%dT%H:%M",
		"%Y-%m-%d %H:%M:%S%.f",
		"%Y-%m-%d %H:%M",
	] {
		if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
			return Some(parsed.and_utc());
		}
	}

	NaiveDate::parse_from_str(text, "%Y-%m-%d")
		.ok()
		.and_then(|date| date.and_hms_opt(0, 0, 0))
		.map(|date| date.and_utc())
}

fn format_date(value: &Value, pattern: &str) -> String {
	let Some(date) = parse_date(value) else {
		return INVALID_DATE.to_string();
	};

	pattern
		.replace("YYYY", &format!("{:04}", date.year()))
		.replace("MM", &format!("{:02}", date.month()))
		.replace("DD", &format!("{:02}", date.day()))
		.replace("HH", &format!("{:02}", date.hour()))
		.replace("mm", &format!("{:02}", date.minute()))
		.replace("ss", &format!("{:02}", date.second()))
}

/// Currency symbols used by the `en-US` rendering. Codes not listed here are
/// rendered with the code itself as prefix.
fn currency_symbol(code: &str) -> Option<&'static str> {
	let symbol = match code {
		"USD" => "$",
		"EUR" => "€",
		"GBP" => "£",
		"JPY" => "¥",
		"CNY" => "CN¥",
		"INR" => "₹",
		"KRW" => "₩",
		"CAD" => "CA$",
		"AUD" => "A$",
		"NZD" => "NZ$",
		"HKD" => "HK$",
		"MXN" => "MX$",
		"BRL" => "R$",
		"TWD" => "NT$",
		"ILS" => "₪",
		"PHP" => "₱",
		"VND" => "₫",
		_ => return None,
	};

	Some(symbol)
}

fn currency_decimals(code: &str) -> usize {
	match code {
		"JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "PYG" | "XAF" | "XOF" => 0,
		"BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
		_ => 2,
	}
}

fn format_currency(amount: &Value, currency: &str) -> String {
	let is_code = currency.len() == 3 && currency.chars().all(|ch| ch.is_ascii_alphabetic());
	if !is_code {
		return format!("{} {currency}", amount.to_text());
	}

	let code = currency.to_ascii_uppercase();
	let number = amount.to_number();
	let sign = if number.is_sign_negative() && number != 0.0 {
		"-"
	} else {
		""
	};

	let digits = if number.is_nan() {
		"NaN".to_string()
	} else if number.is_infinite() {
		"∞".to_string()
	} else {
		let decimals = currency_decimals(&code);
		let factor = 10f64.powi(decimals as i32);
		let rounded = (number.abs() * factor).round() / factor;
		group_thousands(&format!("{rounded:.decimals$}"))
	};

	match currency_symbol(&code) {
		Some(symbol) => format!("{sign}{symbol}{digits}"),
		None => format!("{sign}{code}\u{a0}{digits}"),
	}
}

fn group_thousands(number: &str) -> String {
	let (integer, fraction) = match number.split_once('.') {
		Some((integer, fraction)) => (integer, Some(fraction)),
		None => (number, None),
	};

	let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 4);
	for (index, ch) in integer.chars().enumerate() {
		if index > 0 && (integer.len() - index) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(ch);
	}

	if let Some(fraction) = fraction {
		grouped.push('.');
		grouped.push_str(fraction);
	}

	grouped
}

/// Scale, round half-up, and scale back.
pub fn round_half_up(number: f64, decimals: f64) -> f64 {
	let factor = 10f64.powf(decimals);
	let scaled = number * factor;
	let floor = scaled.floor();
	let rounded = if scaled - floor >= 0.5 {
		floor + 1.0
	} else {
		floor
	};
	rounded / factor
}

fn length(value: &Value) -> Value {
	if let Some(length) = value.length() {
		return Value::Number(length as f64);
	}

	match value {
		Value::Object(map) => {
			map.get("length")
				.filter(|length| !length.is_nullish())
				.cloned()
				.unwrap_or(Value::Number(0.0))
		}
		_ => Value::Number(0.0),
	}
}
