use std::cmp::Ordering;

use super::ast::BinaryOp;
use super::ast::Expr;
use super::ast::LogicalOp;
use super::ast::UnaryOp;
use crate::EvalError;
use crate::EvalResult;
use crate::EvaluationContext;
use crate::ObjectMap;
use crate::Value;
use crate::format_number;

/// Evaluate a parsed expression against a context.
pub fn evaluate_expression(expr: &Expr, context: &EvaluationContext) -> EvalResult<Value> {
	Interpreter { context }.eval(expr)
}

struct Interpreter<'a> {
	context: &'a EvaluationContext,
}

impl Interpreter<'_> {
	fn eval(&self, expr: &Expr) -> EvalResult<Value> {
		match expr {
			Expr::Literal(value) => Ok(value.clone()),
			Expr::Identifier(name) => self.identifier(name),
			Expr::Array(items) => {
				let values = items
					.iter()
					.map(|item| self.eval(item))
					.collect::<EvalResult<Vec<_>>>()?;
				Ok(Value::Array(values))
			}
			Expr::Object(properties) => {
				let mut map = ObjectMap::with_capacity(properties.len());
				for (key, value) in properties {
					map.insert(key.clone(), self.eval(value)?);
				}
				Ok(Value::Object(map))
			}
			Expr::Member { .. } | Expr::Index { .. } | Expr::Call { .. } => {
				Ok(self.chain(expr)?.unwrap_or_default())
			}
			Expr::Unary { op, operand } => {
				let value = self.eval(operand)?;
				Ok(match op {
					UnaryOp::Not => Value::Bool(!value.is_truthy()),
					UnaryOp::Negate => Value::Number(-value.to_number()),
					UnaryOp::Plus => Value::Number(value.to_number()),
				})
			}
			Expr::Binary { op, left, right } => {
				let left = self.eval(left)?;
				let right = self.eval(right)?;
				Ok(binary(*op, &left, &right))
			}
			Expr::Logical { op, left, right } => {
				let left = self.eval(left)?;
				let short_circuit = match op {
					LogicalOp::And => !left.is_truthy(),
					LogicalOp::Or => left.is_truthy(),
					LogicalOp::Nullish => !left.is_nullish(),
				};

				if short_circuit {
					Ok(left)
				} else {
					self.eval(right)
				}
			}
			Expr::Conditional {
				test,
				consequent,
				alternate,
			} => {
				if self.eval(test)?.is_truthy() {
					self.eval(consequent)
				} else {
					self.eval(alternate)
				}
			}
		}
	}

	fn identifier(&self, name: &str) -> EvalResult<Value> {
		self.context
			.lookup(name)
			.cloned()
			.ok_or_else(|| EvalError::resolution(format!("{name} is not defined")))
	}

	/// Evaluate a member/index/call chain. `None` means an optional link
	/// (`?.`) met a nullish value and the rest of the chain was skipped.
	fn chain(&self, expr: &Expr) -> EvalResult<Option<Value>> {
		match expr {
			Expr::Member {
				object,
				property,
				optional,
			} => {
				let Some(target) = self.chain(object)? else {
					return Ok(None);
				};

				if *optional && target.is_nullish() {
					return Ok(None);
				}

				member(&target, property).map(Some)
			}
			Expr::Index { object, index } => {
				let Some(target) = self.chain(object)? else {
					return Ok(None);
				};
				let key = property_key(&self.eval(index)?);

				member(&target, &key).map(Some)
			}
			Expr::Call { callee, args } => {
				let Some(target) = self.chain(callee)? else {
					return Ok(None);
				};

				let Value::Function(function) = target else {
					return Err(EvalError::resolution(format!(
						"{} is not a function",
						callee.describe()
					)));
				};

				let args = args
					.iter()
					.map(|arg| self.eval(arg))
					.collect::<EvalResult<Vec<_>>>()?;
				tracing::trace!(function = function.name(), args = args.len(), "calling helper");

				Ok(Some(function.call(&args, self.context.clock())))
			}
			_ => self.eval(expr).map(Some),
		}
	}
}

/// Read `key` from a value. Reading from `null` or `undefined` fails.
fn member(target: &Value, key: &str) -> EvalResult<Value> {
	let value = match target {
		Value::Undefined | Value::Null => {
			return Err(EvalError::resolution(format!(
				"Cannot read properties of {} (reading '{key}')",
				target.to_text()
			)));
		}
		Value::Object(map) => map.get(key).cloned().unwrap_or_default(),
		Value::Array(items) => {
			if key == "length" {
				Value::Number(items.len() as f64)
			} else {
				array_index(key)
					.and_then(|index| items.get(index))
					.cloned()
					.unwrap_or_default()
			}
		}
		Value::String(text) => {
			if key == "length" {
				Value::Number(text.encode_utf16().count() as f64)
			} else {
				array_index(key)
					.and_then(|index| text.encode_utf16().nth(index))
					.map(|unit| Value::String(String::from_utf16_lossy(&[unit])))
					.unwrap_or_default()
			}
		}
		Value::Bool(_) | Value::Number(_) | Value::Function(_) => Value::Undefined,
	};

	Ok(value)
}

/// The member name an index expression refers to.
fn property_key(index: &Value) -> String {
	match index {
		Value::String(text) => text.clone(),
		Value::Number(number) => format_number(*number),
		other => other.to_text(),
	}
}

/// Canonical non-negative integer keys address list elements; `"01"` and
/// `"+1"` do not.
fn array_index(key: &str) -> Option<usize> {
	let index = key.parse::<usize>().ok()?;
	(index.to_string() == key).then_some(index)
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
	match op {
		BinaryOp::Add => add(left, right),
		BinaryOp::Subtract => Value::Number(left.to_number() - right.to_number()),
		BinaryOp::Multiply => Value::Number(left.to_number() * right.to_number()),
		BinaryOp::Divide => Value::Number(left.to_number() / right.to_number()),
		BinaryOp::Remainder => Value::Number(left.to_number() % right.to_number()),
		BinaryOp::Eq => Value::Bool(loose_equals(left, right)),
		BinaryOp::NotEq => Value::Bool(!loose_equals(left, right)),
		BinaryOp::StrictEq => Value::Bool(left == right),
		BinaryOp::StrictNotEq => Value::Bool(left != right),
		BinaryOp::Less => Value::Bool(compare(left, right) == Some(Ordering::Less)),
		BinaryOp::LessEq => {
			Value::Bool(matches!(
				compare(left, right),
				Some(Ordering::Less | Ordering::Equal)
			))
		}
		BinaryOp::Greater => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
		BinaryOp::GreaterEq => {
			Value::Bool(matches!(
				compare(left, right),
				Some(Ordering::Greater | Ordering::Equal)
			))
		}
	}
}

/// Lists, objects and functions take part in `+` and comparisons through
/// their text form.
fn to_primitive(value: &Value) -> Value {
	match value {
		Value::Array(_) | Value::Object(_) | Value::Function(_) => Value::String(value.to_text()),
		_ => value.clone(),
	}
}

fn add(left: &Value, right: &Value) -> Value {
	let left = to_primitive(left);
	let right = to_primitive(right);

	if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
		return Value::String(format!("{}{}", left.to_text(), right.to_text()));
	}

	Value::Number(left.to_number() + right.to_number())
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
	match (to_primitive(left), to_primitive(right)) {
		(Value::String(left), Value::String(right)) => {
			Some(left.encode_utf16().cmp(right.encode_utf16()))
		}
		(left, right) => left.to_number().partial_cmp(&right.to_number()),
	}
}

/// `==`: `null` and `undefined` only equal each other, booleans compare as
/// numbers, and text against a number compares numerically.
fn loose_equals(left: &Value, right: &Value) -> bool {
	match (left, right) {
		(left, right) if left.is_nullish() || right.is_nullish() => {
			left.is_nullish() && right.is_nullish()
		}
		(Value::Bool(_), _) => loose_equals(&Value::Number(left.to_number()), right),
		(_, Value::Bool(_)) => loose_equals(left, &Value::Number(right.to_number())),
		(Value::Number(number), Value::String(_)) => *number == right.to_number(),
		(Value::String(_), Value::Number(number)) => left.to_number() == *number,
		(
			Value::Array(_) | Value::Object(_) | Value::Function(_),
			Value::Number(_) | Value::String(_),
		) => loose_equals(&to_primitive(left), right),
		(
			Value::Number(_) | Value::String(_),
			Value::Array(_) | Value::Object(_) | Value::Function(_),
		) => loose_equals(left, &to_primitive(right)),
		_ => left == right,
	}
}
