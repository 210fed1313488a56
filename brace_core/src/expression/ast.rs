use std::fmt::Display;

use crate::Value;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	/// A literal number, string, boolean, `null` or `undefined`.
	Literal(Value),
	/// A free variable resolved against the evaluation context.
	Identifier(String),
	/// `[a, b, c]`
	Array(Vec<Expr>),
	/// `{ key: value, "other key": value }`
	Object(Vec<(String, Expr)>),
	/// `object.property` or `object?.property`
	Member {
		object: Box<Expr>,
		property: String,
		optional: bool,
	},
	/// `object[index]`
	Index { object: Box<Expr>, index: Box<Expr> },
	/// `callee(arg, ...)`
	Call { callee: Box<Expr>, args: Vec<Expr> },
	Unary { op: UnaryOp, operand: Box<Expr> },
	Binary {
		op: BinaryOp,
		left: Box<Expr>,
		right: Box<Expr>,
	},
	/// Short-circuiting `&&`, `||` and `??`.
	Logical {
		op: LogicalOp,
		left: Box<Expr>,
		right: Box<Expr>,
	},
	/// `test ? consequent : alternate`
	Conditional {
		test: Box<Expr>,
		consequent: Box<Expr>,
		alternate: Box<Expr>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	/// `!`
	Not,
	/// `-`
	Negate,
	/// `+`
	Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Add,
	Subtract,
	Multiply,
	Divide,
	Remainder,
	Eq,
	NotEq,
	StrictEq,
	StrictNotEq,
	Less,
	LessEq,
	Greater,
	GreaterEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
	And,
	Or,
	Nullish,
}

impl Expr {
	/// Source-like rendering used in error messages, e.g. `Webhook.body`.
	pub fn describe(&self) -> String {
		match self {
			Self::Identifier(name) => name.clone(),
			Self::Member {
				object,
				property,
				optional,
			} => {
				let dot = if *optional { "?." } else { "." };
				format!("{}{dot}{property}", object.describe())
			}
			Self::Index { object, index } => format!("{}[{}]", object.describe(), index.describe()),
			Self::Call { callee, .. } => format!("{}(...)", callee.describe()),
			Self::Literal(Value::String(text)) => format!("{text:?}"),
			Self::Literal(value) => value.to_text(),
			Self::Binary { op, left, right } => {
				format!("({} {op} {})", left.describe(), right.describe())
			}
			_ => "expression".to_string(),
		}
	}
}

impl Display for BinaryOp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let symbol = match self {
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
			Self::Remainder => "%",
			Self::Eq => "==",
			Self::NotEq => "!=",
			Self::StrictEq => "===",
			Self::StrictNotEq => "!==",
			Self::Less => "<",
			Self::LessEq => "<=",
			Self::Greater => ">",
			Self::GreaterEq => ">=",
		};
		write!(f, "{symbol}")
	}
}
