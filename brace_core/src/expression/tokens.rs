use std::fmt::Display;
use std::ops::Range;

use float_cmp::approx_eq;

/// A token of the brace expression language.
#[derive(Debug, Clone)]
pub enum Token {
	/// An identifier, e.g. `Webhook` or `formatDate`.
	Ident(String),
	/// A number literal, e.g. `42` or `3.5e2`.
	Number(f64),
	/// A string literal with quotes removed and escapes resolved.
	String(String),
	/// `true`
	True,
	/// `false`
	False,
	/// `null`
	Null,
	/// `undefined`
	Undefined,
	/// `.`
	Dot,
	/// `?.`
	OptionalDot,
	/// `,`
	Comma,
	/// `:`
	Colon,
	/// `?`
	Question,
	/// `??`
	NullishCoalesce,
	/// `(`
	ParenOpen,
	/// `)`
	ParenClose,
	/// `[`
	BracketOpen,
	/// `]`
	BracketClose,
	/// `{`
	BraceOpen,
	/// `}`
	BraceClose,
	/// `+`
	Plus,
	/// `-`
	Minus,
	/// `*`
	Star,
	/// `/`
	Slash,
	/// `%`
	Percent,
	/// `!`
	Bang,
	/// `&&`
	And,
	/// `||`
	Or,
	/// `==`
	Eq,
	/// `!=`
	NotEq,
	/// `===`
	StrictEq,
	/// `!==`
	StrictNotEq,
	/// `<`
	Less,
	/// `<=`
	LessEq,
	/// `>`
	Greater,
	/// `>=`
	GreaterEq,
}

impl Eq for Token {}
impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Token::Ident(value), Token::Ident(other_value))
			| (Token::String(value), Token::String(other_value)) => value == other_value,
			(Token::Number(value), Token::Number(other_value)) => {
				approx_eq!(f64, *value, *other_value, ulps = 2)
			}
			(Token::Ident(_) | Token::String(_) | Token::Number(_), _)
			| (_, Token::Ident(_) | Token::String(_) | Token::Number(_)) => false,
			_ => std::mem::discriminant(self) == std::mem::discriminant(other),
		}
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Token::Ident(ident) => write!(f, "{ident}"),
			Token::Number(number) => write!(f, "{number}"),
			Token::String(string) => write!(f, "{string:?}"),
			Token::True => write!(f, "true"),
			Token::False => write!(f, "false"),
			Token::Null => write!(f, "null"),
			Token::Undefined => write!(f, "undefined"),
			Token::Dot => write!(f, "."),
			Token::OptionalDot => write!(f, "?."),
			Token::Comma => write!(f, ","),
			Token::Colon => write!(f, ":"),
			Token::Question => write!(f, "?"),
			Token::NullishCoalesce => write!(f, "??"),
			Token::ParenOpen => write!(f, "("),
			Token::ParenClose => write!(f, ")"),
			Token::BracketOpen => write!(f, "["),
			Token::BracketClose => write!(f, "]"),
			Token::BraceOpen => write!(f, "{{"),
			Token::BraceClose => write!(f, "}}"),
			Token::Plus => write!(f, "+"),
			Token::Minus => write!(f, "-"),
			Token::Star => write!(f, "*"),
			Token::Slash => write!(f, "/"),
			Token::Percent => write!(f, "%"),
			Token::Bang => write!(f, "!"),
			Token::And => write!(f, "&&"),
			Token::Or => write!(f, "||"),
			Token::Eq => write!(f, "=="),
			Token::NotEq => write!(f, "!="),
			Token::StrictEq => write!(f, "==="),
			Token::StrictNotEq => write!(f, "!=="),
			Token::Less => write!(f, "<"),
			Token::LessEq => write!(f, "<="),
			Token::Greater => write!(f, ">"),
			Token::GreaterEq => write!(f, ">="),
		}
	}
}

/// A token together with the byte range it occupies in the snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
	pub token: Token,
	pub span: Range<usize>,
}

impl SpannedToken {
	pub fn new(token: Token, span: Range<usize>) -> Self {
		Self { token, span }
	}
}
