use std::str::Chars;

use logos::Logos;
use snailquote::unescape;

use super::tokens::SpannedToken;
use super::tokens::Token;
use crate::EvalError;
use crate::EvalResult;

/// Raw tokens produced by logos. Literal payloads are decoded afterwards.
#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
	#[token("true")]
	True,
	#[token("false")]
	False,
	#[token("null")]
	Null,
	#[token("undefined")]
	Undefined,
	#[token(".")]
	Dot,
	#[token("?.")]
	OptionalDot,
	#[token(",")]
	Comma,
	#[token(":")]
	Colon,
	#[token("?")]
	Question,
	#[token("??")]
	NullishCoalesce,
	#[token("(")]
	ParenOpen,
	#[token(")")]
	ParenClose,
	#[token("[")]
	BracketOpen,
	#[token("]")]
	BracketClose,
	#[token("{")]
	BraceOpen,
	#[token("}")]
	BraceClose,
	#[token("+")]
	Plus,
	#[token("-")]
	Minus,
	#[token("*")]
	Star,
	#[token("/")]
	Slash,
	#[token("%")]
	Percent,
	#[token("!")]
	Bang,
	#[token("&&")]
	And,
	#[token("||")]
	Or,
	#[token("==")]
	Eq,
	#[token("!=")]
	NotEq,
	#[token("===")]
	StrictEq,
	#[token("!==")]
	StrictNotEq,
	#[token("<")]
	Less,
	#[token("<=")]
	LessEq,
	#[token(">")]
	Greater,
	#[token(">=")]
	GreaterEq,
	#[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
	Ident,
	#[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
	Number,
	#[regex(r#""([^"\\]|\\.)*""#)]
	DoubleQuotedString,
	#[regex(r"'([^'\\]|\\.)*'")]
	SingleQuotedString,
}

/// Split a snippet into tokens.
///
/// The first unrecognized character, malformed number or bad escape sequence
/// stops tokenization with a syntax error pointing at its byte offset.
pub fn tokenize(source: &str) -> EvalResult<Vec<SpannedToken>> {
	let mut tokens = Vec::new();

	for (result, span) in RawToken::lexer(source).spanned() {
		let slice = &source[span.clone()];

		let Ok(raw) = result else {
			return Err(EvalError::syntax(
				format!("Invalid or unexpected token '{slice}'"),
				span.start,
			));
		};

		let token = match raw {
			RawToken::True => Token::True,
			RawToken::False => Token::False,
			RawToken::Null => Token::Null,
			RawToken::Undefined => Token::Undefined,
			RawToken::Dot => Token::Dot,
			RawToken::OptionalDot => Token::OptionalDot,
			RawToken::Comma => Token::Comma,
			RawToken::Colon => Token::Colon,
			RawToken::Question => Token::Question,
			RawToken::NullishCoalesce => Token::NullishCoalesce,
			RawToken::ParenOpen => Token::ParenOpen,
			RawToken::ParenClose => Token::ParenClose,
			RawToken::BracketOpen => Token::BracketOpen,
			RawToken::BracketClose => Token::BracketClose,
			RawToken::BraceOpen => Token::BraceOpen,
			RawToken::BraceClose => Token::BraceClose,
			RawToken::Plus => Token::Plus,
			RawToken::Minus => Token::Minus,
			RawToken::Star => Token::Star,
			RawToken::Slash => Token::Slash,
			RawToken::Percent => Token::Percent,
			RawToken::Bang => Token::Bang,
			RawToken::And => Token::And,
			RawToken::Or => Token::Or,
			RawToken::Eq => Token::Eq,
			RawToken::NotEq => Token::NotEq,
			RawToken::StrictEq => Token::StrictEq,
			RawToken::StrictNotEq => Token::StrictNotEq,
			RawToken::Less => Token::Less,
			RawToken::LessEq => Token::LessEq,
			RawToken::Greater => Token::Greater,
			RawToken::GreaterEq => Token::GreaterEq,
			RawToken::Ident => Token::Ident(slice.to_string()),
			RawToken::Number => {
				let number = slice.parse::<f64>().map_err(|_| {
					EvalError::syntax(format!("Invalid number '{slice}'"), span.start)
				})?;
				Token::Number(number)
			}
			RawToken::DoubleQuotedString | RawToken::SingleQuotedString => {
				Token::String(process_string(slice, span.start)?)
			}
		};

		tokens.push(SpannedToken::new(token, span));
	}

	tracing::trace!(count = tokens.len(), "tokenized snippet");

	Ok(tokens)
}

/// Strip the surrounding quotes and resolve escape sequences.
fn process_string(slice: &str, offset: usize) -> EvalResult<String> {
	let inner = &slice[1..slice.len() - 1];

	if !inner.contains('\\') {
		return Ok(inner.to_string());
	}

	// Re-quote as a double-quoted string so single-quoted literals share the
	// same escape handling.
	let mut quoted = String::with_capacity(inner.len() + 2);
	quoted.push('"');
	let mut chars = inner.chars();
	while let Some(ch) = chars.next() {
		match ch {
			'\\' => {
				match chars.next() {
					Some('\'') => quoted.push('\''),
					Some('u') if !chars.as_str().starts_with('{') => {
						let Some(mut code) = hex_unit(&mut chars) else {
							return Err(EvalError::syntax("Invalid Unicode escape sequence", offset));
						};

						// Combine a UTF-16 surrogate pair written as `\uD83D\uDE00`.
						if (0xD800..0xDC00).contains(&code) && chars.as_str().starts_with("\\u") {
							let mut lookahead = chars.clone();
							lookahead.nth(1);
							if let Some(low) =
								hex_unit(&mut lookahead).filter(|low| (0xDC00..0xE000).contains(low))
							{
								code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
								chars = lookahead;
							}
						}

						quoted.push_str(&format!("\\u{{{code:x}}}"));
					}
					Some(next) => {
						quoted.push('\\');
						quoted.push(next);
					}
					None => quoted.push('\\'),
				}
			}
			'"' => quoted.push_str("\\\""),
			_ => quoted.push(ch),
		}
	}
	quoted.push('"');

	unescape(&quoted).map_err(|_| EvalError::syntax("Invalid escape sequence in string", offset))
}

/// Read the four hex digits of a `\uXXXX` escape.
fn hex_unit(chars: &mut Chars<'_>) -> Option<u32> {
	let digits = chars.as_str().get(..4)?;
	if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
		return None;
	}

	let code = u32::from_str_radix(digits, 16).ok()?;
	chars.nth(3);
	Some(code)
}
