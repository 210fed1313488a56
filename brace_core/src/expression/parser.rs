use super::ast::BinaryOp;
use super::ast::Expr;
use super::ast::LogicalOp;
use super::ast::UnaryOp;
use super::lexer::tokenize;
use super::tokens::SpannedToken;
use super::tokens::Token;
use crate::EvalError;
use crate::EvalResult;
use crate::Value;

/// Maximum nesting depth of sub-expressions. Deeper input is rejected with a
/// syntax error instead of exhausting the stack.
pub const MAX_DEPTH: usize = 64;

/// Maximum length of any root-to-leaf path through the syntax tree. Nesting,
/// operators and postfix links (`.b`, `?.b`, `[i]`, `(..)`) all count, so a
/// long flat chain such as `1 + 1 + ... + 1` is rejected as well.
pub const MAX_HEIGHT: usize = 256;

/// Tokenize and parse a complete snippet into a single expression.
pub fn parse_expression(source: &str) -> EvalResult<Expr> {
	let tokens = tokenize(source)?;
	let mut parser = Parser::new(&tokens, source.len());
	let expr = parser.expression()?;

	if let Some(extra) = parser.peek_spanned() {
		return Err(unexpected(extra));
	}

	Ok(expr)
}

/// Recursive descent parser, one method per precedence level.
struct Parser<'a> {
	tokens: &'a [SpannedToken],
	/// Current index into `tokens`.
	cursor: usize,
	/// Byte length of the source, reported for errors at end of input.
	end: usize,
	depth: usize,
	/// Upper bound on the height of the tree built so far along the current
	/// path.
	height: usize,
}

impl<'a> Parser<'a> {
	fn new(tokens: &'a [SpannedToken], end: usize) -> Self {
		Self {
			tokens,
			cursor: 0,
			end,
			depth: 0,
			height: 0,
		}
	}

	fn peek(&self) -> Option<&'a Token> {
		self.tokens.get(self.cursor).map(|spanned| &spanned.token)
	}

	fn peek_spanned(&self) -> Option<&'a SpannedToken> {
		self.tokens.get(self.cursor)
	}

	fn advance(&mut self) -> Option<&'a SpannedToken> {
		let spanned = self.tokens.get(self.cursor)?;
		self.cursor += 1;
		Some(spanned)
	}

	/// Consume the next token if it equals `expected`.
	fn eat(&mut self, expected: &Token) -> bool {
		if self.peek() == Some(expected) {
			self.cursor += 1;
			true
		} else {
			false
		}
	}

	fn expect(&mut self, expected: &Token) -> EvalResult<()> {
		match self.advance() {
			Some(spanned) if &spanned.token == expected => Ok(()),
			Some(spanned) => Err(unexpected(spanned)),
			None => Err(self.end_of_input()),
		}
	}

	fn end_of_input(&self) -> EvalError {
		EvalError::syntax("Unexpected end of input", self.end)
	}

	fn offset(&self) -> usize {
		self.peek_spanned()
			.map_or(self.end, |spanned| spanned.span.start)
	}

	fn enter(&mut self) -> EvalResult<()> {
		self.depth += 1;
		if self.depth > MAX_DEPTH {
			return Err(EvalError::syntax("Expression nested too deeply", self.offset()));
		}
		self.link()
	}

	fn leave(&mut self) {
		self.depth -= 1;
		self.height -= 1;
	}

	fn link(&mut self) -> EvalResult<()> {
		self.height += 1;
		if self.height > MAX_HEIGHT {
			return Err(EvalError::syntax("Expression too long", self.offset()));
		}
		Ok(())
	}

	fn unlink(&mut self, links: usize) {
		self.height -= links;
	}

	fn expression(&mut self) -> EvalResult<Expr> {
		self.enter()?;
		let expr = self.conditional();
		self.leave();
		expr
	}

	fn conditional(&mut self) -> EvalResult<Expr> {
		let test = self.nullish()?;

		if !self.eat(&Token::Question) {
			return Ok(test);
		}

		let consequent = self.expression()?;
		self.expect(&Token::Colon)?;
		let alternate = self.expression()?;

		Ok(Expr::Conditional {
			test: Box::new(test),
			consequent: Box::new(consequent),
			alternate: Box::new(alternate),
		})
	}

	fn nullish(&mut self) -> EvalResult<Expr> {
		self.infix_chain(Self::logical_or, |token| {
			matches!(token, Token::NullishCoalesce).then_some(Infix::Logical(LogicalOp::Nullish))
		})
	}

	fn logical_or(&mut self) -> EvalResult<Expr> {
		self.infix_chain(Self::logical_and, |token| {
			matches!(token, Token::Or).then_some(Infix::Logical(LogicalOp::Or))
		})
	}

	fn logical_and(&mut self) -> EvalResult<Expr> {
		self.infix_chain(Self::equality, |token| {
			matches!(token, Token::And).then_some(Infix::Logical(LogicalOp::And))
		})
	}

	fn equality(&mut self) -> EvalResult<Expr> {
		self.infix_chain(Self::comparison, |token| {
			let op = match token {
				Token::Eq => BinaryOp::Eq,
				Token::NotEq => BinaryOp::NotEq,
				Token::StrictEq => BinaryOp::StrictEq,
				Token::StrictNotEq => BinaryOp::StrictNotEq,
				_ => return None,
			};
			Some(Infix::Binary(op))
		})
	}

	fn comparison(&mut self) -> EvalResult<Expr> {
		self.infix_chain(Self::additive, |token| {
			let op = match token {
				Token::Less => BinaryOp::Less,
				Token::LessEq => BinaryOp::LessEq,
				Token::Greater => BinaryOp::Greater,
				Token::GreaterEq => BinaryOp::GreaterEq,
				_ => return None,
			};
			Some(Infix::Binary(op))
		})
	}

	fn additive(&mut self) -> EvalResult<Expr> {
		self.infix_chain(Self::multiplicative, |token| {
			let op = match token {
				Token::Plus => BinaryOp::Add,
				Token::Minus => BinaryOp::Subtract,
				_ => return None,
			};
			Some(Infix::Binary(op))
		})
	}

	fn multiplicative(&mut self) -> EvalResult<Expr> {
		self.infix_chain(Self::unary, |token| {
			let op = match token {
				Token::Star => BinaryOp::Multiply,
				Token::Slash => BinaryOp::Divide,
				Token::Percent => BinaryOp::Remainder,
				_ => return None,
			};
			Some(Infix::Binary(op))
		})
	}

	/// Fold a left-associative run of one precedence level. Every operator
	/// deepens the left spine of the tree by one, so each is charged against
	/// [`MAX_HEIGHT`] until the run ends.
	fn infix_chain(
		&mut self,
		operand: fn(&mut Self) -> EvalResult<Expr>,
		operator: fn(&Token) -> Option<Infix>,
	) -> EvalResult<Expr> {
		let mut left = operand(self)?;
		let mut links = 0;

		while let Some(infix) = self.peek().and_then(operator) {
			self.cursor += 1;
			self.link()?;
			links += 1;
			let right = operand(self)?;
			left = infix.apply(left, right);
		}

		self.unlink(links);
		Ok(left)
	}

	fn unary(&mut self) -> EvalResult<Expr> {
		let op = match self.peek() {
			Some(Token::Bang) => UnaryOp::Not,
			Some(Token::Minus) => UnaryOp::Negate,
			Some(Token::Plus) => UnaryOp::Plus,
			_ => return self.postfix(),
		};
		self.cursor += 1;

		self.enter()?;
		let operand = self.unary();
		self.leave();

		Ok(Expr::Unary {
			op,
			operand: Box::new(operand?),
		})
	}

	fn postfix(&mut self) -> EvalResult<Expr> {
		let mut expr = self.primary()?;
		let mut links = 0;

		loop {
			if matches!(
				self.peek(),
				Some(Token::Dot | Token::OptionalDot | Token::BracketOpen | Token::ParenOpen)
			) {
				self.link()?;
				links += 1;
			}

			match self.peek() {
				Some(Token::Dot) => {
					self.cursor += 1;
					let property = self.property_name()?;
					expr = Expr::Member {
						object: Box::new(expr),
						property,
						optional: false,
					};
				}
				Some(Token::OptionalDot) => {
					self.cursor += 1;
					let property = self.property_name()?;
					expr = Expr::Member {
						object: Box::new(expr),
						property,
						optional: true,
					};
				}
				Some(Token::BracketOpen) => {
					self.cursor += 1;
					let index = self.expression()?;
					self.expect(&Token::BracketClose)?;
					expr = Expr::Index {
						object: Box::new(expr),
						index: Box::new(index),
					};
				}
				Some(Token::ParenOpen) => {
					self.cursor += 1;
					let args = self.list(&Token::ParenClose)?;
					expr = Expr::Call {
						callee: Box::new(expr),
						args,
					};
				}
				_ => {
					self.unlink(links);
					return Ok(expr);
				}
			}
		}
	}

	/// The name after `.` or `?.`. Keywords are valid property names.
	fn property_name(&mut self) -> EvalResult<String> {
		let Some(spanned) = self.advance() else {
			return Err(self.end_of_input());
		};

		match &spanned.token {
			Token::Ident(name) => Ok(name.clone()),
			Token::True | Token::False | Token::Null | Token::Undefined => {
				Ok(spanned.token.to_string())
			}
			_ => Err(unexpected(spanned)),
		}
	}

	/// Comma separated expressions up to `close`. A trailing comma is
	/// allowed.
	fn list(&mut self, close: &Token) -> EvalResult<Vec<Expr>> {
		let mut items = Vec::new();

		loop {
			if self.eat(close) {
				return Ok(items);
			}

			items.push(self.expression()?);

			if self.eat(close) {
				return Ok(items);
			}

			self.expect(&Token::Comma)?;
		}
	}

	fn object(&mut self) -> EvalResult<Expr> {
		let mut properties = Vec::new();

		loop {
			if self.eat(&Token::BraceClose) {
				return Ok(Expr::Object(properties));
			}

			let Some(spanned) = self.advance() else {
				return Err(self.end_of_input());
			};
			let key = match &spanned.token {
				Token::Ident(name) | Token::String(name) => name.clone(),
				Token::Number(number) => Value::Number(*number).to_text(),
				Token::True | Token::False | Token::Null | Token::Undefined => {
					spanned.token.to_string()
				}
				_ => return Err(unexpected(spanned)),
			};
			self.expect(&Token::Colon)?;
			properties.push((key, self.expression()?));

			if self.eat(&Token::BraceClose) {
				return Ok(Expr::Object(properties));
			}

			self.expect(&Token::Comma)?;
		}
	}

	fn primary(&mut self) -> EvalResult<Expr> {
		let Some(spanned) = self.advance() else {
			return Err(self.end_of_input());
		};

		let expr = match &spanned.token {
			Token::Number(number) => Expr::Literal(Value::Number(*number)),
			Token::String(text) => Expr::Literal(Value::String(text.clone())),
			Token::True => Expr::Literal(Value::Bool(true)),
			Token::False => Expr::Literal(Value::Bool(false)),
			Token::Null => Expr::Literal(Value::Null),
			Token::Undefined => Expr::Literal(Value::Undefined),
			Token::Ident(name) => Expr::Identifier(name.clone()),
			Token::ParenOpen => {
				let inner = self.expression()?;
				self.expect(&Token::ParenClose)?;
				inner
			}
			Token::BracketOpen => {
				self.enter()?;
				let items = self.list(&Token::BracketClose);
				self.leave();
				Expr::Array(items?)
			}
			Token::BraceOpen => {
				self.enter()?;
				let object = self.object();
				self.leave();
				object?
			}
			_ => return Err(unexpected(spanned)),
		};

		Ok(expr)
	}
}

fn unexpected(spanned: &SpannedToken) -> EvalError {
	let message = match &spanned.token {
		Token::String(_) => "Unexpected string".to_string(),
		Token::Number(_) => "Unexpected number".to_string(),
		Token::Ident(name) => format!("Unexpected identifier '{name}'"),
		token => format!("Unexpected token '{token}'"),
	};

	EvalError::syntax(message, spanned.span.start)
}

/// An operator of one of the left-associative precedence levels.
#[derive(Clone, Copy)]
enum Infix {
	Binary(BinaryOp),
	Logical(LogicalOp),
}

impl Infix {
	fn apply(self, left: Expr, right: Expr) -> Expr {
		let left = Box::new(left);
		let right = Box::new(right);

		match self {
			Self::Binary(op) => Expr::Binary { op, left, right },
			Self::Logical(op) => Expr::Logical { op, left, right },
		}
	}
}
