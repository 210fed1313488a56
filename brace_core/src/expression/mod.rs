//! The brace expression language.
//!
//! Snippets inside `{{ }}` are tokenized, parsed and interpreted here. Nothing
//! is handed to a host evaluator: the only symbols a snippet can reach are the
//! bindings of its [`EvaluationContext`](crate::EvaluationContext).
//!
//! ```text
//! expression     = conditional ;
//! conditional    = nullish [ "?" expression ":" expression ] ;
//! nullish        = logical_or { "??" logical_or } ;
//! logical_or     = logical_and { "||" logical_and } ;
//! logical_and    = equality { "&&" equality } ;
//! equality       = comparison { ( "==" | "!=" | "===" | "!==" ) comparison } ;
//! comparison     = additive { ( "<" | "<=" | ">" | ">=" ) additive } ;
//! additive       = multiplicative { ( "+" | "-" ) multiplicative } ;
//! multiplicative = unary { ( "*" | "/" | "%" ) unary } ;
//! unary          = ( "!" | "-" | "+" ) unary | postfix ;
//! postfix        = primary { "." IDENT | "?." IDENT | "[" expression "]"
//!                          | "(" [ expression { "," expression } ] ")" } ;
//! primary        = NUMBER | STRING | "true" | "false" | "null" | "undefined"
//!                | IDENT | "(" expression ")"
//!                | "[" [ expression { "," expression } ] "]"
//!                | "{" [ property { "," property } ] "}" ;
//! property       = ( IDENT | STRING ) ":" expression ;
//! ```
//!
//! Strings are single or double quoted. Escapes are `\n`, `\t`, `\r`, `\\`,
//! `\'`, `\"`, `\uXXXX` (surrogate pairs combine) and `\u{X...}`.
//!
//! There is no assignment, looping or user-defined function, so evaluation
//! always terminates. Nesting deeper than [`MAX_DEPTH`], or a syntax tree taller
//! than [`MAX_HEIGHT`] (long operator or member chains count too), is a syntax
//! error.

pub use ast::*;
pub use interpreter::evaluate_expression;
pub use lexer::tokenize;
pub use parser::MAX_DEPTH;
pub use parser::MAX_HEIGHT;
pub use parser::parse_expression;
pub use tokens::*;

use crate::EvalResult;
use crate::EvaluationContext;
use crate::Value;

mod ast;
mod interpreter;
mod lexer;
mod parser;
mod tokens;

/// Parse and evaluate one cleaned snippet.
pub fn evaluate_snippet(source: &str, context: &EvaluationContext) -> EvalResult<Value> {
	let expr = parse_expression(source)?;
	evaluate_expression(&expr, context)
}
