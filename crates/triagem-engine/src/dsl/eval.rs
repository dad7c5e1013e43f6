//! AST interpreter over one record's match context.

use triagem_core::errors::EquationError;
use triagem_core::types::collections::FxHashMap;
use triagem_core::types::span::Span;

use crate::proximity::{near_sentence, near_tokens, Scope, TokenIndex};

use super::parser::Expr;

/// Everything an equation can see for the current record.
pub struct EvalContext<'a> {
    pub tokens: &'a TokenIndex,
    pub sentences: &'a [Span],
    pub pos: &'a [Span],
    pub neg: &'a [Span],
    pub ctx: &'a FxHashMap<String, Vec<Span>>,
}

impl<'a> EvalContext<'a> {
    /// Span set of a named context group; unknown names are the empty set.
    fn ctx_group(&self, name: &str) -> &'a [Span] {
        self.ctx.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Result of evaluating a subexpression: a boolean or a span set. Bare span
/// sets are truthy iff non-empty.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Bool(bool),
    Spans(&'a [Span]),
}

impl Value<'_> {
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Spans(s) => !s.is_empty(),
        }
    }
}

/// Evaluate an equation AST for one record.
pub fn eval<'a>(expr: &Expr, ctx: &EvalContext<'a>) -> Result<Value<'a>, EquationError> {
    match expr {
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Pos => Ok(Value::Spans(ctx.pos)),
        Expr::Neg => Ok(Value::Spans(ctx.neg)),
        Expr::Ctx(name) => Ok(Value::Spans(ctx.ctx_group(name))),
        Expr::Any(inner) => Ok(Value::Bool(eval(inner, ctx)?.truthy())),
        Expr::Not(inner) => Ok(Value::Bool(!eval(inner, ctx)?.truthy())),
        Expr::And(left, right) => {
            if !eval(left, ctx)?.truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(eval(right, ctx)?.truthy()))
        }
        Expr::Or(left, right) => {
            if eval(left, ctx)?.truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(eval(right, ctx)?.truthy()))
        }
        Expr::Within { window, a, b, scope } => {
            let a = span_set(eval(a, ctx)?)?;
            let b = span_set(eval(b, ctx)?)?;
            let near = match scope {
                Scope::Tokens => near_tokens(ctx.tokens, a, b, *window),
                Scope::Sentence => near_sentence(ctx.sentences, a, b),
            };
            Ok(Value::Bool(near))
        }
    }
}

fn span_set(value: Value<'_>) -> Result<&[Span], EquationError> {
    match value {
        Value::Spans(s) => Ok(s),
        Value::Bool(_) => Err(EquationError::TypeMismatch {
            function: "WITHIN",
            message: "a span set (POS(), NEG(), or CTX(...)), got a boolean".into(),
        }),
    }
}
