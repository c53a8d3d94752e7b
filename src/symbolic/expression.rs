//! User formula bound to one free variable.
//!
//! An `Expression` owns the text typed by the user, the name of its free variable
//! (usually `x`), the current value of that variable and the last expression that
//! compiled successfully. The text goes through three states:
//!
//! * `Uncommitted` - edited (or empty) and not validated yet
//! * `Valid` - parsed, every variable bound, compiled
//! * `Invalid` - the last commit failed; the previous compiled expression is kept
//!
//! Evaluation never touches shared state: the variable value is an argument of
//! `evaluate_at`, so one expression can be evaluated from several threads and unrelated
//! expressions (e.g. the coefficients of an ODE) never share a variable cell.
use crate::symbolic::parse_expr::{MAX_FUNC_LENGTH, ParseError, parse_bounded};
use crate::symbolic::symbolic_engine::{Environment, EvalError, Expr};
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// the text is empty: nothing to validate yet
    Empty,
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExpressionError::Empty => write!(f, "Formula is empty"),
            ExpressionError::Parse(e) => write!(f, "Parse error: {}", e),
            ExpressionError::Eval(e) => write!(f, "Evaluation error: {}", e),
        }
    }
}

impl std::error::Error for ExpressionError {}

impl From<ParseError> for ExpressionError {
    fn from(e: ParseError) -> Self {
        ExpressionError::Parse(e)
    }
}

impl From<EvalError> for ExpressionError {
    fn from(e: EvalError) -> Self {
        ExpressionError::Eval(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionState {
    Uncommitted,
    Valid,
    Invalid(ExpressionError),
}

#[derive(Clone)]
struct Compiled {
    text: String,
    expr: Expr,
    func: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl fmt::Debug for Compiled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled")
            .field("text", &self.text)
            .field("expr", &self.expr)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Expression {
    text: String,
    variable: String,
    value: f64,
    max_length: usize,
    state: ExpressionState,
    compiled: Option<Compiled>,
}

impl Default for Expression {
    fn default() -> Self {
        Expression::new("x")
    }
}

impl Expression {
    /// empty, uncommitted expression of the free variable `variable`
    pub fn new(variable: &str) -> Expression {
        Expression {
            text: String::new(),
            variable: variable.to_string(),
            value: 0.0,
            max_length: MAX_FUNC_LENGTH,
            state: ExpressionState::Uncommitted,
            compiled: None,
        }
    }

    /// Parses and commits `text` as a function of `x`.
    pub fn from_formula(text: &str) -> Result<Expression, ExpressionError> {
        let mut expression = Expression::new("x");
        expression.set_text(text);
        expression.commit()?;
        Ok(expression)
    }

    /// Committed expression equal to `value` everywhere.
    pub(crate) fn constant(variable: &str, value: f64) -> Expression {
        let text = value.to_string();
        let expr = Expr::Const(value);
        let func: Arc<dyn Fn(f64) -> f64 + Send + Sync> = Arc::from(expr.lambdify1D(variable));
        Expression {
            text: text.clone(),
            state: ExpressionState::Valid,
            compiled: Some(Compiled { text, expr, func }),
            ..Expression::new(variable)
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Replaces the text. The expression becomes `Uncommitted` until the next `commit`,
    /// which also clears a previous invalid flag.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.state = ExpressionState::Uncommitted;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn variable_name(&self) -> &str {
        &self.variable
    }

    /// Value of the free variable used by `evaluate` and by validation at commit time.
    pub fn set_variable(&mut self, value: f64) {
        self.value = value;
    }

    pub fn variable(&self) -> f64 {
        self.value
    }

    /// Validates the current text and, on success, replaces the compiled expression.
    ///
    /// Validation parses the text and evaluates it at the current variable value: a
    /// foreign variable makes the expression invalid, a NaN result does not (the function
    /// may simply be undefined at that point). On failure the last good compiled
    /// expression stays in place. An empty text is not an error state: the expression
    /// stays `Uncommitted` and `ExpressionError::Empty` is returned.
    pub fn commit(&mut self) -> Result<(), ExpressionError> {
        if self.text.trim().is_empty() {
            self.state = ExpressionState::Uncommitted;
            return Err(ExpressionError::Empty);
        }
        match self.compile() {
            Ok(compiled) => {
                debug!("formula '{}' compiled as {}", self.text, compiled.expr);
                self.compiled = Some(compiled);
                self.state = ExpressionState::Valid;
                Ok(())
            }
            Err(e) => {
                warn!("formula '{}' rejected: {}", self.text, e);
                self.state = ExpressionState::Invalid(e.clone());
                Err(e)
            }
        }
    }

    fn compile(&self) -> Result<Compiled, ExpressionError> {
        let expr = parse_bounded(&self.text, self.max_length)?;
        let env = Environment::single(&self.variable, self.value);
        match expr.eval(&env) {
            Ok(_) | Err(EvalError::NotANumber { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        let func: Arc<dyn Fn(f64) -> f64 + Send + Sync> = Arc::from(expr.lambdify1D(&self.variable));
        Ok(Compiled {
            text: self.text.clone(),
            expr,
            func,
        })
    }

    pub fn state(&self) -> &ExpressionState {
        &self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state == ExpressionState::Valid
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.state, ExpressionState::Invalid(_))
    }

    pub fn is_uncommitted(&self) -> bool {
        self.state == ExpressionState::Uncommitted
    }

    /// whether a working expression exists, possibly older than the current text
    pub fn has_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// text of the expression `evaluate_at` currently uses
    pub fn compiled_text(&self) -> Option<&str> {
        self.compiled.as_ref().map(|c| c.text.as_str())
    }

    pub fn symbolic(&self) -> Option<&Expr> {
        self.compiled.as_ref().map(|c| &c.expr)
    }

    /// Evaluates the last compiled expression at `x`. NaN results are `EvalError::NotANumber`.
    pub fn evaluate_at(&self, x: f64) -> Result<f64, EvalError> {
        let compiled = self.compiled.as_ref().ok_or(EvalError::NotCompiled)?;
        let y = (compiled.func)(x);
        if y.is_nan() {
            Err(EvalError::NotANumber { at: x })
        } else {
            Ok(y)
        }
    }

    /// Evaluates at the current value of the free variable.
    pub fn evaluate(&self) -> Result<f64, EvalError> {
        self.evaluate_at(self.value)
    }
}
