//! # Symbolic Engine Module
//!
//! Symbolic expression tree used by the grapher, the linear ODE solver and every
//! other place where the user types a formula.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Func(MathFunction, _)` - sin, cos, exp, ln, sqrt, ...
//!
//! ### Key Methods
//! - `parse_expression(input)` - string to expression tree (see `parse_expr`)
//! - `eval(&Environment)` - evaluate with explicit variable bindings
//! - `lambdify1D(var)` - compile to a closure of one argument (see `symbolic_lambdify`)
//! - `set_variable(var, value)` - substitute a variable with a constant
//!
//! Variables are never stored in a shared slot: every evaluation receives its bindings
//! through an `Environment` value, or through the argument of a lambdified closure.

#![allow(non_camel_case_types)]

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, LN_2};
use std::fmt;

use strum_macros::{Display, EnumIter, EnumString};

/// Elementary functions of one argument recognised by the parser.
///
/// Names follow muParser; the mathematical notation of the symbolic engine (tg, ctg,
/// arctg, ...) is accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum MathFunction {
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(to_string = "cot", serialize = "ctg")]
    Cot,
    #[strum(to_string = "asin", serialize = "arcsin")]
    Asin,
    #[strum(to_string = "acos", serialize = "arccos")]
    Acos,
    #[strum(to_string = "atan", serialize = "arctg", serialize = "arctan")]
    Atan,
    #[strum(to_string = "acot", serialize = "arcctg")]
    Acot,
    #[strum(to_string = "sinh")]
    Sinh,
    #[strum(to_string = "cosh")]
    Cosh,
    #[strum(to_string = "tanh")]
    Tanh,
    #[strum(to_string = "exp")]
    Exp,
    /// natural logarithm
    #[strum(to_string = "ln")]
    Ln,
    /// base 10, as in muParser
    #[strum(to_string = "log", serialize = "log10")]
    Log10,
    #[strum(to_string = "log2")]
    Log2,
    #[strum(to_string = "sqrt")]
    Sqrt,
    #[strum(to_string = "abs")]
    Abs,
    #[strum(to_string = "sign")]
    Sign,
}

impl MathFunction {
    /// Numerical value of the function at `v`.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            MathFunction::Sin => v.sin(),
            MathFunction::Cos => v.cos(),
            MathFunction::Tan => v.tan(),
            MathFunction::Cot => 1.0 / v.tan(),
            MathFunction::Asin => v.asin(),
            MathFunction::Acos => v.acos(),
            MathFunction::Atan => v.atan(),
            MathFunction::Acot => FRAC_PI_2 - v.atan(),
            MathFunction::Sinh => v.sinh(),
            MathFunction::Cosh => v.cosh(),
            MathFunction::Tanh => v.tanh(),
            MathFunction::Exp => v.exp(),
            MathFunction::Ln => v.ln(),
            MathFunction::Log10 => v.log10(),
            MathFunction::Log2 => v.ln() / LN_2,
            MathFunction::Sqrt => v.sqrt(),
            MathFunction::Abs => v.abs(),
            MathFunction::Sign => {
                if v > 0.0 {
                    1.0
                } else if v < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Elementary function applied to an argument
    Func(MathFunction, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Func(func, arg) => write!(f, "{}({})", func, arg),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

/// Error raised when an expression that parsed correctly cannot be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// a variable has no value in the evaluation environment
    UnboundVariable(String),
    /// the result is not a number (domain error such as `sqrt(-1)`)
    NotANumber { at: f64 },
    /// nothing has been compiled yet
    NotCompiled,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::UnboundVariable(name) => write!(f, "Unbound variable '{}'", name),
            EvalError::NotANumber { at } => write!(f, "Result is not a number at x = {}", at),
            EvalError::NotCompiled => write!(f, "Expression has not been compiled"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Variable bindings handed to `Expr::eval`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: HashMap<String, f64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }
    /// environment binding exactly one variable
    pub fn single(name: &str, value: f64) -> Self {
        Self::new().with(name, value)
    }
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.vars.insert(name.to_string(), value);
        self
    }
    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn apply(self, func: MathFunction) -> Expr {
        Expr::Func(func, self.boxed())
    }

    /// Parses a formula such as `"x^2 + sin(x)"`, see `parse_expr` for the grammar.
    pub fn parse_expression(
        input: &str,
    ) -> Result<Expr, crate::symbolic::parse_expr::ParseError> {
        crate::symbolic::parse_expr::parse_expression_func(input)
    }

    /// Evaluates the expression with the bindings of `env`.
    ///
    /// Every variable met while walking the tree must be bound, otherwise
    /// `EvalError::UnboundVariable` is returned. NaN results are returned as values;
    /// deciding whether NaN is an error is left to the caller.
    pub fn eval(&self, env: &Environment) -> Result<f64, EvalError> {
        match self {
            Expr::Var(name) => env
                .get(name)
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            Expr::Const(val) => Ok(*val),
            Expr::Add(lhs, rhs) => Ok(lhs.eval(env)? + rhs.eval(env)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.eval(env)? - rhs.eval(env)?),
            Expr::Mul(lhs, rhs) => Ok(lhs.eval(env)? * rhs.eval(env)?),
            Expr::Div(lhs, rhs) => Ok(lhs.eval(env)? / rhs.eval(env)?),
            Expr::Pow(base, exp) => Ok(base.eval(env)?.powf(exp.eval(env)?)),
            Expr::Func(func, arg) => Ok(func.apply(arg.eval(env)?)),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            Expr::Add(lhs, rhs) => Expr::Add(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(base.set_variable(var, value)),
                Box::new(exp.set_variable(var, value)),
            ),
            Expr::Func(func, arg) => Expr::Func(*func, Box::new(arg.set_variable(var, value))),
            _ => self.clone(),
        }
    }

    /// Names of all variables in the expression, sorted and without duplicates.
    pub fn extract_variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, acc: &mut Vec<String>) {
            match expr {
                Expr::Var(name) => acc.push(name.clone()),
                Expr::Const(_) => {}
                Expr::Add(lhs, rhs)
                | Expr::Sub(lhs, rhs)
                | Expr::Mul(lhs, rhs)
                | Expr::Div(lhs, rhs)
                | Expr::Pow(lhs, rhs) => {
                    collect(lhs, acc);
                    collect(rhs, acc);
                }
                Expr::Func(_, arg) => collect(arg, acc),
            }
        }
        let mut vars = Vec::new();
        collect(self, &mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    /// Height of the tree, a leaf has depth 1. Walks with an explicit stack.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            match node {
                Expr::Var(_) | Expr::Const(_) => {}
                Expr::Add(lhs, rhs)
                | Expr::Sub(lhs, rhs)
                | Expr::Mul(lhs, rhs)
                | Expr::Div(lhs, rhs)
                | Expr::Pow(lhs, rhs) => {
                    stack.push((lhs.as_ref(), level + 1));
                    stack.push((rhs.as_ref(), level + 1));
                }
                Expr::Func(_, arg) => stack.push((arg.as_ref(), level + 1)),
            }
        }
        deepest
    }

    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.contains_variable(var_name) || rhs.contains_variable(var_name),
            Expr::Func(_, arg) => arg.contains_variable(var_name),
        }
    }
}
