#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String formula into a symbolic expression
///
///# Example
/// ```
/// use GraphAnalyze::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 + sin(x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D("x");
/// assert_eq!(parsed_function(0.0), 0.0);
/// ```
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// 1) the `Expr` tree and its elementary functions
/// 2) evaluation with explicit variable bindings (`Environment`)
/// 3) pretty printing of expressions
pub mod symbolic_engine;
/// turns a symbolic expression into a Rust closure of one variable
pub mod symbolic_lambdify;
/// # Expression
/// user formula with its lifecycle: uncommitted, valid or invalid, keeping the last good compiled state
///# Example
/// ```
/// use GraphAnalyze::symbolic::expression::Expression;
/// let mut f = Expression::new("x");
/// f.set_text("x^2 + x + 1");
/// f.commit().unwrap();
/// assert_eq!(f.evaluate_at(1.0).unwrap(), 3.0);
/// f.set_text("x^2 +");
/// assert!(f.commit().is_err());
/// // the last valid formula is still used
/// assert_eq!(f.evaluate_at(1.0).unwrap(), 3.0);
/// ```
pub mod expression;
