//! turns a String formula into a symbolic expression
//!
//! Grammar, lowest precedence first:
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom ('^' unary)?
//! atom   := number | '(' expr ')' | name '(' expr ')' | name
//! ```
//! `^` is right associative and binds tighter than unary minus, so `-x^2` is `-(x^2)`.
//!
//! # Example
//! ```
//! use GraphAnalyze::symbolic::parse_expr::parse_expression_func;
//! use GraphAnalyze::symbolic::symbolic_engine::Environment;
//! let expr = parse_expression_func("x^2 + x + 1").unwrap();
//! assert_eq!(expr.eval(&Environment::single("x", 1.0)).unwrap(), 3.0);
//! ```
use crate::symbolic::symbolic_engine::{Expr, MathFunction};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, cut, map, map_res, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded},
};
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

/// longest formula accepted by the input field
pub const MAX_FUNC_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Empty,
    TooLong { length: usize, max: usize },
    UnknownFunction { name: String, position: usize },
    UnexpectedEnd,
    Unexpected { position: usize, found: char },
    /// brackets, calls or signs nested deeper than `MAX_NESTING_DEPTH`
    TooDeep { position: usize },
    /// expression tree deeper than `MAX_TREE_DEPTH`, e.g. a very long chain of sums
    TooComplex { depth: usize, max: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Empty formula"),
            ParseError::TooLong { length, max } => {
                write!(f, "Formula is {} characters long, at most {} allowed", length, max)
            }
            ParseError::UnknownFunction { name, position } => {
                write!(f, "Unknown function '{}' at position {}", name, position)
            }
            ParseError::UnexpectedEnd => write!(f, "Unexpected end of formula"),
            ParseError::Unexpected { position, found } => {
                write!(f, "Unexpected '{}' at position {}", found, position)
            }
            ParseError::TooDeep { position } => {
                write!(f, "Formula nested too deeply at position {}", position)
            }
            ParseError::TooComplex { depth, max } => {
                write!(f, "Formula tree has depth {}, at most {} allowed", depth, max)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn from_nom(input: &str, error: NomError<&str>) -> ParseError {
        let position = input.len() - error.input.len();
        let rest = error.input;
        if error.code == ErrorKind::TooLarge {
            return ParseError::TooDeep { position };
        }
        if error.code == ErrorKind::Tag {
            if let Ok((_, name)) = identifier(rest) {
                return ParseError::UnknownFunction {
                    name: name.to_string(),
                    position,
                };
            }
        }
        match rest.chars().next() {
            Some(found) => ParseError::Unexpected { position, found },
            None => ParseError::UnexpectedEnd,
        }
    }
}

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = NomError<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = NomError<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// decimal number with optional fraction and exponent: 2, 2.5, .5, 1e-3
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((
            alt((
                recognize((digit1, opt((char('.'), digit0)))),
                recognize((char('.'), digit1)),
            )),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Deepest nesting of brackets, function calls, signs and exponents the parser descends into.
pub const MAX_NESTING_DEPTH: usize = 64;
/// Deepest expression tree accepted; evaluation, compilation and printing recurse along it.
pub const MAX_TREE_DEPTH: usize = 512;

fn check_depth(input: &str, depth: usize) -> Result<(), nom::Err<NomError<&str>>> {
    if depth > MAX_NESTING_DEPTH {
        return Err(nom::Err::Failure(NomError::new(input, ErrorKind::TooLarge)));
    }
    Ok(())
}

fn parenthesized(input: &str, depth: usize) -> IResult<&str, Expr> {
    delimited(
        ws(char('(')),
        |i| expr(i, depth + 1),
        cut(ws(char(')'))),
    )
    .parse(input)
}

/// function call, named constant or variable
fn call_or_name(input: &str, depth: usize) -> IResult<&str, Expr> {
    let start = input.trim_start();
    let (rest, name) = ws(identifier).parse(input)?;
    if let Ok((after_open, _)) = char::<&str, NomError<&str>>('(').parse(rest) {
        let function = MathFunction::from_str(name)
            .map_err(|_| nom::Err::Failure(NomError::new(start, ErrorKind::Tag)))?;
        let (rest, argument) = cut(|i| expr(i, depth + 1)).parse(after_open)?;
        let (rest, _) = cut(ws(char(')'))).parse(rest)?;
        return Ok((rest, Expr::Func(function, argument.boxed())));
    }
    let node = match name {
        "pi" | "_pi" => Expr::Const(PI),
        "e" | "_e" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    };
    Ok((rest, node))
}

fn atom(input: &str, depth: usize) -> IResult<&str, Expr> {
    alt((
        map(ws(number), Expr::Const),
        |i| parenthesized(i, depth),
        |i| call_or_name(i, depth),
    ))
    .parse(input)
}

fn power(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (rest, base) = atom(input, depth)?;
    let (rest, exponent) =
        opt(preceded(ws(char('^')), cut(|i| unary(i, depth + 1)))).parse(rest)?;
    let node = match exponent {
        Some(exponent) => Expr::Pow(base.boxed(), exponent.boxed()),
        None => base,
    };
    Ok((rest, node))
}

fn unary(input: &str, depth: usize) -> IResult<&str, Expr> {
    check_depth(input, depth)?;
    alt((
        map(preceded(ws(char('-')), |i| unary(i, depth + 1)), |operand| {
            match operand {
                Expr::Const(val) => Expr::Const(-val),
                other => -other,
            }
        }),
        preceded(ws(char('+')), |i| unary(i, depth + 1)),
        |i| power(i, depth),
    ))
    .parse(input)
}

fn term(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (rest, first) = unary(input, depth)?;
    let (rest, tail) = many0(pair(ws(one_of("*/")), cut(|i| unary(i, depth)))).parse(rest)?;
    let node = tail.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((rest, node))
}

fn expr(input: &str, depth: usize) -> IResult<&str, Expr> {
    check_depth(input, depth)?;
    let (rest, first) = term(input, depth)?;
    let (rest, tail) = many0(pair(ws(one_of("+-")), cut(|i| term(i, depth)))).parse(rest)?;
    let node = tail.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((rest, node))
}

/// Parses a whole formula. Trailing input is an error.
pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    match all_consuming(ws(|i| expr(i, 0))).parse(input) {
        Ok((_, parsed)) => {
            let depth = parsed.depth();
            if depth > MAX_TREE_DEPTH {
                return Err(ParseError::TooComplex {
                    depth,
                    max: MAX_TREE_DEPTH,
                });
            }
            Ok(parsed)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::from_nom(input, e)),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::UnexpectedEnd),
    }
}

/// Same as `parse_expression_func` with a bound on the formula length.
pub fn parse_bounded(input: &str, max_length: usize) -> Result<Expr, ParseError> {
    let length = input.chars().count();
    if length > max_length {
        return Err(ParseError::TooLong {
            length,
            max: max_length,
        });
    }
    parse_expression_func(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Environment;
    use approx::assert_relative_eq;

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Var(name.to_string()))
    }

    fn eval_at(input: &str, x: f64) -> f64 {
        parse_expression_func(input)
            .unwrap()
            .eval(&Environment::single("x", x))
            .unwrap()
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_func("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse_expression_func(".5").unwrap(), Expr::Const(0.5));
        assert_eq!(parse_expression_func("1e-3").unwrap(), Expr::Const(1e-3));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_expression_func("x").unwrap(), Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_expression_func("x + 2").unwrap();
        assert_eq!(expr, Expr::Add(var("x"), Box::new(Expr::Const(2.0))));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = parse_expression_func("x - 2 - 1").unwrap();
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Sub(var("x"), Box::new(Expr::Const(2.0)))),
                Box::new(Expr::Const(1.0))
            )
        );
    }

    #[test]
    fn test_parse_power() {
        let expr = parse_expression_func("x^2").unwrap();
        assert_eq!(expr, Expr::Pow(var("x"), Box::new(Expr::Const(2.0))));
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_relative_eq!(eval_at("2^3^2", 0.0), 512.0);
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_relative_eq!(eval_at("-x^2", 3.0), -9.0);
        assert_relative_eq!(eval_at("2^-1", 0.0), 0.5);
        assert_relative_eq!(eval_at("x - -1", 1.0), 2.0);
    }

    #[test]
    fn test_precedence() {
        assert_relative_eq!(eval_at("x^2 + x + 1", 0.0), 1.0);
        assert_relative_eq!(eval_at("x^2 + x + 1", 1.0), 3.0);
        assert_relative_eq!(eval_at("1 + 2 * 3", 0.0), 7.0);
        assert_relative_eq!(eval_at("(1 + 2) * 3", 0.0), 9.0);
        assert_relative_eq!(eval_at("8 / 4 / 2", 0.0), 1.0);
    }

    #[test]
    fn test_parse_functions() {
        let expr = parse_expression_func("sin(cos(x))").unwrap();
        assert_eq!(
            expr,
            Expr::Func(
                MathFunction::Sin,
                Box::new(Expr::Func(MathFunction::Cos, var("x")))
            )
        );
        assert_relative_eq!(eval_at("log(100)", 0.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(eval_at("ln(e)", 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(eval_at("tg(pi/4)", 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(eval_at("sqrt (x)", 16.0), 4.0);
    }

    #[test]
    fn test_parse_complex_expression() {
        let expected = (2.0_f64 + 3.0) * (4.0 - 2.0) / 1.0_f64.exp();
        assert_relative_eq!(eval_at("(x + 3) * (4 - 2) / exp(1)", 2.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_expression_func("   "), Err(ParseError::Empty));
    }

    #[test]
    fn test_unmatched_brackets() {
        assert!(parse_expression_func("(x + y").is_err());
        assert!(parse_expression_func("x + y)").is_err());
    }

    #[test]
    fn test_dangling_operator() {
        assert!(matches!(
            parse_expression_func("x +"),
            Err(ParseError::Unexpected { found: '+', .. }) | Err(ParseError::UnexpectedEnd)
        ));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            parse_expression_func("2 * foo(x)"),
            Err(ParseError::UnknownFunction {
                name: "foo".to_string(),
                position: 4
            })
        );
    }

    #[test]
    fn test_implicit_multiplication_rejected() {
        assert!(parse_expression_func("2 x").is_err());
    }

    #[test]
    fn test_too_long() {
        let long = "x+".repeat(10) + "x";
        assert!(matches!(
            parse_bounded(&long, 5),
            Err(ParseError::TooLong { max: 5, .. })
        ));
        assert!(parse_bounded("x+1", 5).is_ok());
    }

    #[test]
    fn test_nested_brackets_rejected_without_overflow() {
        let nested = format!("{}x{}", "(".repeat(2000), ")".repeat(2000));
        assert!(nested.len() <= MAX_FUNC_LENGTH);
        assert!(matches!(
            parse_bounded(&nested, MAX_FUNC_LENGTH),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_repeated_signs_rejected_without_overflow() {
        let signs = format!("{}x", "-".repeat(4000));
        assert!(matches!(
            parse_bounded(&signs, MAX_FUNC_LENGTH),
            Err(ParseError::TooDeep { .. })
        ));
        let calls = format!("{}x{}", "sin(".repeat(900), ")".repeat(900));
        assert!(matches!(
            parse_bounded(&calls, MAX_FUNC_LENGTH),
            Err(ParseError::TooDeep { .. })
        ));
        let powers = format!("{}x", "x^".repeat(2000));
        assert!(matches!(
            parse_bounded(&powers, MAX_FUNC_LENGTH),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_moderate_nesting_accepted() {
        let nested = format!("{}x{}", "(".repeat(MAX_NESTING_DEPTH), ")".repeat(MAX_NESTING_DEPTH));
        assert_relative_eq!(eval_at(&nested, 2.0), 2.0);
        assert_relative_eq!(eval_at("--x", 2.0), 2.0);
    }

    #[test]
    fn test_long_sum_chain_is_bounded() {
        let chain = format!("x{}", "+x".repeat(2000));
        assert!(matches!(
            parse_bounded(&chain, MAX_FUNC_LENGTH),
            Err(ParseError::TooComplex { max: MAX_TREE_DEPTH, .. })
        ));
        let short = format!("x{}", "+x".repeat(99));
        assert_relative_eq!(eval_at(&short, 1.0), 100.0);
    }
}
