/// parse document with structure like
/// ```text
/// title1
/// key1: value1, value2
/// key2: value3
/// title2
/// key3: value4
/// ```
/// which has titles on their own lines followed by pairs key - list of values, one pair per line.
/// Values run up to a comma or the end of the line, so formulas with spaces ("x^2 + x + 1") are one value.
/// Lines starting with //, #, % or ; are comments.
use log::warn;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, space0},
    combinator::{all_consuming, map, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, separated_pair},
};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Vec<Value>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// integers are accepted where a float is expected
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskParseError {
    /// a line that is neither a title nor a key: value pair
    Syntax { line: usize, text: String },
    /// a key: value pair before the first title
    KeyOutsideSection { line: usize, key: String },
}

impl Display for TaskParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskParseError::Syntax { line, text } => {
                write!(f, "Line {}: cannot parse '{}'", line, text)
            }
            TaskParseError::KeyOutsideSection { line, key } => {
                write!(f, "Line {}: key '{}' appears before any section title", line, key)
            }
        }
    }
}

impl std::error::Error for TaskParseError {}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Title(String),
    Pair(String, Vec<Value>),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Parses a title (word characters without spaces)
pub fn parse_title(input: &str) -> IResult<&str, String> {
    map(delimited(space0, identifier, space0), String::from).parse(input)
}

/// Parses a key (word characters without spaces)
pub fn parse_key(input: &str) -> IResult<&str, String> {
    map(identifier, String::from).parse(input)
}

fn typed_value(s: &str) -> Value {
    // Try parsing as different types in order
    if let Ok(val) = s.parse::<i64>() {
        Value::Integer(val)
    } else if let Ok(val) = s.parse::<f64>() {
        Value::Float(val)
    } else if let Ok(val) = s.parse::<bool>() {
        Value::Boolean(val)
    } else {
        Value::String(s.to_string())
    }
}

/// Parses a single value: everything up to a comma or the end of the line, trimmed
pub fn parse_value(input: &str) -> IResult<&str, Value> {
    map(take_while1(|c: char| !matches!(c, ',' | '\n')), |s: &str| {
        typed_value(s.trim())
    })
    .parse(input)
}

/// Parses comma separated values
pub fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator_coma = delimited(space0, tag(","), space0);
    separated_list1(separator_coma, parse_value).parse(input)
}

/// Parses a key-value pair where value is a list
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    separated_pair(
        delimited(space0, parse_key, space0),
        colon_separator,
        parse_value_list,
    )
    .parse(input)
}

fn parse_line(input: &str) -> IResult<&str, Line> {
    all_consuming(alt((
        map(parse_key_value_pair, |(key, values)| Line::Pair(key, values)),
        map(parse_title, Line::Title),
    )))
    .parse(input)
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with("//")
        || trimmed.starts_with('#')
        || trimmed.starts_with('%')
        || trimmed.starts_with(';')
}

/// Parses the entire document into a HashMap of sections. A repeated key overwrites the earlier one.
pub fn parse_document(input: &str) -> Result<DocumentMap, TaskParseError> {
    let mut document = DocumentMap::new();
    let mut current: Option<String> = None;
    for (number, text) in input.lines().enumerate() {
        if is_comment(text) {
            continue;
        }
        let line = number + 1;
        let (_, parsed) = parse_line(text).map_err(|_| TaskParseError::Syntax {
            line,
            text: text.trim().to_string(),
        })?;
        match parsed {
            Line::Title(title) => {
                document.entry(title.clone()).or_default();
                current = Some(title);
            }
            Line::Pair(key, values) => {
                let title = current
                    .as_ref()
                    .ok_or(TaskParseError::KeyOutsideSection { line, key: key.clone() })?;
                let section = document.entry(title.clone()).or_default();
                if section.insert(key.clone(), values).is_some() {
                    warn!("key '{}' repeated in section '{}', last value kept", key, title);
                }
            }
        }
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("  graph_1  ").unwrap();
        assert_eq!(title, "graph_1");
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("42").unwrap().1, Value::Integer(42));
        assert_eq!(parse_value("-1.5e-3").unwrap().1, Value::Float(-1.5e-3));
        assert_eq!(parse_value("true").unwrap().1, Value::Boolean(true));
        assert_eq!(
            parse_value("x^2 + x + 1").unwrap().1,
            Value::String("x^2 + x + 1".to_string())
        );
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (_, (key, values)) = parse_key_value_pair("domain: -1, 1.5").unwrap();
        assert_eq!(key, "domain");
        assert_eq!(values, vec![Value::Integer(-1), Value::Float(1.5)]);
    }

    #[test]
    fn test_parse_document() {
        let document = "
            // comment
            graph
            formula: sin(x) * x
            domain: -2, 2
            # another comment
            ode
            max_steps: 1000
            empty_section
        ";
        let parsed = parse_document(document).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(
            parsed["graph"]["formula"],
            vec![Value::String("sin(x) * x".to_string())]
        );
        assert_eq!(
            parsed["graph"]["domain"],
            vec![Value::Integer(-2), Value::Integer(2)]
        );
        assert_eq!(parsed["ode"]["max_steps"], vec![Value::Integer(1000)]);
        assert!(parsed["empty_section"].is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("\n  // only comments\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document() {
        assert_eq!(
            parse_document("graph\nformula x^2"),
            Err(TaskParseError::Syntax {
                line: 2,
                text: "formula x^2".to_string()
            })
        );
        assert_eq!(
            parse_document("formula: x"),
            Err(TaskParseError::KeyOutsideSection {
                line: 1,
                key: "formula".to_string()
            })
        );
        assert!(parse_document("graph\nkey:").is_err());
    }
}
