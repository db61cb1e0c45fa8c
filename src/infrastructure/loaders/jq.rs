//! Minimal jq-style path filters for the JSON loader
//!
//! Supports the identity `.`, object keys (`.key`, `."quoted key"`,
//! `.["key"]`), array indices (`.[0]`, `.[-1]`) and iteration (`.[]`),
//! chained in any order, e.g. `.data.items[].name`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(i64),
    Iterate,
}

/// A parsed jq-style path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JqFilter {
    source: String,
    steps: Vec<Step>,
}

impl JqFilter {
    /// The identity filter `.`
    pub fn identity() -> Self {
        Self {
            source: ".".to_string(),
            steps: Vec::new(),
        }
    }

    pub fn parse(expr: &str) -> Result<Self, DomainError> {
        let expr = expr.trim();
        let chars: Vec<char> = expr.chars().collect();

        if chars.first() != Some(&'.') {
            return Err(invalid(expr, "filter must start with '.'"));
        }

        let mut steps = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;

                    let Some(&next) = chars.get(i) else {
                        if steps.is_empty() {
                            break;
                        }
                        return Err(invalid(expr, "trailing '.'"));
                    };

                    match next {
                        '[' => continue,
                        '"' => {
                            let (key, end) = read_quoted(&chars, i)
                                .ok_or_else(|| invalid(expr, "unterminated string"))?;
                            steps.push(Step::Key(key));
                            i = end;
                        }
                        c if c.is_alphabetic() || c == '_' => {
                            let start = i;
                            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                                i += 1;
                            }
                            steps.push(Step::Key(chars[start..i].iter().collect()));
                        }
                        c => return Err(invalid(expr, &format!("unexpected '{}'", c))),
                    }
                }
                '[' => {
                    let mut j = i + 1;
                    while chars.get(j).is_some_and(|c| c.is_whitespace()) {
                        j += 1;
                    }

                    let (step, after) = if chars.get(j) == Some(&'"') {
                        let (key, end) = read_quoted(&chars, j)
                            .ok_or_else(|| invalid(expr, "unterminated string"))?;
                        (Some(Step::Key(key)), end)
                    } else {
                        (None, j)
                    };

                    let close = chars[after..]
                        .iter()
                        .position(|&c| c == ']')
                        .map(|p| p + after)
                        .ok_or_else(|| invalid(expr, "missing ']'"))?;
                    let inner: String = chars[after..close].iter().collect();
                    let inner = inner.trim();

                    let step = match step {
                        Some(_) if !inner.is_empty() => {
                            return Err(invalid(expr, &format!("unexpected '{}'", inner)));
                        }
                        Some(key) => key,
                        None if inner.is_empty() => Step::Iterate,
                        None => inner
                            .parse::<i64>()
                            .map(Step::Index)
                            .map_err(|_| invalid(expr, &format!("invalid index '{}'", inner)))?,
                    };

                    steps.push(step);
                    i = close + 1;
                }
                c => return Err(invalid(expr, &format!("unexpected '{}'", c))),
            }
        }

        Ok(Self {
            source: expr.to_string(),
            steps,
        })
    }

    /// Apply the filter, producing zero or more results
    pub fn apply(&self, value: &Value) -> Result<Vec<Value>, DomainError> {
        let mut current = vec![value.clone()];

        for step in &self.steps {
            let mut next = Vec::with_capacity(current.len());

            for item in current {
                apply_step(step, item, &mut next)?;
            }

            current = next;
        }

        Ok(current)
    }
}

impl Default for JqFilter {
    fn default() -> Self {
        Self::identity()
    }
}

impl FromStr for JqFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for JqFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn apply_step(step: &Step, item: Value, out: &mut Vec<Value>) -> Result<(), DomainError> {
    match (step, item) {
        (Step::Key(key), Value::Object(mut map)) => {
            out.push(map.remove(key).unwrap_or(Value::Null));
        }
        (Step::Key(_) | Step::Index(_), Value::Null) => out.push(Value::Null),
        (Step::Key(key), other) => {
            return Err(DomainError::parse(
                "json",
                format!("Cannot index {} with \"{}\"", type_name(&other), key),
            ));
        }
        (Step::Index(index), Value::Array(mut items)) => {
            let len = items.len() as i64;
            let position = if *index < 0 { len + index } else { *index };

            if (0..len).contains(&position) {
                out.push(items.swap_remove(position as usize));
            } else {
                out.push(Value::Null);
            }
        }
        (Step::Index(_), other) => {
            return Err(DomainError::parse(
                "json",
                format!("Cannot index {} with number", type_name(&other)),
            ));
        }
        (Step::Iterate, Value::Array(items)) => out.extend(items),
        (Step::Iterate, Value::Object(map)) => out.extend(map.into_iter().map(|(_, v)| v)),
        (Step::Iterate, other) => {
            return Err(DomainError::parse(
                "json",
                format!("Cannot iterate over {}", type_name(&other)),
            ));
        }
    }

    Ok(())
}

fn read_quoted(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut key = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                key.push(chars[i + 1]);
                i += 2;
            }
            '"' => return Some((key, i + 1)),
            c => {
                key.push(c);
                i += 1;
            }
        }
    }

    None
}

pub(super) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid(expr: &str, reason: &str) -> DomainError {
    DomainError::validation(format!("Invalid jq filter '{}': {}", expr, reason))
}
