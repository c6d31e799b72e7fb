//! Template body parsing.
//!
//! # Syntax
//!
//! - `${name}` - variable interpolation
//! - `${name | filter}` - pipe the value through a filter
//! - `${'literal' | filter(arg, ${var})}` - literal head, filter arguments
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! Filter arguments are quoted strings, numbers, `true`/`false`/`null`,
//! `${var}` references, or bare variable names.

use serde_json::Value;

use crate::error::{Result, TemplateError};

/// A segment of a parsed template body.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Interpolation: ${...}
    Interpolation(Expression),
}

/// Contents of one `${...}` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub head: Operand,
    pub filters: Vec<FilterCall>,
}

/// A value source inside an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Resolved through the render scope.
    Variable(String),
    /// Written in the template.
    Literal(Value),
}

/// One `| name(args)` step of a filter chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<Operand>,
}

/// Parse a template body into segments.
///
/// # Errors
///
/// Returns `Parse` for unterminated `${`, empty expressions, or malformed
/// filter calls.
pub fn parse_template(input: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut chars = input.char_indices().peekable();
    let mut current_literal = String::new();

    while let Some((offset, c)) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }
        match chars.peek().map(|&(_, next)| next) {
            Some('$') => {
                // Escaped: $$ becomes $
                chars.next();
                if chars.peek().map(|&(_, next)| next) == Some('{') {
                    // $${...} -> literal ${...}
                    chars.next();
                    current_literal.push_str("${");
                    for (_, c) in chars.by_ref() {
                        current_literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    current_literal.push('$');
                }
            }
            Some('{') => {
                chars.next();
                let start = offset + 2;
                let end = find_closing_brace(input, start).ok_or_else(|| TemplateError::Parse {
                    offset,
                    message: "unterminated interpolation".to_string(),
                })?;

                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }
                let expression = parse_expression(&input[start..end], offset)?;
                segments.push(Segment::Interpolation(expression));

                // Skip past the closing brace
                while let Some(&(i, _)) = chars.peek() {
                    if i > end {
                        break;
                    }
                    chars.next();
                }
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    Ok(segments)
}

/// Byte index of the `}` closing an interpolation whose body starts at `start`.
fn find_closing_brace(input: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in input[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `separator` outside quotes, braces and parentheses.
fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut last = 0;

    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' | '(' => depth += 1,
            '}' | ')' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                parts.push(&input[last..i]);
                last = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[last..]);
    parts
}

fn parse_expression(text: &str, offset: usize) -> Result<Expression> {
    let mut pieces = split_top_level(text, '|').into_iter();
    let head_text = pieces.next().unwrap_or_default().trim();
    if head_text.is_empty() {
        return Err(TemplateError::Parse {
            offset,
            message: "empty interpolation".to_string(),
        });
    }

    let head = match parse_quoted(head_text) {
        Some(literal) => Operand::Literal(Value::String(literal)),
        None => Operand::Variable(head_text.to_string()),
    };

    let filters = pieces
        .map(|piece| parse_filter_call(piece.trim(), offset))
        .collect::<Result<Vec<_>>>()?;

    Ok(Expression { head, filters })
}

fn parse_filter_call(text: &str, offset: usize) -> Result<FilterCall> {
    let (name, args_text) = match text.find('(') {
        Some(open) => {
            let args = text[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| TemplateError::Parse {
                    offset,
                    message: format!("unclosed argument list in filter '{}'", text),
                })?;
            (text[..open].trim(), Some(args))
        }
        None => (text, None),
    };

    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(TemplateError::Parse {
            offset,
            message: format!("invalid filter name '{}'", name),
        });
    }

    let args = match args_text {
        Some(args) if !args.trim().is_empty() => split_top_level(args, ',')
            .into_iter()
            .map(|arg| parse_argument(arg.trim(), offset))
            .collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    Ok(FilterCall {
        name: name.to_string(),
        args,
    })
}

fn parse_argument(text: &str, offset: usize) -> Result<Operand> {
    if text.is_empty() {
        return Err(TemplateError::Parse {
            offset,
            message: "empty filter argument".to_string(),
        });
    }
    if let Some(literal) = parse_quoted(text) {
        return Ok(Operand::Literal(Value::String(literal)));
    }
    if let Some(inner) = text.strip_prefix("${").and_then(|t| t.strip_suffix('}')) {
        return Ok(Operand::Variable(inner.trim().to_string()));
    }
    match text {
        "true" => return Ok(Operand::Literal(Value::Bool(true))),
        "false" => return Ok(Operand::Literal(Value::Bool(false))),
        "null" => return Ok(Operand::Literal(Value::Null)),
        _ => {}
    }
    if text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        if let Ok(number @ Value::Number(_)) = serde_json::from_str::<Value>(text) {
            return Ok(Operand::Literal(number));
        }
    }
    Ok(Operand::Variable(text.to_string()))
}

/// Unquote `'text'` or `"text"`, handling backslash escapes.
fn parse_quoted(text: &str) -> Option<String> {
    let quote = text.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = text[1..].strip_suffix(quote)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next()?);
        } else if c == quote {
            // Quote closed early: `'a' | 'b'` style text is not one literal
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Extract all variable names referenced by a template body.
pub fn referenced_variables(segments: &[Segment]) -> Vec<&str> {
    let mut names = Vec::new();
    for segment in segments {
        let Segment::Interpolation(expression) = segment else {
            continue;
        };
        let operands = std::iter::once(&expression.head)
            .chain(expression.filters.iter().flat_map(|f| f.args.iter()));
        for operand in operands {
            if let Operand::Variable(name) = operand {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
    }
    names
}
