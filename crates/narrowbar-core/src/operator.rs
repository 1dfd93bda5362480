//! Search operators and the query tokenizer.
//!
//! A query like `stream:design -is:starred "release notes" draft` becomes
//! three operators: `stream:design`, negated `is:starred`, and a single
//! `search` operator carrying the remaining free text.

use serde::{Deserialize, Serialize};

/// Operator name used for free text.
pub const SEARCH_OPERATOR: &str = "search";

/// A single search operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub operator: String,
    pub operand: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negated: bool,
}

impl Operator {
    /// Create a non-negated operator.
    pub fn new(operator: impl Into<String>, operand: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            operand: operand.into(),
            negated: false,
        }
    }

    /// Create a negated operator.
    pub fn negated(operator: impl Into<String>, operand: impl Into<String>) -> Self {
        Self {
            negated: true,
            ..Self::new(operator, operand)
        }
    }

    /// Check if this operator carries free text.
    pub fn is_search(&self) -> bool {
        self.operator == SEARCH_OPERATOR
    }
}

/// Query string parsing and rendering.
pub struct Filter;

impl Filter {
    /// Parse a query string into operators.
    ///
    /// Free-text words are collected, in order, into one trailing `search`
    /// operator. Quoted runs keep their inner whitespace.
    pub fn parse(query: &str) -> Vec<Operator> {
        let mut operators = Vec::new();
        let mut search_words = Vec::new();

        for token in tokenize(query) {
            if token.quoted {
                search_words.push(token.text);
                continue;
            }

            match split_operator(&token.text) {
                Some((negated, operator, operand)) => operators.push(Operator {
                    operator: operator.to_lowercase(),
                    operand: operand.to_string(),
                    negated,
                }),
                None => search_words.push(token.text),
            }
        }

        if !search_words.is_empty() {
            operators.push(Operator::new(SEARCH_OPERATOR, search_words.join(" ")));
        }

        operators
    }

    /// Render operators back into a query string that parses to the same operators.
    ///
    /// Free text is written bare unless a word would read as an operator or
    /// the spacing would not survive tokenizing; then it is quoted as one
    /// phrase.
    pub fn unparse(operators: &[Operator]) -> String {
        operators
            .iter()
            .map(|op| {
                if op.is_search() && !op.negated {
                    return if search_text_needs_quotes(&op.operand) {
                        quote(&op.operand)
                    } else {
                        op.operand.clone()
                    };
                }
                let sign = if op.negated { "-" } else { "" };
                format!("{}{}:{}", sign, op.operator, quote_if_needed(&op.operand))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

struct Token {
    text: String,
    quoted: bool,
}

/// Split on whitespace, keeping double-quoted runs intact.
///
/// A quote inside a word (`topic:"release notes"`) extends that word.
/// A backslash makes the next character literal, so `\"` is a quote
/// character and `\\` a backslash.
fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted_whole = false;
    let mut escaped = false;

    for ch in query.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => {
                if !in_quotes && current.is_empty() {
                    quoted_whole = true;
                }
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted: quoted_whole,
                    });
                }
                quoted_whole = false;
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(Token {
            text: current,
            quoted: quoted_whole,
        });
    }

    tokens
}

/// Split `[-]operator:operand`. Both halves must be non-empty.
fn split_operator(token: &str) -> Option<(bool, &str, &str)> {
    let (negated, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (operator, operand) = rest.split_once(':')?;
    if operator.is_empty() || operand.is_empty() {
        return None;
    }
    Some((negated, operator, operand))
}

fn quote_if_needed(operand: &str) -> String {
    if operand.contains(|c: char| c.is_whitespace() || c == '"' || c == '\\') {
        quote(operand)
    } else {
        operand.to_string()
    }
}

/// Check if free text must be quoted to reparse as the same `search` operand.
fn search_text_needs_quotes(text: &str) -> bool {
    text.contains([':', '"', '\\'])
        || text.starts_with('-')
        || text.split_whitespace().collect::<Vec<_>>().join(" ") != text
}

/// Wrap in double quotes, escaping quotes and backslashes.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
