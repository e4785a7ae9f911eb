//! Parser for SGRID padding attributes.
//!
//! Dimension attributes of the topology variable (`face_dimensions`,
//! `edge1_dimensions`, ...) carry a whitespace-separated list of clauses of
//! the form `<dim>: <shared_dim> (padding: <kind>)`, for example:
//!
//! ```text
//! xi_rho: xi_psi (padding: both) eta_rho: eta_psi (padding: both)
//! ```
//!
//! Each clause maps a staggered dimension onto the dimension it shares
//! indices with and states how its index range is padded relative to that
//! dimension. A clause without a parenthesized padding group defaults to
//! [`PaddingKind::None`]; a clause without a `:` separator is a grammar
//! error for the whole attribute.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SgridError};

/// How a staggered dimension's index range is padded relative to the
/// dimension it shares indices with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingKind {
    /// No padding; the ranges already align.
    None,
    /// Padded at the low end of the index range.
    Low,
    /// Padded at the high end of the index range.
    High,
    /// Padded at both ends.
    Both,
}

impl PaddingKind {
    /// Parse a padding kind token, or `None` for an unknown token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "none" => Some(PaddingKind::None),
            "low" => Some(PaddingKind::Low),
            "high" => Some(PaddingKind::High),
            "both" => Some(PaddingKind::Both),
            _ => None,
        }
    }

    /// The attribute spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaddingKind::None => "none",
            PaddingKind::Low => "low",
            PaddingKind::High => "high",
            PaddingKind::Both => "both",
        }
    }
}

impl fmt::Display for PaddingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed clause of a padding attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingSpec {
    /// The staggered dimension the clause describes.
    pub dim: String,
    /// The dimension it shares indices with.
    pub shared_dim: String,
    /// How the staggered range is padded.
    pub kind: PaddingKind,
}

/// Parse a padding attribute value into its clauses, preserving source
/// order. `attribute` is the attribute name, used only in error reports.
///
/// Parsing tolerates arbitrary whitespace between and inside clauses. An
/// empty value yields no clauses. Malformed input (a clause without a `:`
/// separator, a missing shared dimension name, an unknown padding kind, an
/// unterminated padding group) fails the whole attribute with
/// [`SgridError::PaddingGrammar`].
pub fn parse_padding(attribute: &str, value: &str) -> Result<Vec<PaddingSpec>> {
    let tokens = tokenize(value);
    let mut specs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        // Clause head: `<dim>:`, `<dim> :`, or `<dim>:<shared>`.
        let (dim, mut shared) = match token.find(':') {
            Some(0) => {
                return Err(grammar(attribute, "clause has an empty dimension name"));
            }
            Some(pos) => {
                let rest = &token[pos + 1..];
                let shared = (!rest.is_empty()).then(|| rest.to_string());
                (&token[..pos], shared)
            }
            None if tokens.get(i + 1) == Some(&":") => {
                i += 1;
                (token, None)
            }
            None => {
                return Err(grammar(
                    attribute,
                    format!("clause `{token}` has no `:` separator"),
                ));
            }
        };
        i += 1;
        if shared.is_none() {
            match tokens.get(i) {
                Some(&"(") | Some(&")") | None => {
                    return Err(grammar(
                        attribute,
                        format!("clause `{dim}` is missing a shared dimension name"),
                    ));
                }
                Some(tok) => {
                    shared = Some(tok.to_string());
                    i += 1;
                }
            }
        }
        let mut kind = PaddingKind::None;
        if tokens.get(i) == Some(&"(") {
            i += 1;
            let (parsed, next) = parse_padding_group(attribute, &tokens, i)?;
            kind = parsed;
            i = next;
        }
        let shared_dim = match shared {
            Some(shared_dim) => shared_dim,
            None => {
                return Err(grammar(
                    attribute,
                    format!("clause `{dim}` is missing a shared dimension name"),
                ));
            }
        };
        specs.push(PaddingSpec {
            dim: dim.to_string(),
            shared_dim,
            kind,
        });
    }
    Ok(specs)
}

/// Parse the body of a `(padding: <kind>)` group starting at `start` (just
/// past the opening parenthesis). Returns the kind and the index past the
/// closing parenthesis.
fn parse_padding_group(
    attribute: &str,
    tokens: &[&str],
    start: usize,
) -> Result<(PaddingKind, usize)> {
    let mut i = start;
    let head = match tokens.get(i) {
        Some(head) => *head,
        None => return Err(grammar(attribute, "unterminated padding group")),
    };
    // Accept `padding: kind`, `padding:kind`, and `padding : kind`.
    let mut kind_token = None;
    match head.find(':') {
        Some(pos) if &head[..pos] == "padding" => {
            let rest = &head[pos + 1..];
            if !rest.is_empty() {
                kind_token = Some(rest);
            }
            i += 1;
        }
        None if head == "padding" && tokens.get(i + 1) == Some(&":") => {
            i += 2;
        }
        _ => {
            return Err(grammar(
                attribute,
                format!("expected `padding:` in group, found `{head}`"),
            ));
        }
    }
    let kind_token = match kind_token {
        Some(token) => token,
        None => match tokens.get(i) {
            Some(&")") | None => {
                return Err(grammar(attribute, "padding group is missing a kind"));
            }
            Some(token) => {
                i += 1;
                *token
            }
        },
    };
    let kind = PaddingKind::from_token(kind_token)
        .ok_or_else(|| grammar(attribute, format!("unknown padding kind `{kind_token}`")))?;
    match tokens.get(i) {
        Some(&")") => Ok((kind, i + 1)),
        _ => Err(grammar(attribute, "unterminated padding group")),
    }
}

/// Split an attribute value into tokens, treating parentheses as standalone
/// tokens regardless of surrounding whitespace.
fn tokenize(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for word in value.split_whitespace() {
        let mut rest = word;
        while let Some(pos) = rest.find(|c| c == '(' || c == ')') {
            if pos > 0 {
                tokens.push(&rest[..pos]);
            }
            tokens.push(&rest[pos..pos + 1]);
            rest = &rest[pos + 1..];
        }
        if !rest.is_empty() {
            tokens.push(rest);
        }
    }
    tokens
}

fn grammar(attribute: &str, reason: impl Into<String>) -> SgridError {
    SgridError::PaddingGrammar {
        attribute: attribute.to_string(),
        reason: reason.into(),
    }
}
