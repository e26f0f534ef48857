//! Route pattern parsing.
//!
//! A pattern such as `/users/:id/files/*` is scanned left to right and turned
//! into the sequence of tree insertions that registers it. Parameter names are
//! stripped from the inserted paths: every `:name` becomes a single `:` byte,
//! which is the prefix of the param node, and `*` is the prefix of the
//! match-any node.

use std::sync::Arc;

use crate::error::RouterError;

use super::radix::NodeKind;

/// Parameter name recorded for a trailing `*` capture.
pub const WILDCARD_PARAM: &str = "_*";

/// One insertion into the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InsertStep {
    /// Path from the root, with params collapsed to `:`.
    pub path: Vec<u8>,
    pub kind: NodeKind,
}

/// A validated pattern ready to be registered.
#[derive(Debug, Clone)]
pub(crate) struct ParsedPattern {
    /// Normalised original pattern, e.g. `/users/:id`.
    pub pattern: Arc<str>,
    /// Capture names in path order.
    pub param_names: Arc<[Arc<str>]>,
    /// Insertions to perform; the last one is the route terminus. Empty for
    /// literal patterns, which bypass the tree.
    pub steps: Vec<InsertStep>,
}

impl ParsedPattern {
    /// True when the pattern has no `:` or `*` and belongs in the static index.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Add the leading `/` a pattern or request path is expected to have.
pub(crate) fn normalize(pattern: &str) -> String {
    if pattern.is_empty() {
        "/".to_string()
    } else if pattern.starts_with('/') {
        pattern.to_string()
    } else {
        format!("/{pattern}")
    }
}

/// Parse and validate `pattern`.
///
/// Rejected: a `*` that is not the final byte, an empty `:` name, a name that
/// itself contains `:` or `*`, and a name used twice in the same pattern.
pub(crate) fn parse(pattern: &str) -> Result<ParsedPattern, RouterError> {
    let original = normalize(pattern);
    let invalid = |reason: &str| RouterError::InvalidPattern {
        pattern: original.clone(),
        reason: reason.to_string(),
    };

    if !original.contains([':', '*']) {
        return Ok(ParsedPattern {
            pattern: Arc::from(original.as_str()),
            param_names: Arc::from(Vec::new()),
            steps: Vec::new(),
        });
    }

    let mut path: Vec<u8> = original.as_bytes().to_vec();
    let mut names: Vec<Arc<str>> = Vec::new();
    let mut steps = Vec::new();

    let mut i = 0;
    let mut len = path.len();
    while i < len {
        match path[i] {
            b':' => {
                let start = i + 1;
                steps.push(InsertStep {
                    path: path[..i].to_vec(),
                    kind: NodeKind::Static,
                });

                let mut end = start;
                while end < len && path[end] != b'/' {
                    end += 1;
                }
                let name = std::str::from_utf8(&path[start..end])
                    .map_err(|_| invalid("parameter name is not valid UTF-8"))?;
                if name.is_empty() {
                    return Err(invalid("empty parameter name"));
                }
                if name.contains([':', '*']) {
                    return Err(invalid("parameter name contains ':' or '*'"));
                }
                if names.iter().any(|n| n.as_ref() == name) {
                    return Err(invalid("duplicate parameter name"));
                }
                names.push(Arc::from(name));

                // Collapse `:name` to `:` and resume right after it.
                path.drain(start..end);
                i = start;
                len = path.len();

                steps.push(InsertStep {
                    path: path[..i].to_vec(),
                    kind: NodeKind::Param,
                });
                if i == len {
                    return Ok(finish(original, names, steps));
                }
            }
            b'*' => {
                if i + 1 != len {
                    return Err(invalid("'*' must be the last character"));
                }
                steps.push(InsertStep {
                    path: path[..i].to_vec(),
                    kind: NodeKind::Static,
                });
                names.push(Arc::from(WILDCARD_PARAM));
                steps.push(InsertStep {
                    path: path[..=i].to_vec(),
                    kind: NodeKind::MatchAny,
                });
                return Ok(finish(original, names, steps));
            }
            _ => i += 1,
        }
    }

    steps.push(InsertStep {
        path,
        kind: NodeKind::Static,
    });
    Ok(finish(original, names, steps))
}

fn finish(pattern: String, names: Vec<Arc<str>>, steps: Vec<InsertStep>) -> ParsedPattern {
    ParsedPattern {
        pattern: Arc::from(pattern.as_str()),
        param_names: Arc::from(names),
        steps,
    }
}
