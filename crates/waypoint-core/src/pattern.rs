//! Pattern validation and decomposition
//!
//! A registered pattern is compiled into a short sequence of structural
//! insert operations before it touches the tree. Each `:name` splits the
//! pattern at the marker: the literal text in front is emitted as a static
//! insert, the name is recorded, and the working pattern keeps only the
//! single `:` sentinel byte in its place. A `*name` terminates the scan with
//! a catch-all insert. Only the final operation of a pattern carries the
//! route payload; intermediate operations are purely structural.

use crate::error::{Error, Result};
use crate::tree::{Kind, Route};

/// One structural insert derived from a pattern.
pub(crate) struct InsertOp<T> {
    /// Working-pattern prefix to place, with parameter names collapsed to
    /// their sentinel bytes.
    pub search: String,
    pub kind: Kind,
    /// Route payload; present only on the last op of a pattern.
    pub route: Option<Route<T>>,
}

/// Check a pattern against the registration syntax rules.
///
/// Rules: non-empty, leading `/`, every wildcard named, at most one wildcard
/// per segment, `*` only directly after `/` and only as the final segment.
pub fn validate(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(Error::EmptyPattern);
    }
    let bytes = pattern.as_bytes();
    if bytes[0] != b'/' {
        return Err(Error::NoLeadingSlash(pattern.to_string()));
    }

    for (i, &c) in bytes.iter().enumerate() {
        match c {
            b':' => {
                if i == bytes.len() - 1 || bytes[i + 1] == b'/' {
                    return Err(Error::EmptyWildcardName(pattern.to_string()));
                }
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] != b'/' {
                    if bytes[j] == b':' || bytes[j] == b'*' {
                        return Err(Error::MultipleWildcards(pattern.to_string()));
                    }
                    j += 1;
                }
            }
            b'*' => {
                if i == bytes.len() - 1 {
                    return Err(Error::EmptyWildcardName(pattern.to_string()));
                }
                // bytes[0] is '/', so i >= 1 here
                if bytes[i - 1] != b'/' {
                    return Err(Error::CatchAllWithoutSlash(pattern.to_string()));
                }
                if bytes[i + 1..].contains(&b'/') {
                    return Err(Error::CatchAllMidPattern(pattern.to_string()));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Validate `pattern` and decompose it into ordered insert operations.
///
/// Validation runs to completion before any operation is produced, so a
/// malformed pattern is rejected without partially mutating the tree.
pub(crate) fn compile<T>(pattern: &str, value: T) -> Result<Vec<InsertOp<T>>> {
    validate(pattern)?;

    let mut ops = Vec::new();
    let mut names: Vec<String> = Vec::new();
    // Working copy; parameter names are collapsed out as they are found,
    // leaving one sentinel byte per dynamic segment.
    let mut work = pattern.to_string();
    let mut i = 0;

    while i < work.len() {
        match work.as_bytes()[i] {
            b':' => {
                let j = i + 1;
                // literal text in front of the marker
                ops.push(InsertOp {
                    search: work[..i].to_string(),
                    kind: Kind::Static,
                    route: None,
                });

                let bytes = work.as_bytes();
                let mut k = j;
                while k < work.len() && bytes[k] != b'/' {
                    k += 1;
                }
                names.push(work[j..k].to_string());
                work = format!("{}{}", &work[..j], &work[k..]);
                i = j;

                if i == work.len() {
                    // pattern ends on the parameter
                    ops.push(InsertOp {
                        search: work,
                        kind: Kind::Param,
                        route: Some(Route::new(pattern, names, value)),
                    });
                    return Ok(ops);
                }
                ops.push(InsertOp {
                    search: work[..i].to_string(),
                    kind: Kind::Param,
                    route: None,
                });
            }
            b'*' => {
                ops.push(InsertOp {
                    search: work[..i].to_string(),
                    kind: Kind::Static,
                    route: None,
                });
                names.push(work[i + 1..].to_string());
                ops.push(InsertOp {
                    search: work[..=i].to_string(),
                    kind: Kind::CatchAll,
                    route: Some(Route::new(pattern, names, value)),
                });
                return Ok(ops);
            }
            _ => i += 1,
        }
    }

    // no markers found, or trailing text after the last parameter
    ops.push(InsertOp {
        search: work,
        kind: Kind::Static,
        route: Some(Route::new(pattern, names, value)),
    });
    Ok(ops)
}
