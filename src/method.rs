//! HTTP method matching.
//!
//! A declared method of `None` is the wildcard and matches every request.
//! Otherwise the comparison is exact: `http::Method` compares by its string
//! form, so `Method::from_bytes(b"get")` does not match `GET`. Callers are
//! responsible for consistent casing.

use http::Method;

/// True iff `declared` is the wildcard or equal to `actual`.
#[inline]
#[must_use]
pub fn method_matches(declared: Option<&Method>, actual: &Method) -> bool {
    declared.map_or(true, |declared| declared == actual)
}
