//! # Pattern Module
//!
//! Path matching primitives used by the router. Every function here is pure
//! apart from the [`PatternCache`], which memoizes compiled regex and template
//! patterns.
//!
//! ## Matching Styles
//!
//! | Style | Name | Captures | Example |
//! |---|---|---|---|
//! | [`Match::Exact`] | `exa` | never | `/articles` |
//! | [`Match::Prefix`] | `sta` | never | `/api` matches `/api/x`, not `/apix` |
//! | [`Match::Template`] | `pat` | one per `{}` | `/articles/{id}` |
//! | [`Match::Regex`] | `reg` | one per group | `^/articles/(\d+)$` |
//!
//! For every style the empty pattern matches any path with zero captures.
//!
//! ## Captures
//!
//! A successful submatch returns [`Captures`], an inline `SmallVec` of slices
//! borrowed from the request path, so extracting up to [`MAX_CAPTURES`]
//! values never allocates. `None` means "no match"; an empty vector means
//! "matched with zero captures". Callers branch on the former.
//!
//! ## Example
//!
//! ```
//! use routeflow::pattern::{Match, PatternCache};
//!
//! let cache = PatternCache::new();
//! let caps = Match::Template
//!     .submatch(&cache, "/articles/{id}", "/articles/42")
//!     .unwrap();
//! assert_eq!(caps.as_deref(), Some(&["42"][..]));
//!
//! assert!(Match::Prefix.is_match(&cache, "/api", "/api/users").unwrap());
//! assert!(!Match::Prefix.is_match(&cache, "/api", "/apiextra").unwrap());
//! ```

mod cache;
mod error;
mod style;
mod template;

pub use cache::PatternCache;
pub use error::PatternError;
pub use style::{match_exact, match_prefix, Match};
pub use template::{Captures, Pat, Segment, MAX_CAPTURES};
