//! OAS-style path templates.
//!
//! A template such as `/pets/{id}/toys/{}` is parsed once into a flat list of
//! [`Segment`]s. Matching walks the input left to right without backtracking:
//!
//! - a literal segment must be an exact prefix of the remaining input and is
//!   consumed verbatim;
//! - a capture segment consumes everything up to the next `/`, `?`, `#` or the
//!   end of input, and must consume at least one character;
//! - once every segment is consumed the input must be exhausted.
//!
//! Names inside template expressions are accepted and discarded; submatching is
//! positional. See <https://spec.openapis.org/oas/v3.1.0#path-templating>.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use super::error::PatternError;

/// Maximum number of template expressions in one pattern.
///
/// Also the inline capacity of [`Captures`], so the common case never touches
/// the heap.
pub const MAX_CAPTURES: usize = 8;

/// Positional captures borrowed from the matched path.
///
/// `None` where one is expected means "no match"; an empty `Captures` means
/// "matched with zero captures".
pub type Captures<'a> = SmallVec<[&'a str; MAX_CAPTURES]>;

const CAPTURE_REGEX: &str = "([^/?#]+)";

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Text matched verbatim
    Literal(Box<str>),
    /// A template expression such as `{}` or `{id}`
    Capture,
}

/// Parsed OAS-style path template.
///
/// ```
/// use routeflow::pattern::Pat;
///
/// let pat: Pat = "/pets/{id}".parse().unwrap();
/// assert_eq!(pat.submatch("/pets/42").as_deref(), Some(&["42"][..]));
/// assert!(!pat.is_match("/pets/42/toys"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pat {
    segments: Vec<Segment>,
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '/' | '?' | '#')
}

impl Pat {
    /// Parse a template, rejecting malformed input with a descriptive error.
    pub fn parse(src: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::with_capacity(src.matches('{').count() * 2 + 1);
        let mut in_template = false;
        let mut cursor = 0;
        let mut templates = 0;

        for (ind, ch) in src.char_indices() {
            if ch == '?' || ch == '#' {
                return Err(PatternError::UnexpectedChar {
                    pattern: src.to_owned(),
                    found: ch,
                });
            }

            if in_template {
                match ch {
                    '}' => {
                        segments.push(Segment::Capture);
                        cursor = ind + 1;
                        in_template = false;
                        templates += 1;

                        if templates > MAX_CAPTURES {
                            return Err(PatternError::TooManyCaptures {
                                pattern: src.to_owned(),
                                found: templates,
                                limit: MAX_CAPTURES,
                            });
                        }
                    }
                    '/' | '{' => {
                        return Err(PatternError::InsideTemplate {
                            pattern: src.to_owned(),
                            found: ch,
                        });
                    }
                    _ => {}
                }
                continue;
            }

            match ch {
                '{' => {
                    if cursor < ind {
                        segments.push(Segment::Literal(src[cursor..ind].into()));
                    }
                    cursor = ind;
                    in_template = true;
                }
                '}' => {
                    return Err(PatternError::UnbalancedClose {
                        pattern: src.to_owned(),
                    });
                }
                _ => {}
            }
        }

        if in_template {
            return Err(PatternError::Unclosed {
                pattern: src.to_owned(),
            });
        }

        if cursor < src.len() {
            segments.push(Segment::Literal(src[cursor..].into()));
        }

        Ok(Self { segments })
    }

    /// Parsed segments in declaration order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of template expressions, like `Regex::captures_len` minus the
    /// implicit whole-match group.
    #[must_use]
    pub fn num_captures(&self) -> usize {
        self.segments
            .iter()
            .filter(|seg| matches!(seg, Segment::Capture))
            .count()
    }

    /// True if the whole input matches, without collecting captures.
    #[inline]
    #[must_use]
    pub fn is_match(&self, inp: &str) -> bool {
        self.walk(inp, None)
    }

    /// Positional captures on a match, `None` otherwise.
    ///
    /// On success the length equals [`Pat::num_captures`].
    #[must_use]
    pub fn submatch<'i>(&self, inp: &'i str) -> Option<Captures<'i>> {
        let mut out = Captures::new();
        if self.walk(inp, Some(&mut out)) {
            Some(out)
        } else {
            None
        }
    }

    fn walk<'i>(&self, inp: &'i str, mut out: Option<&mut Captures<'i>>) -> bool {
        let mut rem = inp;

        for seg in &self.segments {
            match seg {
                Segment::Literal(lit) => match rem.strip_prefix(&**lit) {
                    Some(tail) => rem = tail,
                    None => return false,
                },
                Segment::Capture => {
                    let end = rem.find(is_separator).unwrap_or(rem.len());
                    if end == 0 {
                        return false;
                    }
                    let (head, tail) = rem.split_at(end);
                    if let Some(out) = out.as_deref_mut() {
                        out.push(head);
                    }
                    rem = tail;
                }
            }
        }

        rem.is_empty()
    }

    /// Regex source equivalent to this template, anchored with `^$`.
    ///
    /// Literals are escaped and template expressions become `([^/?#]+)`. The
    /// regex backtracks where the template does not, so the two only differ
    /// when a literal following a capture could also be consumed by it.
    #[must_use]
    pub fn to_regex(&self) -> String {
        let mut buf = String::with_capacity(self.regex_len());
        buf.push('^');
        for seg in &self.segments {
            match seg {
                Segment::Literal(lit) => buf.push_str(&regex::escape(lit)),
                Segment::Capture => buf.push_str(CAPTURE_REGEX),
            }
        }
        buf.push('$');
        buf
    }

    // Escapes make the real length larger; this is only a starting capacity.
    fn regex_len(&self) -> usize {
        let body: usize = self
            .segments
            .iter()
            .map(|seg| match seg {
                Segment::Literal(lit) => lit.len(),
                Segment::Capture => CAPTURE_REGEX.len(),
            })
            .sum();
        body + 2
    }
}

/// Captures are rendered anonymously as `{}`; names from the source are gone.
impl fmt::Display for Pat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            match seg {
                Segment::Literal(lit) => f.write_str(lit)?,
                Segment::Capture => f.write_str("{}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Pat {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
