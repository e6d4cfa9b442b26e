//! Request-scoped serialization options.
//!
//! The HTTP layer (out of scope here) extracts raw query parameters; this
//! module turns them into the typed, request-scoped signal the serializer
//! consumes: an optional requested depth and an optional field subset.
//! Malformed client input degrades gracefully — invalid integers are ignored
//! with a warning, out-of-range values are clamped — because none of it is a
//! programming error.

use log::warn;

/// Options carried through one serialization call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Client-requested expansion depth; clamped against the schema's max
    pub depth: Option<i64>,

    /// Explicit subset of field names to include in the root document
    pub fields: Option<Vec<String>>,
}

impl SerializeOptions {
    /// Options with no requested depth and no field subset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested depth.
    pub fn with_depth(mut self, depth: i64) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Set the requested field subset.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Build options from raw query-parameter values.
    ///
    /// `depth_raw` is parsed as an integer (invalid input ignored);
    /// `fields_raw` is parsed as a comma-separated list.
    pub fn from_query(depth_raw: Option<&str>, fields_raw: Option<&str>) -> Self {
        Self {
            depth: depth_raw.and_then(|raw| parse_int_param("depth", raw, None, None)),
            fields: parse_str_list(fields_raw),
        }
    }
}

/// Parse an integer query parameter, clamping into an optional range.
///
/// Non-numeric input is not an error: it is logged and ignored, as if the
/// parameter had not been sent.
pub fn parse_int_param(key: &str, raw: &str, min: Option<i64>, max: Option<i64>) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(mut value) => {
            if let Some(min) = min {
                value = value.max(min);
            }
            if let Some(max) = max {
                value = value.min(max);
            }
            Some(value)
        }
        Err(_) => {
            warn!("Invalid integer param, {key}={raw}, ignoring");
            None
        }
    }
}

/// Parse a comma-separated list of strings.
///
/// Tolerates `[...]`, `{...}` and `(...)` wrappers and surrounding
/// whitespace; empty elements are dropped. `None` input stays `None` (the
/// parameter was not sent); empty input becomes an empty list.
pub fn parse_str_list(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?;
    let trimmed = raw.trim_matches(&['[', '{', '(', ' ', ')', '}', ']'][..]);

    Some(
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Parse a comma-separated list of integers.
///
/// Same tolerance as `parse_str_list`; elements that fail to parse are
/// skipped rather than failing the whole list.
pub fn parse_int_list(raw: Option<&str>) -> Option<Vec<i64>> {
    let items = parse_str_list(raw)?;

    Some(
        items
            .iter()
            .filter_map(|s| match s.parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!("Invalid integer list element '{s}', skipping");
                    None
                }
            })
            .collect(),
    )
}
