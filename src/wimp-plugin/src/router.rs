//! Path-to-view dispatch table for `plugin://` URLs.
//!
//! Patterns are `/`-separated templates where a segment written `<name>`
//! captures one non-empty path segment and every other segment must match
//! literally. The same table is used in both directions: [`Router::resolve`]
//! turns an inbound URL into a handler key plus parameters, and
//! [`Router::reverse`] builds the URL that routes back to a key.
//!
//! When several patterns match one path, the one with the most literal
//! segments wins and ties go to the first registered. `reverse` followed by
//! `resolve` returns the original key and parameters as long as no capture
//! value equals a literal of a more specific pattern of the same shape.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use url::form_urlencoded;

pub const PLUGIN_SCHEME: &str = "plugin";

/// Characters left as-is inside an encoded path capture.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("route pattern {pattern:?} conflicts with {existing:?}")]
    Conflict { pattern: String, existing: String },
    #[error("handler {handler} is already registered")]
    DuplicateHandler { handler: String },
    #[error("handler {handler} has no route")]
    UnknownHandler { handler: String },
    #[error("missing parameter {name:?}")]
    MissingParameter { name: String },
    #[error("parameter {name:?} must not be empty")]
    EmptyParameter { name: String },
    #[error("invalid plugin url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Named values bound by a route match, or passed to [`Router::reverse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// A value that has to be present and non-empty.
    pub fn require(&self, name: &str) -> Result<&str, RouteError> {
        match self.get(name) {
            None => Err(RouteError::MissingParameter { name: name.into() }),
            Some("") => Err(RouteError::EmptyParameter { name: name.into() }),
            Some(value) => Ok(value),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
}

impl Segment {
    fn same_shape(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (Segment::Capture(_), Segment::Capture(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Route<K> {
    pattern: String,
    segments: Vec<Segment>,
    key: K,
}

impl<K> Route<K> {
    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    fn captures(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Bind decoded path segments, or `None` when the shape differs.
    fn bind(&self, path: &[String]) -> Option<Vec<(String, String)>> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut bound = Vec::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Capture(name) if !value.is_empty() => {
                    bound.push((name.clone(), value.clone()));
                }
                _ => return None,
            }
        }
        Some(bound)
    }
}

/// Result of resolving a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<K> {
    pub key: K,
    pub params: Params,
}

#[derive(Debug, Clone)]
pub struct Router<K> {
    addon_id: String,
    routes: Vec<Route<K>>,
}

impl<K: Clone + PartialEq + fmt::Debug> Router<K> {
    pub fn new(addon_id: impl Into<String>) -> Self {
        Self {
            addon_id: addon_id.into(),
            routes: Vec::new(),
        }
    }

    pub fn addon_id(&self) -> &str {
        &self.addon_id
    }

    pub fn register(&mut self, pattern: &str, key: K) -> Result<(), RouteError> {
        let segments = parse_pattern(pattern)?;

        if let Some(existing) = self.routes.iter().find(|r| {
            r.segments.len() == segments.len()
                && r.segments.iter().zip(&segments).all(|(a, b)| a.same_shape(b))
        }) {
            return Err(RouteError::Conflict {
                pattern: pattern.to_string(),
                existing: existing.pattern.clone(),
            });
        }

        if self.routes.iter().any(|r| r.key == key) {
            return Err(RouteError::DuplicateHandler {
                handler: format!("{key:?}"),
            });
        }

        tracing::trace!(pattern, ?key, "route registered");
        self.routes.push(Route {
            pattern: pattern.to_string(),
            segments,
            key,
        });
        Ok(())
    }

    /// Registered `(pattern, key)` pairs in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &K)> {
        self.routes.iter().map(|r| (r.pattern.as_str(), &r.key))
    }

    pub fn resolve(&self, url: &str) -> Result<RouteMatch<K>, RouteError> {
        let (path, query) = split_url(url)?;
        let segments = decode_path(url, path)?;

        let mut best: Option<(&Route<K>, Vec<(String, String)>)> = None;
        for route in &self.routes {
            let Some(bound) = route.bind(&segments) else {
                continue;
            };
            let better = match &best {
                Some((current, _)) => route.literal_count() > current.literal_count(),
                None => true,
            };
            if better {
                best = Some((route, bound));
            }
        }
        let (route, bound) = best.ok_or_else(|| RouteError::NotFound(path.to_string()))?;

        let mut params: Params = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        for (name, value) in bound {
            params.insert(name, value);
        }

        tracing::debug!(pattern = %route.pattern, key = ?route.key, "route matched");
        Ok(RouteMatch {
            key: route.key.clone(),
            params,
        })
    }

    /// Resolve `url` and hand the match to `handler`.
    pub fn dispatch<T, E>(
        &self,
        url: &str,
        handler: impl FnOnce(K, Params) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RouteError>,
    {
        let RouteMatch { key, params } = self.resolve(url)?;
        handler(key, params)
    }

    /// Canonical URL for `key`. Parameters that are not captures of the
    /// pattern go into the query string, sorted by name.
    pub fn reverse(&self, key: &K, params: &Params) -> Result<String, RouteError> {
        let route = self
            .routes
            .iter()
            .find(|r| &r.key == key)
            .ok_or_else(|| RouteError::UnknownHandler {
                handler: format!("{key:?}"),
            })?;

        let mut path = Vec::with_capacity(route.segments.len());
        for segment in &route.segments {
            match segment {
                Segment::Literal(literal) => path.push(literal.clone()),
                Segment::Capture(name) => {
                    let value = params.require(name)?;
                    path.push(utf8_percent_encode(value, SEGMENT).to_string());
                }
            }
        }

        let mut url = format!("{PLUGIN_SCHEME}://{}/{}", self.addon_id, path.join("/"));
        let captures: Vec<&str> = route.captures().collect();
        let mut extra = params
            .iter()
            .filter(|(name, _)| !captures.contains(name))
            .peekable();
        if extra.peek().is_some() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(extra)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    let invalid = |reason: &str| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let body = pattern
        .strip_prefix('/')
        .ok_or_else(|| invalid("must start with '/'"))?;
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    for raw in body.split('/') {
        if raw.is_empty() {
            return Err(invalid("empty segment"));
        }
        let segment = match raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            Some(name) => {
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(invalid("capture names are ascii letters, digits and '_'"));
                }
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Capture(n) if n == name))
                {
                    return Err(invalid("duplicate capture name"));
                }
                Segment::Capture(name.to_string())
            }
            None if raw.contains(['<', '>']) => return Err(invalid("unbalanced '<' or '>'")),
            None => Segment::Literal(raw.to_string()),
        };
        segments.push(segment);
    }
    Ok(segments)
}

/// Split `plugin://<addon>/path?query` or `/path?query` into path and query.
fn split_url(url: &str) -> Result<(&str, Option<&str>), RouteError> {
    let invalid = |reason: &str| RouteError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let without_fragment = url.split('#').next().unwrap_or_default();
    let rest = match without_fragment.split_once("://") {
        Some((scheme, rest)) => {
            if !scheme.eq_ignore_ascii_case(PLUGIN_SCHEME) {
                return Err(invalid("unsupported scheme"));
            }
            match rest.find(['/', '?']) {
                Some(idx) if rest.as_bytes()[idx] == b'/' => &rest[idx..],
                Some(idx) => return Ok(("/", Some(&rest[idx + 1..]))),
                None => "/",
            }
        }
        None => without_fragment,
    };

    if !rest.starts_with('/') {
        return Err(invalid("path must start with '/'"));
    }
    Ok(match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    })
}

fn decode_path(url: &str, path: &str) -> Result<Vec<String>, RouteError> {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split('/')
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|_| RouteError::InvalidUrl {
                    url: url.to_string(),
                    reason: "path is not valid utf-8".into(),
                })
        })
        .collect()
}
