//! Route compilation.
//!
//! # Responsibilities
//! - Turn declarative route paths into anchored regex matchers
//! - Record placeholder names in capture-group order
//! - Prepend the `/{locale}` segment to locale-aware routes
//! - Reject ambiguous patterns at startup
//!
//! # Design Decisions
//! - Compiled once, immutable afterwards, shared via `Arc`
//! - Table keeps configuration order; the first structural match wins,
//!   there is no most-specific-route ranking
//! - Placeholders bind `[a-z0-9_-]+` only; request paths are lower-cased
//!   before matching
//! - Literal path text is regex-escaped, so `.` in a route is a literal dot

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{LocaleConfig, RouteDefinition};

/// Name of the synthetic parameter prepended to locale-aware routes.
pub const LOCALE_PARAMETER: &str = "locale";

/// What a placeholder may bind in a request path.
const PARAMETER_CAPTURE: &str = "([a-z0-9_-]+)";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z0-9_-]+)\}").expect("placeholder pattern is valid"));

/// A route pattern that cannot be compiled.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route `{route}` declares placeholder `{{{name}}}` more than once")]
    DuplicatePlaceholder { route: String, name: String },

    #[error("route `{route}` contains a brace that is not part of a `{{name}}` placeholder")]
    UnbalancedBrace { route: String },

    #[error("route `{route}` does not compile to a valid matcher: {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
enum Piece {
    Literal(String),
    Parameter(usize),
}

/// A route ready for matching.
#[derive(Clone)]
pub struct CompiledRoute {
    definition: RouteDefinition,
    path: String,
    parameters: Vec<String>,
    pieces: Vec<Piece>,
    matcher: Regex,
}

impl CompiledRoute {
    /// Compile a single route definition.
    pub fn compile(definition: &RouteDefinition, multi_locale: bool) -> Result<Self, RouteError> {
        let stripped = definition.path.trim_end_matches('/');
        let path = if multi_locale && !definition.is_locale_independent() {
            format!("/{{{LOCALE_PARAMETER}}}{stripped}")
        } else {
            stripped.to_string()
        };

        let (pieces, parameters) = parse_pattern(&definition.path, &path)?;

        let mut pattern = String::from("^");
        for piece in &pieces {
            match piece {
                Piece::Literal(text) => pattern.push_str(&regex::escape(text)),
                Piece::Parameter(_) => pattern.push_str(PARAMETER_CAPTURE),
            }
        }
        pattern.push_str("/?$");

        let matcher = Regex::new(&pattern).map_err(|source| RouteError::InvalidPattern {
            route: definition.path.clone(),
            source,
        })?;

        Ok(Self {
            definition: definition.clone(),
            path,
            parameters,
            pieces,
            matcher,
        })
    }

    /// Match a normalized candidate path, returning parameter values in order.
    ///
    /// A match only counts when every parameter captured a value.
    pub fn captures(&self, candidate: &str) -> Option<Vec<String>> {
        let caps = self.matcher.captures(candidate)?;
        let values: Vec<String> = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().to_string())
            .collect();
        (values.len() == self.parameters.len()).then_some(values)
    }

    /// Substitute parameter values back into the route path.
    pub fn expand<S: AsRef<str>>(&self, values: &[S]) -> Option<String> {
        if values.len() != self.parameters.len() {
            return None;
        }
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Parameter(index) => out.push_str(values[*index].as_ref()),
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Some(out)
    }

    /// Path as written in configuration.
    pub fn source_path(&self) -> &str {
        &self.definition.path
    }

    /// Path used for matching, including the `/{locale}` prefix when present.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.definition.meta
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn requires_locale(&self) -> bool {
        self.parameters.first().map(String::as_str) == Some(LOCALE_PARAMETER)
            && self.path.starts_with("/{locale}")
    }

    pub fn is_locale_independent(&self) -> bool {
        self.definition.is_locale_independent()
    }
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("path", &self.path)
            .field("parameters", &self.parameters)
            .field("matcher", &self.matcher.as_str())
            .finish()
    }
}

impl PartialEq for CompiledRoute {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.definition == other.definition
    }
}

impl Eq for CompiledRoute {}

impl Serialize for CompiledRoute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CompiledRoute", 5)?;
        state.serialize_field("source", self.source_path())?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("parameters", &self.parameters)?;
        state.serialize_field("matcher", self.matcher.as_str())?;
        state.serialize_field("meta", self.meta())?;
        state.end()
    }
}

fn parse_pattern(route: &str, path: &str) -> Result<(Vec<Piece>, Vec<String>), RouteError> {
    let mut pieces = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(path) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_literal(&mut pieces, route, &path[last..whole.start()])?;

        let name = name.as_str();
        if names.iter().any(|n| n == name) {
            return Err(RouteError::DuplicatePlaceholder {
                route: route.to_string(),
                name: name.to_string(),
            });
        }
        pieces.push(Piece::Parameter(names.len()));
        names.push(name.to_string());
        last = whole.end();
    }
    push_literal(&mut pieces, route, &path[last..])?;

    Ok((pieces, names))
}

fn push_literal(pieces: &mut Vec<Piece>, route: &str, text: &str) -> Result<(), RouteError> {
    if text.contains(['{', '}']) {
        return Err(RouteError::UnbalancedBrace {
            route: route.to_string(),
        });
    }
    if !text.is_empty() {
        pieces.push(Piece::Literal(text.to_string()));
    }
    Ok(())
}

/// Which routes a lookup considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteScope {
    /// Only routes marked `locale = false`.
    LocaleIndependent,
    All,
}

/// Ordered, immutable collection of compiled routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<CompiledRoute>>,
}

impl RouteTable {
    /// Compile every definition, keeping configuration order.
    pub fn compile(
        definitions: &[RouteDefinition],
        config: &LocaleConfig,
    ) -> Result<Self, RouteError> {
        let routes = definitions
            .iter()
            .map(|d| CompiledRoute::compile(d, config.multi_locale).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    /// First route in table order that fully matches `candidate`.
    pub fn find(
        &self,
        candidate: &str,
        scope: RouteScope,
    ) -> Option<(Arc<CompiledRoute>, Vec<String>)> {
        self.routes
            .iter()
            .filter(|r| scope == RouteScope::All || r.is_locale_independent())
            .find_map(|r| r.captures(candidate).map(|values| (Arc::clone(r), values)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CompiledRoute>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi() -> LocaleConfig {
        LocaleConfig {
            multi_locale: true,
            default_locale: "en-gb".into(),
            ..LocaleConfig::default()
        }
    }

    #[test]
    fn test_static_route() {
        let route = CompiledRoute::compile(&RouteDefinition::new("/about/"), false).unwrap();

        assert_eq!(route.path(), "/about");
        assert!(route.parameters().is_empty());
        assert_eq!(route.matcher().as_str(), "^/about/?$");
        assert_eq!(route.captures("/about"), Some(vec![]));
        assert_eq!(route.captures("/about/"), Some(vec![]));
        assert_eq!(route.captures("/about/team"), None);
        assert_eq!(route.captures("/xabout"), None);
    }

    #[test]
    fn test_placeholders_in_order() {
        let def = RouteDefinition::new("/missions/{mission}/steps/{step_id}");
        let route = CompiledRoute::compile(&def, false).unwrap();

        assert_eq!(route.parameters(), ["mission", "step_id"]);
        assert_eq!(route.matcher().captures_len() - 1, 2);
        assert_eq!(
            route.captures("/missions/alpha-1/steps/3"),
            Some(vec!["alpha-1".to_string(), "3".to_string()])
        );
        assert_eq!(route.captures("/missions/Alpha/steps/3"), None);
        assert_eq!(route.captures("/missions/a.b/steps/3"), None);
    }

    #[test]
    fn test_locale_prefix() {
        let def = RouteDefinition::new("/missions/{mission}");
        let route = CompiledRoute::compile(&def, true).unwrap();

        assert_eq!(route.path(), "/{locale}/missions/{mission}");
        assert_eq!(route.parameters(), ["locale", "mission"]);
        assert!(route.requires_locale());
        assert_eq!(route.matcher().captures_len() - 1, 2);
        assert_eq!(
            route.captures("/fr-fr/missions/x"),
            Some(vec!["fr-fr".to_string(), "x".to_string()])
        );
        assert_eq!(route.captures("/missions/x"), None);
    }

    #[test]
    fn test_locale_independent_route_has_no_prefix() {
        let def = RouteDefinition::new("/choose").with_locale(false);
        let route = CompiledRoute::compile(&def, true).unwrap();

        assert_eq!(route.path(), "/choose");
        assert!(route.parameters().is_empty());
        assert!(!route.requires_locale());
        assert!(route.is_locale_independent());
    }

    #[test]
    fn test_explicit_locale_true_is_prefixed() {
        let def = RouteDefinition::new("/about").with_locale(true);
        let route = CompiledRoute::compile(&def, true).unwrap();
        assert_eq!(route.path(), "/{locale}/about");
    }

    #[test]
    fn test_root_route() {
        let single = CompiledRoute::compile(&RouteDefinition::new("/"), false).unwrap();
        assert_eq!(single.captures("/"), Some(vec![]));
        assert_eq!(single.expand::<&str>(&[]), Some("/".to_string()));

        let prefixed = CompiledRoute::compile(&RouteDefinition::new("/"), true).unwrap();
        assert_eq!(prefixed.path(), "/{locale}");
        assert_eq!(prefixed.captures("/en-gb"), Some(vec!["en-gb".to_string()]));
        assert_eq!(prefixed.captures("/en-gb/"), Some(vec!["en-gb".to_string()]));
    }

    #[test]
    fn test_literal_text_is_escaped() {
        let route = CompiledRoute::compile(&RouteDefinition::new("/feed.xml"), false).unwrap();
        assert!(route.captures("/feed.xml").is_some());
        assert!(route.captures("/feedxxml").is_none());
    }

    #[test]
    fn test_duplicate_placeholder_rejected() {
        let err = CompiledRoute::compile(&RouteDefinition::new("/{id}/x/{id}"), false).unwrap_err();
        assert!(matches!(
            err,
            RouteError::DuplicatePlaceholder { ref name, .. } if name == "id"
        ));

        // A user `{locale}` collides with the synthetic prefix
        let err = CompiledRoute::compile(&RouteDefinition::new("/a/{locale}"), true).unwrap_err();
        assert!(matches!(err, RouteError::DuplicatePlaceholder { .. }));
        assert!(CompiledRoute::compile(&RouteDefinition::new("/a/{locale}"), false).is_ok());
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        for path in ["/a/{id", "/a/id}", "/a/{Name}", "/a/{}"] {
            let err = CompiledRoute::compile(&RouteDefinition::new(path), false).unwrap_err();
            assert!(matches!(err, RouteError::UnbalancedBrace { .. }), "{path}");
        }
    }

    #[test]
    fn test_expand_round_trip() {
        let def = RouteDefinition::new("/missions/{mission}/steps/{step}");
        let route = CompiledRoute::compile(&def, true).unwrap();
        let candidate = "/en-gb/missions/m-7/steps/2";

        let values = route.captures(candidate).unwrap();
        assert_eq!(route.expand(values.as_slice()).as_deref(), Some(candidate));
        assert_eq!(route.expand(&["en-gb"][..]), None);
    }

    #[test]
    fn test_table_first_match_wins() {
        let defs = vec![
            RouteDefinition::new("/news/{slug}").with_meta("page", "article"),
            RouteDefinition::new("/news/latest").with_meta("page", "latest"),
        ];
        let table = RouteTable::compile(&defs, &LocaleConfig::default()).unwrap();

        let (route, values) = table.find("/news/latest", RouteScope::All).unwrap();
        assert_eq!(route.meta()["page"], "article");
        assert_eq!(values, ["latest"]);
    }

    #[test]
    fn test_table_scope_filters_locale_independent() {
        let defs = vec![
            RouteDefinition::new("/health"),
            RouteDefinition::new("/choose").with_locale(false),
        ];
        let table = RouteTable::compile(&defs, &multi()).unwrap();

        assert!(table.find("/choose", RouteScope::LocaleIndependent).is_some());
        assert!(table.find("/en-gb/health", RouteScope::LocaleIndependent).is_none());
        assert!(table.find("/en-gb/health", RouteScope::All).is_some());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_table_compile_reports_bad_route() {
        let defs = vec![RouteDefinition::new("/ok"), RouteDefinition::new("/{a}/{a}")];
        assert!(RouteTable::compile(&defs, &LocaleConfig::default()).is_err());
    }
}
