//! Path patterns and templates.
//!
//! # Responsibilities
//! - Parse route templates (`projects/<uuid:uuid>/export.<json|yaml:format>`)
//! - Compile a full template into an anchored matcher
//! - Extract and percent-decode named parameters on match
//! - Render a template back into a URL (reverse routing)
//!
//! # Design Decisions
//! - Placeholder syntax is `<converter:name>`; a bare `<name>` uses `str`
//! - Templates concatenate exactly, no implicit `/` between prefix and pattern
//! - Purely literal templates skip the regex engine entirely
//! - Captured values are decoded; rendered values are encoded per segment

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::routing::error::RoutingError;

/// Opaque reference to the handler a pattern routes to.
///
/// The router never looks inside it; the mounting sub-domain decides what it
/// means (a handler id, an upstream name, a static root).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HandlerRef(String);

impl HandlerRef {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandlerRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Value constraint attached to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converter {
    /// One or more ASCII digits.
    Int,
    /// Any non-empty text without `/`.
    Str,
    /// ASCII letters, digits, hyphens and underscores.
    Slug,
    /// Lowercase hyphenated UUID.
    Uuid,
    /// Any non-empty text, `/` included.
    Path,
    /// Exactly one of the listed alternatives.
    OneOf(Vec<String>),
}

impl Converter {
    /// Parse the converter part of a placeholder.
    ///
    /// A converter containing `|` is an enumeration; each alternative must be a
    /// plain token so that it renders and matches unencoded.
    pub fn parse(spec: &str) -> Result<Self, String> {
        match spec {
            "int" => Ok(Converter::Int),
            "str" => Ok(Converter::Str),
            "slug" => Ok(Converter::Slug),
            "uuid" => Ok(Converter::Uuid),
            "path" => Ok(Converter::Path),
            s if s.contains('|') => {
                let alternatives: Vec<String> = s.split('|').map(str::to_string).collect();
                for alt in &alternatives {
                    if alt.is_empty() || !alt.chars().all(is_token_char) {
                        return Err(format!("invalid enumeration alternative '{}'", alt));
                    }
                }
                Ok(Converter::OneOf(alternatives))
            }
            other => Err(format!("unknown converter '{}'", other)),
        }
    }

    /// Regex fragment matching one value (unanchored, no groups).
    pub fn regex(&self) -> String {
        match self {
            Converter::Int => "[0-9]+".to_string(),
            Converter::Str => "[^/]+".to_string(),
            Converter::Slug => "[-a-zA-Z0-9_]+".to_string(),
            Converter::Uuid => {
                "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}".to_string()
            }
            Converter::Path => ".+".to_string(),
            Converter::OneOf(alternatives) => {
                let escaped: Vec<String> = alternatives.iter().map(|a| regex::escape(a)).collect();
                format!("(?:{})", escaped.join("|"))
            }
        }
    }

    /// Human-readable constraint, as written in the template.
    pub fn constraint(&self) -> String {
        match self {
            Converter::Int => "int".to_string(),
            Converter::Str => "str".to_string(),
            Converter::Slug => "slug".to_string(),
            Converter::Uuid => "uuid".to_string(),
            Converter::Path => "path".to_string(),
            Converter::OneOf(alternatives) => alternatives.join("|"),
        }
    }

    /// Check a raw (unencoded) value against the constraint.
    pub fn accepts(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match self {
            Converter::Int => value.bytes().all(|b| b.is_ascii_digit()),
            Converter::Str => !value.contains('/'),
            Converter::Slug => value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
            Converter::Uuid => is_lower_uuid(value),
            Converter::Path => true,
            Converter::OneOf(alternatives) => alternatives.iter().any(|a| a == value),
        }
    }

    /// A legal value, used to build example paths for documentation and probes.
    pub fn sample_value(&self) -> String {
        match self {
            Converter::Int => "1".to_string(),
            Converter::Str => "example".to_string(),
            Converter::Slug => "example-slug".to_string(),
            Converter::Uuid => "00000000-0000-4000-8000-000000000000".to_string(),
            Converter::Path => "example/path".to_string(),
            Converter::OneOf(alternatives) => alternatives.first().cloned().unwrap_or_default(),
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn is_lower_uuid(value: &str) -> bool {
    value.len() == 36
        && value.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_digit() || ('a'..='f').contains(&c),
        })
}

fn is_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param { name: String, converter: Converter },
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, RoutingError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('<') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('>')
                .ok_or_else(|| RoutingError::invalid_pattern(source, "unterminated placeholder"))?;
            let inner = &after[..close];

            let (converter, name) = match inner.split_once(':') {
                Some((spec, name)) => (
                    Converter::parse(spec).map_err(|reason| RoutingError::invalid_pattern(source, reason))?,
                    name,
                ),
                None => (Converter::Str, inner),
            };
            if !is_param_name(name) {
                return Err(RoutingError::invalid_pattern(
                    source,
                    format!("invalid parameter name '{}'", name),
                ));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Param {
                name: name.to_string(),
                converter,
            });
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let template = Self {
            source: source.to_string(),
            segments,
        };
        template.check_unique_params()?;
        Ok(template)
    }

    /// Concatenate two templates exactly as written.
    pub fn join(&self, other: &Template) -> Result<Template, RoutingError> {
        let mut segments = self.segments.clone();
        for segment in &other.segments {
            match (segments.last_mut(), segment) {
                (Some(Segment::Literal(prev)), Segment::Literal(next)) => prev.push_str(next),
                _ => segments.push(segment.clone()),
            }
        }
        let template = Template {
            source: format!("{}{}", self.source, other.source),
            segments,
        };
        template.check_unique_params()?;
        Ok(template)
    }

    fn check_unique_params(&self) -> Result<(), RoutingError> {
        let mut seen = Vec::new();
        for (name, _) in self.params() {
            if seen.contains(&name) {
                return Err(RoutingError::invalid_pattern(
                    &self.source,
                    format!("parameter '{}' appears more than once", name),
                ));
            }
            seen.push(name);
        }
        Ok(())
    }

    /// The template as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholders in template order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &Converter)> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, converter } => Some((name.as_str(), converter)),
            Segment::Literal(_) => None,
        })
    }

    /// The template text when it has no placeholders.
    pub fn as_literal(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [] => Some(""),
            [Segment::Literal(text)] => Some(text),
            _ => None,
        }
    }

    /// Anchored regex source for this template.
    pub fn to_regex(&self, kind: PatternKind) -> String {
        let mut re = String::from("^");
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => re.push_str(&regex::escape(text)),
                Segment::Param { name, converter } => {
                    re.push_str(&format!("(?P<{}>{})", name, converter.regex()));
                }
            }
        }
        if kind == PatternKind::Exact {
            re.push('$');
        }
        re
    }

    /// Substitute values into the template.
    ///
    /// `route` is only used to label errors.
    pub fn render<F>(&self, route: &str, lookup: F) -> Result<String, RoutingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut url = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Param { name, converter } => {
                    let value = lookup(name).ok_or_else(|| RoutingError::MissingParameter {
                        route: route.to_string(),
                        param: name.clone(),
                    })?;
                    if !converter.accepts(&value) {
                        return Err(RoutingError::InvalidParameterValue {
                            route: route.to_string(),
                            param: name.clone(),
                            constraint: converter.constraint(),
                            value,
                        });
                    }
                    url.push_str(&encode_path_value(&value));
                }
            }
        }
        Ok(url)
    }

    /// A concrete path accepted by this template, built from sample values.
    pub fn sample_path(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.clone(),
                Segment::Param { converter, .. } => encode_path_value(&converter.sample_value()),
            })
            .collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn encode_path_value(value: &str) -> String {
    value
        .split('/')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a pattern must consume the whole path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Leaf pattern: matches only when the whole path is consumed.
    Exact,
    /// Mount pattern: matches a leading part and yields the remainder.
    Prefix,
}

/// A declared pattern, as a sub-domain writes it.
///
/// The template is parsed when the table is built, so declarations stay
/// infallible and side-effect free.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub template: String,
    pub kind: PatternKind,
    pub target: HandlerRef,
    pub name: Option<String>,
}

impl Pattern {
    /// A leaf pattern.
    pub fn leaf(template: impl Into<String>, target: impl Into<HandlerRef>) -> Self {
        Self {
            template: template.into(),
            kind: PatternKind::Exact,
            target: target.into(),
            name: None,
        }
    }

    /// A prefix mount handing everything below it to `target`.
    pub fn mount(template: impl Into<String>, target: impl Into<HandlerRef>) -> Self {
        Self {
            template: template.into(),
            kind: PatternKind::Prefix,
            target: target.into(),
            name: None,
        }
    }

    /// Name the pattern for reverse lookup.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Compile this pattern beneath an already-joined prefix.
    pub fn compile(&self, prefix: &Template) -> Result<CompiledPattern, RoutingError> {
        let own = Template::parse(&self.template)?;
        let full = prefix.join(&own)?;
        CompiledPattern::new(full, self.kind)
    }
}

impl From<String> for HandlerRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Outcome of a successful pattern match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathMatch {
    /// Decoded parameter values by name.
    pub params: BTreeMap<String, String>,
    /// Unconsumed tail, only for prefix patterns.
    pub remainder: Option<String>,
}

/// A full template compiled into a matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: Template,
    kind: PatternKind,
    regex: Regex,
}

impl CompiledPattern {
    pub fn new(template: Template, kind: PatternKind) -> Result<Self, RoutingError> {
        let regex = Regex::new(&template.to_regex(kind))
            .map_err(|e| RoutingError::invalid_pattern(template.source(), e.to_string()))?;
        Ok(Self {
            template,
            kind,
            regex,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub(crate) fn regex_source(&self) -> &str {
        self.regex.as_str()
    }

    /// Match a raw request path (no leading `/`).
    pub fn match_path(&self, path: &str) -> Option<PathMatch> {
        if let Some(literal) = self.template.as_literal() {
            return match self.kind {
                PatternKind::Exact if path == literal => Some(PathMatch::default()),
                PatternKind::Prefix => path.strip_prefix(literal).map(|rest| PathMatch {
                    params: BTreeMap::new(),
                    remainder: Some(rest.to_string()),
                }),
                PatternKind::Exact => None,
            };
        }

        let caps = self.regex.captures(path)?;
        let mut params = BTreeMap::new();
        for (name, converter) in self.template.params() {
            let Some(m) = caps.name(name) else { continue };
            // The regex saw the encoded text; the decoded value must pass too.
            let value = urlencoding::decode(m.as_str()).ok()?.into_owned();
            if !converter.accepts(&value) {
                return None;
            }
            params.insert(name.to_string(), value);
        }
        let remainder = match self.kind {
            PatternKind::Prefix => caps.get(0).map(|m| path[m.end()..].to_string()),
            PatternKind::Exact => None,
        };
        Some(PathMatch { params, remainder })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(template: &str, kind: PatternKind) -> CompiledPattern {
        CompiledPattern::new(Template::parse(template).unwrap(), kind).unwrap()
    }

    #[test]
    fn test_parse_placeholders() {
        let t = Template::parse("projects/<uuid:uuid>/export.<json|yaml:format>").unwrap();
        let params: Vec<_> = t.params().map(|(n, c)| (n.to_string(), c.constraint())).collect();
        assert_eq!(
            params,
            vec![
                ("uuid".to_string(), "uuid".to_string()),
                ("format".to_string(), "json|yaml".to_string()),
            ]
        );
        assert_eq!(t.as_literal(), None);
    }

    #[test]
    fn test_bare_placeholder_defaults_to_str() {
        let t = Template::parse("users/<username>/").unwrap();
        let (_, conv) = t.params().next().unwrap();
        assert_eq!(conv, &Converter::Str);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Template::parse("a/<int:id"),
            Err(RoutingError::InvalidPattern { .. })
        ));
        assert!(Template::parse("a/<float:id>").is_err());
        assert!(Template::parse("a/<int:>").is_err());
        assert!(Template::parse("a/<int:1id>").is_err());
        assert!(Template::parse("a/<json|:format>").is_err());
        assert!(Template::parse("<int:id>/<str:id>").is_err());
    }

    #[test]
    fn test_join_is_exact_concatenation() {
        let prefix = Template::parse("v1/pix").unwrap();
        let leaf = Template::parse("").unwrap();
        let joined = prefix.join(&leaf).unwrap();
        assert_eq!(joined.source(), "v1/pix");
        assert_eq!(joined.as_literal(), Some("v1/pix"));

        let auth = Template::parse("v1/auth").unwrap();
        let login = Template::parse("/login").unwrap();
        assert_eq!(auth.join(&login).unwrap().as_literal(), Some("v1/auth/login"));
    }

    #[test]
    fn test_join_rejects_repeated_names() {
        let prefix = Template::parse("orgs/<int:id>/").unwrap();
        let leaf = Template::parse("users/<int:id>").unwrap();
        assert!(prefix.join(&leaf).is_err());
    }

    #[test]
    fn test_literal_exact_and_prefix() {
        let exact = compile("health/", PatternKind::Exact);
        assert!(exact.match_path("health/").is_some());
        assert!(exact.match_path("health/x").is_none());

        let mount = compile("static/", PatternKind::Prefix);
        let m = mount.match_path("static/css/site.css").unwrap();
        assert_eq!(m.remainder.as_deref(), Some("css/site.css"));
        assert!(mount.match_path("statics").is_none());
    }

    #[test]
    fn test_parameter_extraction() {
        let p = compile("threads/<int:pk>/messages/", PatternKind::Exact);
        let m = p.match_path("threads/42/messages/").unwrap();
        assert_eq!(m.params.get("pk").map(String::as_str), Some("42"));
        assert!(p.match_path("threads/abc/messages/").is_none());
        assert!(p.match_path("threads/42/messages/extra").is_none());
    }

    #[test]
    fn test_enumeration_constraint() {
        let p = compile("schema.<json|yaml:format>", PatternKind::Exact);
        assert!(p.match_path("schema.json").is_some());
        assert!(p.match_path("schema.yaml").is_some());
        assert!(p.match_path("schema.xml").is_none());
    }

    #[test]
    fn test_prefix_with_params_yields_remainder() {
        let p = compile("files/<slug:bucket>/", PatternKind::Prefix);
        let m = p.match_path("files/photos/2024/a.png").unwrap();
        assert_eq!(m.params.get("bucket").map(String::as_str), Some("photos"));
        assert_eq!(m.remainder.as_deref(), Some("2024/a.png"));
    }

    #[test]
    fn test_captures_are_decoded() {
        let p = compile("search/<str:term>", PatternKind::Exact);
        let m = p.match_path("search/hello%20world").unwrap();
        assert_eq!(m.params.get("term").map(String::as_str), Some("hello world"));
    }

    #[test]
    fn test_decoded_values_must_satisfy_converter() {
        let p = compile("search/<str:term>", PatternKind::Exact);
        assert!(p.match_path("search/a%2Fb").is_none());
        assert!(p.match_path("search/%FF").is_none());

        let m = p.match_path("search/caf%C3%A9").unwrap();
        assert_eq!(m.params.get("term").map(String::as_str), Some("café"));

        let path = compile("files/<path:rest>", PatternKind::Exact);
        let m = path.match_path("files/a%2Fb").unwrap();
        assert_eq!(m.params.get("rest").map(String::as_str), Some("a/b"));
    }

    #[test]
    fn test_render_validates_and_encodes() {
        let t = Template::parse("search/<str:term>/<int:page>").unwrap();
        let url = t
            .render("search", |name| match name {
                "term" => Some("hello world".to_string()),
                "page" => Some("2".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(url, "search/hello%20world/2");

        let missing = t.render("search", |_| None).unwrap_err();
        assert!(matches!(missing, RoutingError::MissingParameter { ref param, .. } if param == "term"));

        let invalid = t
            .render("search", |name| match name {
                "term" => Some("x".to_string()),
                _ => Some("two".to_string()),
            })
            .unwrap_err();
        assert!(matches!(invalid, RoutingError::InvalidParameterValue { ref param, .. } if param == "page"));
    }

    #[test]
    fn test_converter_accepts() {
        assert!(Converter::Uuid.accepts("123e4567-e89b-42d3-a456-426614174000"));
        assert!(!Converter::Uuid.accepts("123E4567-E89B-42D3-A456-426614174000"));
        assert!(!Converter::Int.accepts(""));
        assert!(!Converter::Str.accepts("a/b"));
        assert!(Converter::Path.accepts("a/b"));
        assert!(!Converter::Slug.accepts("no spaces"));
    }

    #[test]
    fn test_sample_path_matches_own_template() {
        for source in [
            "v1/projects/<uuid:uuid>/export.<json|yaml:format>",
            "v1/membership/plans/<int:pk>/",
            "files/<path:rest>",
            "tags/<slug:tag>/<name>",
        ] {
            let p = compile(source, PatternKind::Exact);
            let sample = p.template().sample_path();
            assert!(p.match_path(&sample).is_some(), "{} did not match {}", sample, source);
        }
    }
}
