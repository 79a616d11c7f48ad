//! Per-request routing state.

/// Normalized view of one request path.
///
/// Owned by a single request and discarded once a decision is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    segments: Vec<String>,
    raw_segments: Vec<String>,
}

impl RequestContext {
    /// Split a request path into segments.
    ///
    /// Leading and trailing slashes are dropped; an empty path yields a
    /// single empty segment.
    pub fn new(raw_path: &str) -> Self {
        let trimmed = raw_path.trim_matches('/');
        let raw_segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();
        let segments = raw_segments.iter().map(|s| s.to_lowercase()).collect();
        Self {
            segments,
            raw_segments,
        }
    }

    /// Lower-cased segments, used for matching.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments as the client sent them.
    pub fn raw_segments(&self) -> &[String] {
        &self.raw_segments
    }

    pub fn first_segment(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or_default()
    }

    /// String every compiled route is matched against: `/` + joined segments.
    pub fn candidate(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let ctx = RequestContext::new("/FR-fr/Missions/Alpha/");
        assert_eq!(ctx.segments(), ["fr-fr", "missions", "alpha"]);
        assert_eq!(ctx.raw_segments(), ["FR-fr", "Missions", "Alpha"]);
        assert_eq!(ctx.first_segment(), "fr-fr");
        assert_eq!(ctx.candidate(), "/fr-fr/missions/alpha");
    }

    #[test]
    fn test_empty_path() {
        for path in ["", "/", "//"] {
            let ctx = RequestContext::new(path);
            assert_eq!(ctx.segments(), [""]);
            assert_eq!(ctx.candidate(), "/");
        }
    }

    #[test]
    fn test_path_without_leading_slash() {
        assert_eq!(RequestContext::new("about").candidate(), "/about");
    }
}
