//! URL classification for conditional enrichment
//!
//! The search connector returns general web results. This analyzer decides
//! which URLs can be enriched with specialized extractors: arxiv.org links go
//! to the arXiv extractor, wikipedia.org links to the Wikipedia extractor,
//! everything else stays a plain web source.

/// URLs sorted by their enrichment strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    /// arXiv paper URLs
    pub arxiv: Vec<String>,
    /// Wikipedia article URLs
    pub wikipedia: Vec<String>,
    /// Other web URLs, kept as-is
    pub other: Vec<String>,
}

/// Classifies URLs to determine the enrichment strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkAnalyzer;

const ARXIV_DOMAIN: &str = "arxiv.org";
const ARXIV_PATTERNS: [&str; 2] = ["/abs/", "/pdf/"];

const WIKIPEDIA_DOMAIN: &str = "wikipedia.org";
const WIKIPEDIA_PATTERN: &str = "/wiki/";

impl LinkAnalyzer {
    /// Create a new analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Classify URLs by source type.
    pub fn classify<S: AsRef<str>>(&self, urls: &[S]) -> ClassifiedLinks {
        let mut result = ClassifiedLinks::default();
        for url in urls {
            let url = url.as_ref();
            if self.is_arxiv(url) {
                result.arxiv.push(url.to_string());
            } else if self.is_wikipedia(url) {
                result.wikipedia.push(url.to_string());
            } else {
                result.other.push(url.to_string());
            }
        }
        result
    }

    /// Whether the URL points at an arXiv paper page.
    pub fn is_arxiv(&self, url: &str) -> bool {
        let (host, path) = match split_url(url) {
            Some(parts) => parts,
            None => return false,
        };
        let path = path.to_ascii_lowercase();
        host_matches(&host, ARXIV_DOMAIN) && ARXIV_PATTERNS.iter().any(|p| path.contains(p))
    }

    /// Whether the URL points at a Wikipedia article.
    pub fn is_wikipedia(&self, url: &str) -> bool {
        let (host, path) = match split_url(url) {
            Some(parts) => parts,
            None => return false,
        };
        host_matches(&host, WIKIPEDIA_DOMAIN)
            && path.to_ascii_lowercase().contains(WIKIPEDIA_PATTERN)
    }

    /// Extract the arXiv paper id from a URL.
    ///
    /// Handles both `/abs/ID` and `/pdf/ID` forms, with or without a `.pdf`
    /// suffix or version marker.
    pub fn extract_arxiv_id(&self, url: &str) -> Option<String> {
        let (_, path) = split_url(url)?;
        for pattern in ARXIV_PATTERNS {
            if let Some(rest) = path.split_once(pattern).map(|(_, rest)| rest) {
                let id = rest
                    .trim_end_matches('/')
                    .trim_end_matches(".pdf")
                    .trim_matches('/');
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        }
        None
    }

    /// Extract the article title slug from a Wikipedia URL.
    ///
    /// Fragments and query strings are stripped; the slug keeps its
    /// percent-encoding and underscores.
    pub fn extract_wikipedia_title(&self, url: &str) -> Option<String> {
        let (_, path) = split_url(url)?;
        let rest = path.split_once(WIKIPEDIA_PATTERN).map(|(_, rest)| rest)?;
        let title = rest
            .split(['#', '?'])
            .next()
            .unwrap_or("")
            .trim_matches('/');
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}

/// Split a URL into lowercase host and original-case path.
///
/// Title slugs are extracted from the path, so its case must survive.
fn split_url(url: &str) -> Option<(String, String)> {
    let rest = url.split_once("://").map(|(_, rest)| rest)?;
    let (host, path) = match rest.split_once('/') {
        Some((host, path)) => (host, format!("/{path}")),
        None => (rest, "/".to_string()),
    };
    // Drop userinfo and port from the authority component
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    Some((host.to_ascii_lowercase(), path))
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}
