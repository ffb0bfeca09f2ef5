use crate::url::domain::is_loopback_host;
use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes that never lead to a fetchable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a company root URL to its canonical stored form
///
/// # Normalization Steps
///
/// 1. Trim whitespace; prepend `https://` when no scheme is given
/// 2. Parse; reject non-HTTP(S) schemes and missing hosts
/// 3. Upgrade `http` to `https` (loopback hosts keep `http` so local
///    servers stay reachable)
/// 4. Drop fragment and credentials
/// 5. Remove trailing slashes
///
/// # Examples
///
/// ```
/// use career_scout::url::normalize_company_url;
///
/// assert_eq!(
///     normalize_company_url("http://Acme.Example/").unwrap(),
///     "https://acme.example"
/// );
/// assert_eq!(normalize_company_url("acme.example").unwrap(), "https://acme.example");
/// ```
pub fn normalize_company_url(raw: &str) -> UrlResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" if is_loopback_host(&url) => {}
        "http" => url
            .set_scheme("https")
            .map_err(|_| UrlError::Malformed(format!("cannot upgrade {} to https", url)))?,
        other => {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                other
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    let _ = url.set_username("");
    let _ = url.set_password(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Resolves a link or suggestion against the page it came from
///
/// Returns None when the reference cannot lead to a fetchable page:
/// empty or fragment-only references, `javascript:`/`mailto:`/`tel:`/`data:`
/// schemes, unparseable references, or non-HTTP(S) results. The fragment of
/// the resolved URL is dropped.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use career_scout::url::resolve_against;
///
/// let base = Url::parse("https://acme.example/careers/").unwrap();
/// assert_eq!(
///     resolve_against(&base, "openings?team=eng").unwrap().as_str(),
///     "https://acme.example/careers/openings?team=eng"
/// );
/// assert_eq!(
///     resolve_against(&base, "/jobs#list").unwrap().as_str(),
///     "https://acme.example/jobs"
/// );
/// assert!(resolve_against(&base, "mailto:hr@acme.example").is_none());
/// ```
pub fn resolve_against(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    let lower = reference.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let mut resolved = base.join(reference).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Natural-key form of a frontier URL
///
/// Fragments never reach the store; everything else is kept verbatim so
/// distinct listing pages (`?page=2`) stay distinct rows.
pub fn frontier_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.to_string()
}
