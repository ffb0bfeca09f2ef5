use url::{Host, Url};

/// Extracts the domain recorded on frontier rows
///
/// The lowercase host, with the port appended when it is not the scheme's
/// default, so two services on one host stay distinguishable.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use career_scout::url::extract_domain;
///
/// let url = Url::parse("https://Acme.Example/careers").unwrap();
/// assert_eq!(extract_domain(&url), Some("acme.example".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/jobs").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Returns the origin of a URL as a URL with an empty path
///
/// `https://acme.example/about/team?x=1` becomes `https://acme.example/`.
pub fn origin_of(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    // Credentials never belong to the probed origin
    let _ = origin.set_username("");
    let _ = origin.set_password(None);
    origin
}

/// True for `localhost` and loopback IP addresses
pub fn is_loopback_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
