//! URL handling module for Career-Scout
//!
//! Company root normalization, structured resolution of relative links and
//! classifier suggestions, and domain extraction for frontier rows.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_loopback_host, origin_of};
pub use normalize::{frontier_key, normalize_company_url, resolve_against};
