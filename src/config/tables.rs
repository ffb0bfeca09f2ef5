//! Built-in locator tables
//!
//! English and Italian career vocabulary used by the locator. These are static
//! data: a config file may replace any list, but nothing negotiates them at
//! runtime.

/// Suffixes probed against the company root, in probing order
pub const CAREER_PATHS: &[&str] = &[
    "/careers",
    "/careers/",
    "/jobs",
    "/jobs/",
    "/en/careers",
    "/en/careers/",
    "/join-us",
    "/work-with-us",
    "/about/careers",
    "/company/careers",
    "/join",
    "/opportunities",
    "/company/jobs",
    "/team",
    "/lavora-con-noi",
    "/about/jobs",
    "/about-us/careers",
    "/about-us/jobs",
    "/it/careers",
    "/it/jobs",
    "/it/carriere",
    "/it/carriere/",
    "/it/jobs/",
    "/it/careers/",
    "/opportunita",
    "/carriere",
    "/en/company/careers",
    "/en/company/jobs",
    "/en/about/careers",
];

/// Fragments of a link URL that suggest a careers page
pub const URL_FRAGMENTS: &[&str] = &[
    "career",
    "careers",
    "jobs",
    "join",
    "lavora",
    "carriere",
    "company/careers",
    "about/careers",
    "en/company/careers",
    "en/careers",
];

/// Visible link text keywords
pub const LINK_KEYWORDS: &[&str] = &[
    "career",
    "careers",
    "jobs",
    "join us",
    "work with us",
    "join our team",
    "opportunities",
    "employment",
    "vacancies",
    "job openings",
    "open positions",
    "lavora con noi",
    "opportunità",
    "carriere",
    "posizioni aperte",
    "lavoro",
    "unisciti a noi",
    "join",
    "team",
    "hiring",
    "work for us",
];

/// Sitemap `<loc>` substrings
pub const SITEMAP_KEYWORDS: &[&str] = &[
    "career",
    "jobs",
    "job-openings",
    "lavora",
    "carriere",
    "opportunita",
    "posizioni",
];

/// Keywords counted by the fallback classifier
pub const JOB_KEYWORDS: &[&str] = &[
    "job",
    "career",
    "position",
    "opening",
    "vacancy",
    "apply",
    "join our team",
    "work with us",
];

fn owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| s.to_string()).collect()
}

pub fn career_paths() -> Vec<String> {
    owned(CAREER_PATHS)
}

pub fn url_fragments() -> Vec<String> {
    owned(URL_FRAGMENTS)
}

pub fn link_keywords() -> Vec<String> {
    owned(LINK_KEYWORDS)
}

pub fn sitemap_keywords() -> Vec<String> {
    owned(SITEMAP_KEYWORDS)
}
