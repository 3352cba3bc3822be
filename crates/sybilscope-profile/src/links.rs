//! Link normalization and risk heuristics.
//!
//! Links arrive as explicit profile fields or embedded in bio text. This
//! module normalizes them, extracts hosts without pulling in a full URL
//! parser, and scores two risk tiers:
//!
//! - `is_suspicious_domain` - shortener block list, punycode hosts, IPv4
//!   literal hosts
//! - `is_likely_phishing` - the above plus deep subdomain chains, userinfo
//!   tricks, brand typosquats, and scam keyword conjunctions

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// URL shorteners and redirectors treated as suspicious outright.
const SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "is.gd",
    "cutt.ly",
    "rb.gy",
    "rebrand.ly",
    "shorturl.at",
    "tiny.cc",
    "ow.ly",
    "buff.ly",
    "lnkd.in",
    "s.id",
];

/// Brand second-level labels checked for typosquats.
const BRAND_LABELS: &[&str] = &[
    "google",
    "facebook",
    "twitter",
    "instagram",
    "telegram",
    "discord",
    "metamask",
    "opensea",
    "coinbase",
    "binance",
    "uniswap",
    "paypal",
    "apple",
    "microsoft",
    "amazon",
    "farcaster",
    "warpcast",
];

/// Keyword pairs whose conjunction in a URL marks scam/mini-app bait.
const SCAM_KEYWORD_PAIRS: &[(&str, &str)] = &[
    ("airdrop", "claim"),
    ("free", "mint"),
    ("wallet", "verify"),
    ("seed", "phrase"),
    ("claim", "reward"),
    ("connect", "wallet"),
];

/// Punctuation commonly glued to the end of links in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '"', '\'', '>'];

static BIO_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("bio link regex"));

/// Normalize a raw link: trim whitespace and trailing punctuation, reject
/// non-HTTP(S) schemes. Malformed links yield `None` and are dropped.
#[must_use]
pub fn normalize_link(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches(TRAILING_PUNCTUATION);
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return None;
    }
    host_of(trimmed)?;
    Some(trimmed.to_string())
}

/// Extract links embedded in bio text.
#[must_use]
pub fn extract_bio_links(bio: &str) -> Vec<String> {
    BIO_LINK_RE
        .find_iter(bio)
        .filter_map(|m| normalize_link(m.as_str()))
        .collect()
}

/// The authority part of a URL: everything between the scheme and the first
/// path/query/fragment delimiter.
fn authority_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://")?.1;
    let end = rest
        .find(|c| c == '/' || c == '?' || c == '#')
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    if authority.is_empty() {
        None
    } else {
        Some(authority)
    }
}

/// Lowercased host of a URL, with userinfo and port stripped.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    let authority = authority_of(url)?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = host_port.split(':').next().unwrap_or(host_port);
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// Whether a URL carries userinfo (`user@host`), a classic disguise trick.
#[must_use]
pub fn has_userinfo(url: &str) -> bool {
    authority_of(url).is_some_and(|a| a.contains('@'))
}

/// Whether a host is a literal IPv4 address.
#[must_use]
pub fn is_ipv4_host(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| o.parse::<u8>().is_ok())
}

/// Whether any label of a host is IDNA punycode.
#[must_use]
pub fn is_punycode_host(host: &str) -> bool {
    host.split('.').any(|label| label.starts_with("xn--"))
}

/// Whether a URL points at a suspicious domain: a known shortener (matched
/// as equality or subdomain suffix), a punycode host, or an IPv4 literal.
#[must_use]
pub fn is_suspicious_domain(url: &str) -> bool {
    let Some(host) = host_of(url) else {
        return false;
    };
    if is_punycode_host(&host) || is_ipv4_host(&host) {
        return true;
    }
    SHORTENER_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

/// Levenshtein edit distance.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Undo common digit-for-letter substitutions in a label.
fn undo_digit_substitution(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'l',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '7' => 't',
            other => other,
        })
        .collect()
}

/// The second-level label of a host (`sub.example.com` -> `example`).
fn second_level_label(host: &str) -> Option<&str> {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    match labels.len() {
        0 => None,
        1 => Some(labels[0]),
        n => Some(labels[n - 2]),
    }
}

/// Whether a host's second-level label typosquats a known brand.
fn is_brand_typosquat(host: &str) -> bool {
    let Some(label) = second_level_label(host) else {
        return false;
    };
    for brand in BRAND_LABELS {
        if label == *brand {
            // The real brand, not a squat.
            return false;
        }
        let dist = levenshtein(label, brand);
        if dist == 1 || (dist == 2 && label.len() >= 6) {
            return true;
        }
        if undo_digit_substitution(label) == *brand {
            return true;
        }
    }
    false
}

/// Whether a URL is likely phishing: punycode/IP-literal host, deep
/// subdomain chain (>= 5 labels), userinfo, brand typosquat, or a scam
/// keyword conjunction.
#[must_use]
pub fn is_likely_phishing(url: &str) -> bool {
    let Some(host) = host_of(url) else {
        return false;
    };
    if is_punycode_host(&host) || is_ipv4_host(&host) {
        return true;
    }
    if host.split('.').filter(|l| !l.is_empty()).count() >= 5 {
        return true;
    }
    if has_userinfo(url) {
        return true;
    }
    if is_brand_typosquat(&host) {
        return true;
    }
    let lower = url.to_ascii_lowercase();
    SCAM_KEYWORD_PAIRS
        .iter()
        .any(|(a, b)| lower.contains(a) && lower.contains(b))
}

/// Unique-host ratio over a link list; 1.0 when the list is empty.
#[must_use]
pub fn link_diversity(links: &[String]) -> f64 {
    if links.is_empty() {
        return 1.0;
    }
    let hosts: HashSet<String> = links.iter().filter_map(|l| host_of(l)).collect();
    hosts.len() as f64 / links.len() as f64
}
