//! Responsive image source sets and the local names derived from them.

use once_cell::sync::Lazy;
use regex::Regex;

/// Medium prefixes image ids with a density selector (`0*`, `1*_`, `1*-`, `1*`).
static DENSITY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0\*|1\*_|1\*-|1\*").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Descriptor {
    Width(u32),
    Density(f32),
    Unspecified,
}

impl Descriptor {
    fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Descriptor::Unspecified;
        };
        if let Some(width) = raw.strip_suffix('w').and_then(|w| w.parse().ok()) {
            Descriptor::Width(width)
        } else if let Some(density) = raw.strip_suffix('x').and_then(|x| x.parse().ok()) {
            Descriptor::Density(density)
        } else {
            Descriptor::Unspecified
        }
    }

    /// Comparable fidelity; a missing descriptor means `1x`
    fn weight(self) -> f64 {
        match self {
            Descriptor::Width(w) => f64::from(w),
            Descriptor::Density(d) => f64::from(d),
            Descriptor::Unspecified => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub url: &'a str,
    pub descriptor: Descriptor,
}

/// Parse a `srcset` attribute into its candidates, in source order
pub fn parse_srcset(srcset: &str) -> Vec<Candidate<'_>> {
    srcset
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split_whitespace();
            let url = parts.next()?;
            Some(Candidate {
                url,
                descriptor: Descriptor::parse(parts.next()),
            })
        })
        .collect()
}

/// Highest-fidelity candidate; the first one wins a tie
pub fn best_candidate<'s, 'a>(candidates: &'s [Candidate<'a>]) -> Option<&'s Candidate<'a>> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if current.descriptor.weight() >= candidate.descriptor.weight() => {
            Some(current)
        }
        _ => Some(candidate),
    })
}

/// Trailing path segment of an image URL, which Medium uses as the image id
pub fn original_name(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Local base name for an image id: extension dropped, density prefix stripped
pub fn normalized_base(name: &str) -> String {
    let stem = name.split('.').next().unwrap_or(name);
    DENSITY_PREFIX.replacen(stem, 1, "").into_owned()
}

/// An image resolved from a figure's source set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    /// Medium image id, e.g. `1*Xy9_abc.png`
    pub name: String,
    /// Normalized local base name, e.g. `Xy9_abc`
    pub base: String,
}

impl ImageSource {
    pub fn from_srcset(srcset: &str) -> Option<Self> {
        let candidates = parse_srcset(srcset);
        let best = best_candidate(&candidates)?;
        let name = original_name(best.url)?;
        let base = normalized_base(name);
        if base.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            base,
        })
    }

    /// In-body variant file name
    pub fn original_file(&self) -> String {
        format!("{}.avif", self.base)
    }

    /// Cover thumbnail file name
    pub fn cover_file(&self) -> String {
        format!("{}.png", self.base)
    }
}
