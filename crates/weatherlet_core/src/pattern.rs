use desklet_logging::{desklet_debug, desklet_trace, desklet_warn};
use regex::{Regex, RegexBuilder};

/// A user-supplied extraction pattern, compiled once per configuration.
///
/// Patterns run in multi-line mode: `^` and `$` anchor at every line break
/// of the fetched page, including `\r\n` line ends. A source that fails to
/// compile is kept as an inert pattern that never matches, so one bad measure
/// never stops the rest of the panel from updating.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    /// Compiles `source`. Returns `None` for an empty source, which marks a
    /// measure as decorative only.
    pub fn compile(source: &str) -> Option<Self> {
        if source.is_empty() {
            return None;
        }
        let regex = match build_regex(source) {
            Ok(regex) => Some(regex),
            Err(err) => {
                desklet_warn!("Invalid pattern {:?} treated as no match: {}", source, err);
                None
            }
        };
        Some(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Compiles an optional source; `None` and `""` both mean "no pattern".
    pub fn compile_opt(source: Option<&str>) -> Option<Self> {
        source.and_then(Self::compile)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Capture group 1 of the first match. Later matches are ignored.
    pub fn first_group<'t>(&self, text: &'t str) -> Option<&'t str> {
        let regex = self.regex.as_ref()?;
        let value = regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|group| group.as_str());
        match value {
            Some(v) => desklet_trace!("Pattern {:?} matched value {:?}", self.source, v),
            None => desklet_debug!("No match for pattern {:?}", self.source),
        }
        value
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(text))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

/// Returns capture group 1 of the first match of `pattern` in `text`.
///
/// `None` when either argument is missing or empty, when the pattern does not
/// compile, or when nothing matches.
pub fn extract_first_group(pattern: Option<&str>, text: Option<&str>) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;
    let pattern = Pattern::compile_opt(pattern)?;
    pattern.first_group(text).map(ToOwned::to_owned)
}

/// Whether `pattern` matches anywhere in `text`. Missing arguments and
/// invalid patterns never match.
pub fn matches(pattern: Option<&str>, text: Option<&str>) -> bool {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return false;
    };
    Pattern::compile_opt(pattern).is_some_and(|p| p.is_match(text))
}

fn build_regex(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .multi_line(true)
        .crlf(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::build_regex;

    #[test]
    fn dollar_anchors_before_crlf() {
        let regex = build_regex(r"^Wind: (\w+)$").unwrap();
        let caps = regex.captures("Temp: 1\r\nWind: NW\r\n").unwrap();
        assert_eq!(&caps[1], "NW");
    }

    #[test]
    fn dot_does_not_cross_lines() {
        let regex = build_regex(r"Temp: (.*)").unwrap();
        let caps = regex.captures("Temp: 72F\nHumidity: 40%").unwrap();
        assert_eq!(&caps[1], "72F");
    }
}
