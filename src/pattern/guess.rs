use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::types::{Placeholder, Segment};
use super::compile;

// Trailing extension: "name.mkv"
static EXT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([A-Za-z][A-Za-z0-9]{0,4})$").unwrap());

// Bracketed CRC32-looking token: "[1A2B3C4D]"
static CRC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([0-9A-Fa-f]{6,8})\]").unwrap());

static RES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b((?:480|576|720|1080|1440|2160)[pi])\b").unwrap());

// Episode number candidates, most plausible first
static EP_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // S01E02
        r"(?i)\bS\d+E(\d+)",
        // Episode 12, Ep.12, Ep 12
        r"(?i)\bEp(?:isode)?\.?\s*(\d+)",
        // E01
        r"(?i)\bE(\d+)",
        // "- 01", "_01"
        r"[-_]\s*(\d+)",
        // standalone " 01 ", "(01)", ".01."
        r"(?:^|[\s.\[(])(\d{1,3})(?:$|[\s.\])v])",
    ]
    .iter()
    .map(|r| Regex::new(r).unwrap())
    .collect()
});

/// Guess an input template from an example filename.
///
/// Returns an empty string when no episode number can be located. A
/// non-empty guess always matches `filename` when compiled.
pub fn guess_pattern(filename: &str) -> String {
    let mut segments = vec![Segment::Literal(filename.to_string())];

    claim(&mut segments, &EXT_REGEX, Placeholder::Ext);
    claim(&mut segments, &CRC_REGEX, Placeholder::Any);
    claim(&mut segments, &RES_REGEX, Placeholder::Res);

    let found_episode = EP_REGEXES
        .iter()
        .any(|regex| claim(&mut segments, regex, Placeholder::EpNum));

    if !found_episode {
        debug!(filename = %filename, "No episode number found");
        return String::new();
    }

    let template: String = segments
        .iter()
        .map(|s| match s {
            Segment::Literal(text) => text.clone(),
            Segment::Field(p) => p.to_string(),
        })
        .collect();

    match compile(&template) {
        Ok(pattern) if pattern.matches(filename).is_some() => template,
        _ => {
            debug!(filename = %filename, template = %template, "Guessed pattern does not match its source");
            String::new()
        }
    }
}

/// Replace capture group 1 of the first match in any literal segment with a
/// placeholder. Returns whether a replacement happened.
fn claim(segments: &mut Vec<Segment>, regex: &Regex, placeholder: Placeholder) -> bool {
    for i in 0..segments.len() {
        let Segment::Literal(text) = &segments[i] else {
            continue;
        };
        let Some(group) = regex.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };

        let before = &text[..group.start()];
        let after = &text[group.end()..];

        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(Segment::Literal(before.to_string()));
        }
        replacement.push(Segment::Field(placeholder));
        if !after.is_empty() {
            replacement.push(Segment::Literal(after.to_string()));
        }

        segments.splice(i..=i, replacement);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_format_with_brackets() {
        assert_eq!(
            guess_pattern("[Sub] Series - 01 [1080p].mkv"),
            "[Sub] Series - {{EP_NUM}} [{{RES}}].{{EXT}}"
        );
    }

    #[test]
    fn test_space_separated() {
        assert_eq!(guess_pattern("Series 01.mp4"), "Series {{EP_NUM}}.{{EXT}}");
    }

    #[test]
    fn test_dot_separated() {
        assert_eq!(guess_pattern("Series.E01.mkv"), "Series.E{{EP_NUM}}.{{EXT}}");
    }

    #[test]
    fn test_no_resolution() {
        assert_eq!(guess_pattern("Series - 01.avi"), "Series - {{EP_NUM}}.{{EXT}}");
    }

    #[test]
    fn test_multiple_brackets() {
        assert_eq!(
            guess_pattern("[Group][1080p] Series - 01.mkv"),
            "[Group][{{RES}}] Series - {{EP_NUM}}.{{EXT}}"
        );
    }

    #[test]
    fn test_season_episode_marker() {
        assert_eq!(guess_pattern("Series S01E02.mkv"), "Series S01E{{EP_NUM}}.{{EXT}}");
    }

    #[test]
    fn test_episode_keyword() {
        assert_eq!(
            guess_pattern("Series Episode 12.mkv"),
            "Series Episode {{EP_NUM}}.{{EXT}}"
        );
    }

    #[test]
    fn test_crc_masking() {
        assert_eq!(
            guess_pattern("[Group] Series - 01 [1A2B3C4D].mkv"),
            "[Group] Series - {{EP_NUM}} [{{ANY}}].{{EXT}}"
        );
    }

    #[test]
    fn test_separator_beats_digits_in_title() {
        assert_eq!(
            guess_pattern("Mob Psycho 100 - 07.mkv"),
            "Mob Psycho 100 - {{EP_NUM}}.{{EXT}}"
        );
    }

    #[test]
    fn test_no_structure() {
        assert_eq!(guess_pattern("readme.txt"), "");
        assert_eq!(guess_pattern(""), "");
    }

    #[test]
    fn test_braces_in_name_are_rejected() {
        assert_eq!(guess_pattern("Show }} - 01.mkv"), "");
    }

    #[test]
    fn test_guess_is_sound() {
        let names = [
            "[Sub] Series - 01 [1080p].mkv",
            "[Group][720p] Another Show - 113v2.mkv",
            "Show.Name.S02E10.1080p.WEB.mkv",
            "Show Name Ep.5 (2160p).mp4",
            "Show_Name_03_[ABCDEF12].mkv",
            "86 - 11.webm",
            "Some Show (2019) 04.avi",
        ];

        for name in names {
            let guess = guess_pattern(name);
            assert!(!guess.is_empty(), "no guess for {}", name);
            let pattern = compile(&guess).unwrap();
            assert!(pattern.matches(name).is_some(), "{} does not match {}", guess, name);
        }
    }
}
