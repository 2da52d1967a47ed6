//! Preparing generated scripts for speech synthesis.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest pause rendered, in dots (one dot per second).
const MAX_PAUSE_DOTS: usize = 10;

static PAUSE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[PAUZA\s*(\d+)s?\]").unwrap());

/// Replaces `[PAUZA Ns]` markers with up to ten dots.
///
/// The synthesizer has no pause markup; runs of periods produce natural silence.
pub fn prepare_for_speech(script: &str) -> String {
    PAUSE_MARKER
        .replace_all(script, |caps: &regex::Captures<'_>| {
            let secs = caps[1].parse::<usize>().unwrap_or(MAX_PAUSE_DOTS);
            ".".repeat(secs.min(MAX_PAUSE_DOTS))
        })
        .into_owned()
}
