//! Line matchers for yt-dlp console output.
//!
//! Two shapes are recognised, both searched anywhere in a line:
//!
//! - `Destination:` + whitespace + path
//! - `[download]` + whitespace + `NN[.N]%` ... `at <speed>` ... `ETA <eta>`
//!
//! Speed and ETA tokens are opaque: whatever non-whitespace run the tool
//! printed is passed through untouched.

const DESTINATION_MARKER: &str = "Destination:";
const DOWNLOAD_MARKER: &str = "[download]";

/// Captures from a progress line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressMatch<'a> {
    /// Percentage, clamped to `0.0..=100.0`.
    pub percent: f64,
    pub speed: &'a str,
    pub eta: &'a str,
}

/// Extract the path from a `Destination: <path>` line.
///
/// The marker must be followed by at least one whitespace character. The
/// rest of the line is the path, trimmed; a blank remainder does not match.
pub fn match_destination(line: &str) -> Option<&str> {
    line.match_indices(DESTINATION_MARKER).find_map(|(idx, _)| {
        let rest = &line[idx + DESTINATION_MARKER.len()..];
        let rest = skip_whitespace(rest)?;
        let path = rest.trim();
        (!path.is_empty()).then_some(path)
    })
}

/// Extract percent, speed and ETA from a `[download]` progress line.
///
/// After the percentage, the first `at <token>` that is itself followed by
/// an `ETA <token>` supplies the speed, and the first such `ETA` supplies
/// the ETA.
///
/// A token is the whole whitespace-free run after its keyword and is never
/// shortened to make a later keyword fit: `at 1MiB/sETA 00:05` takes
/// `1MiB/sETA` as the speed, finds no `ETA` after it and does not match.
pub fn match_progress(line: &str) -> Option<ProgressMatch<'_>> {
    line.match_indices(DOWNLOAD_MARKER).find_map(|(idx, _)| {
        let rest = &line[idx + DOWNLOAD_MARKER.len()..];
        let rest = skip_whitespace(rest)?;
        let (percent, rest) = parse_percent(rest)?;

        keyword_tokens(rest, "at").find_map(|(speed, after_speed)| {
            keyword_tokens(after_speed, "ETA")
                .next()
                .map(|(eta, _)| ProgressMatch {
                    percent: percent.clamp(0.0, 100.0),
                    speed,
                    eta,
                })
        })
    })
}

/// Final path segment, accepting both `/` and `\` separators.
///
/// Trailing separators are ignored, so `a/b/` yields `b`.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

/// Skip a run of one or more whitespace characters.
fn skip_whitespace(s: &str) -> Option<&str> {
    let rest = s.trim_start();
    (rest.len() < s.len()).then_some(rest)
}

/// `digits` or `digits.digits`, immediately followed by `%`.
fn parse_percent(s: &str) -> Option<(f64, &str)> {
    let int_len = leading_digits(s);
    if int_len == 0 {
        return None;
    }

    let mut end = int_len;
    if let Some(frac) = s[end..].strip_prefix('.') {
        let frac_len = leading_digits(frac);
        if frac_len > 0 {
            end += 1 + frac_len;
        }
    }

    let rest = s[end..].strip_prefix('%')?;
    let value = s[..end].parse::<f64>().ok()?;
    Some((value, rest))
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Every `keyword <token>` occurrence in `s`, in order, paired with the text
/// following the token.
fn keyword_tokens<'a>(
    s: &'a str,
    keyword: &'static str,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    s.match_indices(keyword).filter_map(move |(idx, _)| {
        let rest = skip_whitespace(&s[idx + keyword.len()..])?;
        let token_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (token_len > 0).then(|| rest.split_at(token_len))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_line() {
        assert_eq!(
            match_destination("[download] Destination: /out/@foo/1-Title.mp4"),
            Some("/out/@foo/1-Title.mp4")
        );
        assert_eq!(
            match_destination("[Merger] Merging formats into \"x\"; Destination:  C:\\dl\\a.mp4  "),
            Some("C:\\dl\\a.mp4")
        );
    }

    #[test]
    fn destination_requires_whitespace_and_path() {
        assert_eq!(match_destination("Destination:/no/space"), None);
        assert_eq!(match_destination("Destination:   "), None);
        assert_eq!(match_destination("no marker here"), None);
    }

    #[test]
    fn progress_line() {
        let m = match_progress("[download]  45.2% of 10.00MiB at 1.20MiB/s ETA 00:05").unwrap();
        assert!((m.percent - 45.2).abs() < f64::EPSILON);
        assert_eq!(m.speed, "1.20MiB/s");
        assert_eq!(m.eta, "00:05");
    }

    #[test]
    fn progress_integer_percent() {
        let m = match_progress("[download] 100% of 3.1MiB at 2MiB/s ETA 00:00").unwrap();
        assert!((m.percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_fragment_line() {
        let line = "[download]   7.5% of ~ 120.00MiB at  512.00KiB/s ETA 03:50 (frag 2/40)";
        let m = match_progress(line).unwrap();
        assert_eq!(m.speed, "512.00KiB/s");
        assert_eq!(m.eta, "03:50");
    }

    #[test]
    fn progress_is_clamped() {
        let m = match_progress("[download] 250.0% at 1KiB/s ETA 00:01").unwrap();
        assert!((m.percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_needs_all_parts() {
        assert!(match_progress("[download] 100% of 3.1MiB in 00:02").is_none());
        assert!(match_progress("[download] 45.2% of 10MiB at 1MiB/s").is_none());
        assert!(match_progress("[download] Destination: a.mp4").is_none());
        assert!(match_progress("[download]45.2% at 1MiB/s ETA 00:05").is_none());
        assert!(match_progress("[download] 45.% at 1MiB/s ETA 00:05").is_none());
        assert!(match_progress("45.2% at 1MiB/s ETA 00:05").is_none());
    }

    #[test]
    fn progress_uses_first_eta_after_speed() {
        let m = match_progress("[download] 10% at 2MiB/s ETA 01:00 ETA 02:00").unwrap();
        assert_eq!(m.speed, "2MiB/s");
        assert_eq!(m.eta, "01:00");
    }

    #[test]
    fn speed_token_swallows_glued_eta() {
        assert!(match_progress("[download] 45.2% at 1MiB/sETA 00:05").is_none());
    }

    #[test]
    fn progress_marker_may_repeat() {
        let m = match_progress("[download] [download] 3.0% at 9KiB/s ETA 10:00").unwrap();
        assert!((m.percent - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_unknown_tokens_pass_through() {
        let m = match_progress("[download]  12.0% of Unknown at Unknown B/s ETA Unknown").unwrap();
        assert_eq!(m.speed, "Unknown");
        assert_eq!(m.eta, "Unknown");
    }

    #[test]
    fn basename_handles_both_separators() {
        assert_eq!(basename("/out/@foo/1-Title.mp4"), "1-Title.mp4");
        assert_eq!(basename("C:\\dl\\@foo\\2-Clip.mp4"), "2-Clip.mp4");
        assert_eq!(basename("plain.mp4"), "plain.mp4");
        assert_eq!(basename("dir/sub/"), "sub");
        assert_eq!(basename(""), "");
    }
}
