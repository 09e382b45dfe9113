//! Persisted best score.
//!
//! The page stores the best score under a single `localStorage` key as a
//! decimal string. Anything that does not parse as a non-negative integer
//! reads back as 0.

/// `localStorage` key holding the best score.
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Decode a persisted value. Missing, empty, negative or garbled input is 0.
pub fn decode(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    match raw.parse::<u32>() {
        Ok(best) => best,
        Err(_) => {
            tracing::warn!(value = raw, "Ignoring corrupt persisted best score");
            0
        }
    }
}

pub fn encode(best: u32) -> String {
    best.to_string()
}

/// Script that writes `best` to `localStorage` when swapped into the page.
pub fn persist_script(best: u32) -> String {
    format!(
        "<script>localStorage.setItem('{}','{}')</script>",
        BEST_SCORE_KEY,
        encode(best)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_integers() {
        assert_eq!(decode(Some("42")), 42);
        assert_eq!(decode(Some(" 7 ")), 7);
        assert_eq!(decode(Some("0")), 0);
    }

    #[test]
    fn bad_values_default_to_zero() {
        assert_eq!(decode(None), 0);
        assert_eq!(decode(Some("")), 0);
        assert_eq!(decode(Some("abc")), 0);
        assert_eq!(decode(Some("-3")), 0);
        assert_eq!(decode(Some("12.5")), 0);
    }

    #[test]
    fn persist_script_uses_best_score_key() {
        let script = persist_script(17);
        assert_eq!(script, "<script>localStorage.setItem('bestScore','17')</script>");
        assert_eq!(decode(Some(&encode(17))), 17);
    }
}
