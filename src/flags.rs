//! Flag image URLs derived from two-letter country codes.

/// Default flag CDN
pub const DEFAULT_FLAG_BASE_URL: &str = "https://flagcdn.com";

/// Builds the flag URL for a country code, or `None` when the code is unusable.
///
/// The URL is only referenced, never fetched.
pub fn flag_url(base_url: &str, code: Option<&str>) -> Option<String> {
    let code = code?.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(format!(
        "{}/{}.svg",
        base_url.trim_end_matches('/'),
        code.to_ascii_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_url_lowercases_code() {
        assert_eq!(
            flag_url(DEFAULT_FLAG_BASE_URL, Some("FR")),
            Some("https://flagcdn.com/fr.svg".to_string())
        );
    }

    #[test]
    fn test_flag_url_trims_trailing_slash() {
        assert_eq!(
            flag_url("http://flags.local/", Some("IT")),
            Some("http://flags.local/it.svg".to_string())
        );
    }

    #[test]
    fn test_flag_url_rejects_bad_codes() {
        assert_eq!(flag_url(DEFAULT_FLAG_BASE_URL, None), None);
        assert_eq!(flag_url(DEFAULT_FLAG_BASE_URL, Some("SOM")), None);
        assert_eq!(flag_url(DEFAULT_FLAG_BASE_URL, Some("1A")), None);
        assert_eq!(flag_url(DEFAULT_FLAG_BASE_URL, Some("")), None);
    }
}
