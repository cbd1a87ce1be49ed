/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Turn free text into a URL slug: lowercase ASCII letters, digits and single dashes.
///
/// Turkish and German letters are transliterated (`ş` → `s`, `ß` → `ss`, ...);
/// anything else that is not alphanumeric becomes a separator.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        let mapped: Option<&str> = match ch {
            'ç' | 'Ç' => Some("c"),
            'ğ' | 'Ğ' => Some("g"),
            'ı' | 'İ' | 'I' | 'i' => Some("i"),
            'ö' | 'Ö' => Some("o"),
            'ş' | 'Ş' => Some("s"),
            'ü' | 'Ü' => Some("u"),
            'ä' | 'Ä' => Some("a"),
            'ß' => Some("ss"),
            _ => None,
        };

        let piece: String = match mapped {
            Some(s) => s.to_string(),
            None if ch.is_ascii_alphanumeric() => ch.to_ascii_lowercase().to_string(),
            None => {
                pending_dash = !out.is_empty();
                continue;
            }
        };

        if pending_dash {
            out.push('-');
            pending_dash = false;
        }
        out.push_str(&piece);
    }

    out
}

/// Absolute http(s) URL or a path on this site.
///
/// `//host` and `/\host` are rejected: browsers resolve both to another origin.
pub fn is_safe_link(url: &str) -> bool {
    if url.starts_with("https://") || url.starts_with("http://") {
        return true;
    }
    match url.strip_prefix('/') {
        Some(rest) => !rest.starts_with(['/', '\\']),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Business Cards"), "business-cards");
        assert_eq!(slugify("  A5 -- Flyer!! "), "a5-flyer");
    }

    #[test]
    fn test_slugify_turkish() {
        assert_eq!(slugify("Kartvizit Çeşitleri"), "kartvizit-cesitleri");
        assert_eq!(slugify("İŞLEM Öncesi Güncel"), "islem-oncesi-guncel");
    }

    #[test]
    fn test_slugify_german() {
        assert_eq!(slugify("Große Plakate"), "grosse-plakate");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_snowflake_id_is_positive_and_js_safe() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1i64 << 53));
    }

    #[test]
    fn test_is_safe_link() {
        assert!(is_safe_link("https://example.com/a"));
        assert!(is_safe_link("http://example.com"));
        assert!(is_safe_link("/"));
        assert!(is_safe_link("/tr/iletisim"));
        assert!(!is_safe_link("//evil.example/phish"));
        assert!(!is_safe_link("/\\evil.example"));
        assert!(!is_safe_link("javascript:alert(1)"));
        assert!(!is_safe_link("evil.example"));
        assert!(!is_safe_link(""));
    }
}
