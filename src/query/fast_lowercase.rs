/// Case-insensitive matching helpers for free-text filters.
/// ASCII input takes a byte-wise fast path; anything else falls back to
/// Unicode lowercasing.
use memchr::memmem;

pub trait FastLowercase {
    fn fast_to_lowercase(&self) -> String;
    fn fast_contains_ignore_case(&self, pattern: &str) -> bool;
    /// Substring test against a needle already passed through `fast_to_lowercase`.
    fn contains_lowered(&self, needle: &str) -> bool;
}

impl FastLowercase for str {
    #[inline]
    fn fast_to_lowercase(&self) -> String {
        if self.is_ascii() {
            self.to_ascii_lowercase()
        } else {
            self.to_lowercase()
        }
    }

    #[inline]
    fn fast_contains_ignore_case(&self, pattern: &str) -> bool {
        self.contains_lowered(&pattern.fast_to_lowercase())
    }

    fn contains_lowered(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        if self.is_ascii() && needle.is_ascii() {
            let haystack = self.as_bytes();
            let needle = needle.as_bytes();
            if haystack.len() < needle.len() {
                return false;
            }
            haystack
                .windows(needle.len())
                .any(|window| window.eq_ignore_ascii_case(needle))
        } else {
            let lowered = self.fast_to_lowercase();
            memmem::find(lowered.as_bytes(), needle.as_bytes()).is_some()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_to_lowercase() {
        assert_eq!("POSTGRES-DB".fast_to_lowercase(), "postgres-db");
        assert_eq!("CAFÉ".fast_to_lowercase(), "café");
        assert_eq!("МОСКВА".fast_to_lowercase(), "москва");
    }

    #[test]
    fn test_contains_ignore_case_ascii() {
        assert!("nginx-Web".fast_contains_ignore_case("WEB"));
        assert!("Connection refused".fast_contains_ignore_case("ion ref"));
        assert!(!"nginx-web".fast_contains_ignore_case("postgres"));
    }

    #[test]
    fn test_contains_ignore_case_unicode() {
        assert!("Café au lait".fast_contains_ignore_case("CAFÉ"));
        assert!("コンテナ停止".fast_contains_ignore_case("停止"));
        assert!(!"nginx".fast_contains_ignore_case("привет"));
    }

    #[test]
    fn test_edge_cases() {
        assert!("".fast_contains_ignore_case(""));
        assert!("redis".fast_contains_ignore_case(""));
        assert!(!"".fast_contains_ignore_case("redis"));
        assert!(!"db".contains_lowered("postgres"));
    }
}
