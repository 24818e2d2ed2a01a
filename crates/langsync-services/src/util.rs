use once_cell::sync::Lazy;
use regex::Regex;

static LOCALE_FOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}-[A-Z]{2,3}$").expect("locale folder pattern"));

/// True when a single path segment names a language/region folder such as `pl-PL`.
pub fn is_locale_folder(segment: &str) -> bool {
    LOCALE_FOLDER.is_match(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_language_region_pairs() {
        for ok in ["pl-PL", "en-GB", "ast-ES", "es-MXN", "fil-PH"] {
            assert!(is_locale_folder(ok), "{ok} should match");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for bad in ["", "en", "EN-gb", "en_GB", "pl-pl", "english-GB", "en-GBRX", "x-PL", "en-GB/"] {
            assert!(!is_locale_folder(bad), "{bad} should not match");
        }
    }
}
