use std::borrow::Cow;
use std::string::FromUtf8Error;

/// Percent-decode a raw path segment, e.g. `profiles_hiremate%2Fabc123`
/// becomes `profiles_hiremate/abc123`. `+` is left as is.
pub fn decode_path_segment(raw: &str) -> Result<Cow<'_, str>, FromUtf8Error> {
    urlencoding::decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_encoded_slash() {
        assert_eq!(
            decode_path_segment("profiles_hiremate%2Fabc123").unwrap(),
            "profiles_hiremate/abc123"
        );
        assert_eq!(
            decode_path_segment("profiles_hiremate%2fabc123").unwrap(),
            "profiles_hiremate/abc123"
        );
    }

    #[test]
    fn test_plain_segment_is_unchanged() {
        assert_eq!(decode_path_segment("abc123").unwrap(), "abc123");
        assert_eq!(decode_path_segment("a+b").unwrap(), "a+b");
    }

    #[test]
    fn test_decodes_reserved_and_unicode() {
        assert_eq!(
            decode_path_segment("folder%2Fmy%20photo%3F%23").unwrap(),
            "folder/my photo?#"
        );
        assert_eq!(decode_path_segment("caf%C3%A9").unwrap(), "café");
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        assert!(decode_path_segment("bad%FF%FE").is_err());
    }
}
