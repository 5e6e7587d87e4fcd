//! Parsing of user-typed object addresses.

/// Error for an address string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrParseError {
    input: String,
}

impl std::fmt::Display for AddrParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid address '{}' (expected hex like 0xc000041200 or a decimal number)",
            self.input
        )
    }
}

impl std::error::Error for AddrParseError {}

/// Parses an address typed into the goto prompt.
///
/// Accepted forms:
/// - `0x`-prefixed hex: `0xc000041200`
/// - bare hex containing hex letters: `c000041200`
/// - decimal: `824634167808`
///
/// Bare digit-only input is read as decimal.
pub fn parse_addr(input: &str) -> Result<u64, AddrParseError> {
    let s = input.trim();
    let err = || AddrParseError {
        input: input.to_string(),
    };

    if s.is_empty() {
        return Err(err());
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_err(|_| err());
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<u64>().map_err(|_| err());
    }

    u64::from_str_radix(s, 16).map_err(|_| err())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_prefixed() {
        assert_eq!(parse_addr("0xc000041200").unwrap(), 0xc000041200);
        assert_eq!(parse_addr("0X10").unwrap(), 16);
    }

    #[test]
    fn test_decimal() {
        assert_eq!(parse_addr("12345").unwrap(), 12345);
    }

    #[test]
    fn test_bare_hex() {
        assert_eq!(parse_addr("c0ffee").unwrap(), 0xc0ffee);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(parse_addr("  0x10 ").unwrap(), 16);
    }

    #[test]
    fn test_invalid() {
        assert!(parse_addr("").is_err());
        assert!(parse_addr("zzz").is_err());
        assert!(parse_addr("0x").is_err());
        assert!(parse_addr("-5").is_err());
    }
}
