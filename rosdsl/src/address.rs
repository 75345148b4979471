use std::sync::LazyLock;

use regex::Regex;

const OCTET: &str = r"(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])";
const PREFIX: &str = r"(3[0-2]|[1-2]?[0-9])";

static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({OCTET}\.){{3}}{OCTET}$")).expect("ipv4 pattern"));

static IPV4_OPTIONAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^({OCTET}\.){{3}}{OCTET}(/{PREFIX})?$")).expect("ipv4 prefix pattern")
});

static IPV4_CIDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^({OCTET}\.){{3}}{OCTET}/{PREFIX}$")).expect("cidr pattern")
});

/// Bare dotted-quad address, no prefix.
pub fn is_ipv4(text: &str) -> bool {
    IPV4.is_match(text.trim())
}

/// Address with an optional `/0`-`/32` prefix.
pub fn is_ipv4_address(text: &str) -> bool {
    IPV4_OPTIONAL_PREFIX.is_match(text.trim())
}

/// Network in CIDR form; the prefix is required.
pub fn is_ipv4_cidr(text: &str) -> bool {
    IPV4_CIDR.is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_addresses() {
        assert!(is_ipv4("192.168.1.1"));
        assert!(is_ipv4("0.0.0.0"));
        assert!(!is_ipv4("192.168.1.1/24"));
        assert!(!is_ipv4("999.1.1.1"));
        assert!(!is_ipv4("10.0.0"));
        assert!(!is_ipv4("01.2.3.4"));
    }

    #[test]
    fn optional_prefix() {
        assert!(is_ipv4_address("10.0.0.1/24"));
        assert!(is_ipv4_address("10.0.0.1"));
        assert!(!is_ipv4_address("10.0.0.1/33"));
        assert!(!is_ipv4_address("999.1.1.1"));
    }

    #[test]
    fn cidr_requires_prefix() {
        assert!(is_ipv4_cidr("192.168.1.0/24"));
        assert!(is_ipv4_cidr("0.0.0.0/0"));
        assert!(!is_ipv4_cidr("192.168.1.0"));
    }
}
