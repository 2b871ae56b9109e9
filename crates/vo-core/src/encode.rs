//! Query-string encoding.

use url::form_urlencoded;

/// Percent-encodes a query value.
///
/// Uses the `application/x-www-form-urlencoded` byte set (alphanumerics and
/// `*-._` pass through) but writes a space as `%20` instead of `+`. A literal
/// `+` is always emitted as `%2B`, so the substitution is unambiguous.
///
/// # Examples
///
/// ```
/// use vo_core::encode_query_value;
///
/// assert_eq!(encode_query_value("1.5e-7 2e-7"), "1.5e-7%202e-7");
/// assert_eq!(encode_query_value("CIRCLE 10+1"), "CIRCLE%2010%2B1");
/// ```
#[must_use]
pub fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Appends `ID=<encoded id>` to a base URL, choosing `?` or `&` as needed.
#[must_use]
pub fn append_id(base: &str, id: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}ID={}", encode_query_value(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters() {
        assert_eq!(encode_query_value("ivo://org/x?a=1&b"), "ivo%3A%2F%2Forg%2Fx%3Fa%3D1%26b");
        assert_eq!(encode_query_value(""), "");
        assert_eq!(encode_query_value("é"), "%C3%A9");
    }

    #[test]
    fn test_append_id() {
        assert_eq!(append_id("http://h/dl", "ivo://a?b"), "http://h/dl?ID=ivo%3A%2F%2Fa%3Fb");
        assert_eq!(append_id("http://h/dl?x=1", "a b"), "http://h/dl?x=1&ID=a%20b");
    }
}
