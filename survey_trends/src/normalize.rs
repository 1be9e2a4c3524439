// Canonical form of headers and questions, used for comparisons only.

/// Canonicalizes a header or a question.
///
/// Line breaks (including the `\r\n` text left behind by some exports) become a
/// single space and the surrounding whitespace is removed. Applying it twice
/// gives the same result as applying it once.
pub fn normalize(header: &str) -> String {
    header
        .replace("\\r\\n", " ")
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

/// Lowercased words of a text, without punctuation. Only the words longer
/// than 3 characters are kept, shorter ones carry little meaning in survey
/// questions.
pub(crate) fn significant_tokens(text: &str) -> Vec<String> {
    let cleaned: String = normalize(text)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > 3)
        .map(|t| t.to_string())
        .collect()
}
