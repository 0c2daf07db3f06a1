/// Collapses runs of whitespace, trims and lowercases `raw` so differently
/// typed spellings of the same name compare equal.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_key;

    #[test]
    fn normalize_key_collapses_whitespace_and_case() {
        assert_eq!(normalize_key("  alex   YEOH "), "alex yeoh");
        assert_eq!(normalize_key("Alex\tYeoh"), "alex yeoh");
        assert_eq!(normalize_key("   "), "");
    }
}
