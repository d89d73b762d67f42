//! Input sanitation for client-supplied free text

/// Strip markup from an input string and cap its length
pub fn sanitize(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result.trim().chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(sanitize("<script>evil</script>name", 500), "evilname");
        assert_eq!(sanitize("<b>france</b>", 500), "france");
        assert_eq!(sanitize("plain", 500), "plain");
    }

    #[test]
    fn test_caps_length() {
        let long = "a".repeat(1000);
        assert_eq!(sanitize(&long, 500).len(), 500);
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize("  padded  ", 500), "padded");
    }

    #[test]
    fn test_keeps_inner_spaces() {
        assert_eq!(sanitize("south africa", 500), "south africa");
    }

    #[test]
    fn test_unclosed_tag_drops_rest() {
        assert_eq!(sanitize("name<script", 500), "name");
    }
}
