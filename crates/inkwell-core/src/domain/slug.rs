/// Derive a URL slug from a title.
///
/// Lowercases the input, turns every run of characters outside `[a-z0-9]`
/// into a single `-`, and drops leading and trailing hyphens. The result may
/// be empty when the input has no ASCII letters or digits.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic_title() {
        assert_eq!(slugify("My First Post!"), "my-first-post");
    }

    #[test]
    fn test_slugify_collapses_symbol_runs() {
        assert_eq!(slugify("Rust -- & -- Go"), "rust-go");
        assert_eq!(slugify("a___b"), "a-b");
    }

    #[test]
    fn test_slugify_strips_edges() {
        assert_eq!(slugify("  --Hello--  "), "hello");
        assert_eq!(slugify("!!!2024 recap???"), "2024-recap");
    }

    #[test]
    fn test_slugify_equivalent_titles_collide() {
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("hello, world"), "hello-world");
    }

    #[test]
    fn test_slugify_non_ascii_is_replaced() {
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_all_symbols_is_empty() {
        assert_eq!(slugify("?!#"), "");
        assert_eq!(slugify(""), "");
    }
}
