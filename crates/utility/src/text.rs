/// Turns an arbitrary display name into a lowercase ascii slug usable in
/// file names and URLs. Whitespace becomes a dash, umlauts are transcribed,
/// anything else non-alphanumeric is dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        match c {
            'ä' | 'Ä' => slug.push_str("ae"),
            'ö' | 'Ö' => slug.push_str("oe"),
            'ü' | 'Ü' => slug.push_str("ue"),
            'ß' => slug.push_str("ss"),
            c if c.is_whitespace() || c == '-' || c == '_' => {
                if !last_dash {
                    slug.push('-');
                    last_dash = true;
                }
                continue;
            }
            c if c.is_ascii_alphanumeric() => {
                slug.push(c.to_ascii_lowercase());
            }
            _ => continue,
        }
        last_dash = false;
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(slugify("Night Express"), "night-express");
        assert_eq!(slugify("  Inter   City  "), "inter-city");
    }

    #[test]
    fn transcribes_umlauts() {
        assert_eq!(slugify("Zürich Hbf"), "zuerich-hbf");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn drops_everything_else() {
        assert_eq!(slugify("a/b\\c:d"), "abcd");
        assert_eq!(slugify("train #7 (fast)"), "train-7-fast");
    }

    #[test]
    fn empty_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("///"), "");
    }
}
