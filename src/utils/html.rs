use ammonia;

/// Clean admin-authored question text using the ammonia whitelist.
///
/// Inline formatting such as `<b>` or `<code>` survives, while `<script>` (with its
/// content), event handler attributes and other unsafe markup are dropped.
/// The result is stored as-is and rendered without further escaping.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_inline_markup_and_strips_scripts() {
        let cleaned = clean_html("What does <code>ls</code> do?<script>alert(1)</script>");
        assert_eq!(cleaned, "What does <code>ls</code> do?");
    }

    #[test]
    fn escapes_stray_angle_brackets() {
        assert_eq!(clean_html("1 < 2"), "1 &lt; 2");
    }
}
