//! Symbol sanitization for transcript lines.
//!
//! Agent scripts decorate their output with pictographic symbols that many
//! terminals cannot render. Each known symbol is replaced with a bracketed
//! ASCII tag; everything else passes through untouched.

/// Symbol to tag substitutions, applied in order.
///
/// The fork-and-knife entry with its variation selector must precede the bare
/// codepoint, otherwise a stray U+FE0F would be left behind.
const SYMBOL_TAGS: &[(&str, &str)] = &[
    ("\u{1F3E8}", "[HOTEL]"),
    ("\u{1F3AB}", "[CHECKIN]"),
    ("\u{1F3A7}", "[SERVICE]"),
    ("\u{1F37D}\u{FE0F}", "[F&B]"),
    ("\u{1F37D}", "[F&B]"),
    ("\u{1F4B0}", "[FINANCE]"),
    ("\u{1F465}", "[HR]"),
    ("\u{1F527}", "[MAINTENANCE]"),
    ("\u{1F3AF}", "[MARKETING]"),
    ("\u{1F680}", "[START]"),
    ("\u{23F0}", "[TIMEOUT]"),
    ("\u{274C}", "[ERROR]"),
    ("\u{2705}", "[SUCCESS]"),
    ("\u{1F4CA}", "[DATA]"),
    ("\u{1F916}", "[AI]"),
    ("\u{1F4C4}", "[FILE]"),
];

/// Replace known decorative symbols in `line` with bracketed ASCII tags.
pub fn sanitize(line: &str) -> String {
    // Every symbol in the table is outside ASCII.
    if line.is_ascii() {
        return line.to_string();
    }

    let mut text = line.to_string();
    for (symbol, tag) in SYMBOL_TAGS {
        if text.contains(symbol) {
            text = text.replace(symbol, tag);
        }
    }
    text
}

/// Decode raw bytes permissively, then sanitize.
///
/// Invalid UTF-8 sequences become U+FFFD instead of failing.
pub fn sanitize_bytes(raw: &[u8]) -> String {
    sanitize(&String::from_utf8_lossy(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_is_identity() {
        let line = "Processing 7 invoices against purchase orders...";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize_bytes(b""), "");
    }

    #[test]
    fn test_replaces_known_symbols() {
        assert_eq!(
            sanitize("\u{1F3E8} Welcome to The Grand Serenity Hotel"),
            "[HOTEL] Welcome to The Grand Serenity Hotel"
        );
        assert_eq!(
            sanitize("\u{2705} Room 305 assigned \u{1F916}"),
            "[SUCCESS] Room 305 assigned [AI]"
        );
    }

    #[test]
    fn test_every_table_entry_is_replaced() {
        for (symbol, tag) in SYMBOL_TAGS {
            assert_eq!(&sanitize(symbol), tag);
        }
    }

    #[test]
    fn test_variation_selector_is_consumed() {
        assert_eq!(sanitize("\u{1F37D}\u{FE0F} Menu"), "[F&B] Menu");
        assert_eq!(sanitize("\u{1F37D} Menu"), "[F&B] Menu");
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        let line = "caf\u{e9} \u{2603} \u{1F600} \u{2014} done";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_repeated_symbols() {
        assert_eq!(
            sanitize("\u{274C}\u{274C} two failures"),
            "[ERROR][ERROR] two failures"
        );
    }

    #[test]
    fn test_invalid_bytes_become_replacement_character() {
        let raw = b"guest \xff\xfe list";
        assert_eq!(sanitize_bytes(raw), "guest \u{FFFD}\u{FFFD} list");
    }

    #[test]
    fn test_bytes_with_symbols() {
        let raw = "\u{1F4B0} invoice INV-004".as_bytes();
        assert_eq!(sanitize_bytes(raw), "[FINANCE] invoice INV-004");
    }
}
