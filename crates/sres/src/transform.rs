//! Line level transforms applied by the [`Embedder`](crate::embedder::Embedder).
//!
//! Each non-empty source line becomes one fragment, a quoted C string literal ending with `\n`.
//! Consecutive string literals are concatenated by the C compiler, so a declaration made of many
//! fragments still yields a single string.

use serde_json::Value;

/// Start of a line comment in C-like languages.
pub const COMMENT_MARKER: &str = "//";

/// Cuts the line at the first `//` that isn't directly preceded by a backslash.
///
/// This is a purely textual heuristic. It has no notion of string or character literals, so
/// a `//` inside a quoted string gets cut just like a real comment.
///
/// ## Example
/// ```
/// # use sres::transform::strip_line_comment;
/// assert_eq!(strip_line_comment("int x; // comment"), "int x; ");
/// assert_eq!(strip_line_comment(r"path\//note"), r"path\//note");
/// ```
pub fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut start = 0;

    while let Some(offset) = line[start..].find(COMMENT_MARKER) {
        let index = start + offset;
        if index == 0 || bytes[index - 1] != b'\\' {
            return &line[..index];
        }
        // Markers may overlap, as in `\///`
        start = index + 1;
    }

    line
}

/// Applies comment stripping (if enabled) and trailing whitespace removal. Returns `None` for
/// lines that end up empty, which don't produce a fragment at all.
///
/// The trailing whitespace pass also takes care of the line terminator, be it `\n`, `\r\n` or `\r`.
pub fn prepare_line(line: &str, strip_comments: bool) -> Option<&str> {
    let line = if strip_comments {
        strip_line_comment(line)
    } else {
        line
    };

    let line = line.trim_end_matches(is_trailing_space);
    (!line.is_empty()).then_some(line)
}

/// Unicode whitespace, plus the ASCII separators `\x1c` to `\x1f`.
fn is_trailing_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Quotes the line, with a `\n` appended, as a string literal.
///
/// Escaping follows JSON rules: quotes, backslashes and control characters are escaped, while
/// anything outside of ASCII is kept as literal UTF-8.
pub fn escape_fragment(line: &str) -> String {
    let mut text = String::with_capacity(line.len() + 1);
    text.push_str(line);
    text.push('\n');
    Value::String(text).to_string()
}

/// Builds the symbol name for an embedded file: `prefix` followed by `name`, where every
/// character outside of `[A-Za-z0-9]` is replaced with `_`.
///
/// The result isn't checked for uniqueness or clashes with keywords.
///
/// ## Example
/// ```
/// # use sres::transform::sanitize_identifier;
/// assert_eq!(sanitize_identifier("_", "my-shader.frag"), "_my_shader_frag");
/// ```
pub fn sanitize_identifier(prefix: &str, name: &str) -> String {
    let mut identifier = String::with_capacity(prefix.len() + name.len());
    identifier.push_str(prefix);
    for c in name.chars() {
        identifier.push(if c.is_ascii_alphanumeric() { c } else { '_' });
    }
    identifier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert_eq!(sanitize_identifier("_", "my-shader.frag"), "_my_shader_frag");
        assert_eq!(sanitize_identifier("k_", "a.txt"), "k_a_txt");
        assert_eq!(sanitize_identifier("", "Blit2D.vert"), "Blit2D_vert");
        // One replacement per character, not per byte
        assert_eq!(sanitize_identifier("_", "café.glsl"), "_caf__glsl");
        assert_eq!(sanitize_identifier("_", "<stdin>"), "__stdin_");
        // Prefixes are used verbatim
        assert_eq!(sanitize_identifier("g-", "x"), "g-x");
    }

    #[test]
    fn comment_stripping() {
        assert_eq!(strip_line_comment("int x; // comment"), "int x; ");
        assert_eq!(strip_line_comment("// whole line"), "");
        assert_eq!(strip_line_comment("a // b // c"), "a ");
        assert_eq!(strip_line_comment("no comments here"), "no comments here");
        assert_eq!(strip_line_comment("a / b"), "a / b");
    }

    #[test]
    fn escaped_comment_markers() {
        assert_eq!(strip_line_comment(r"path\//note"), r"path\//note");
        assert_eq!(strip_line_comment(r"path\\//note"), r"path\\//note");
        assert_eq!(strip_line_comment(r"a\// b // c"), r"a\// b ");
        // The second and third slash form an unescaped marker
        assert_eq!(strip_line_comment(r"a\///b"), r"a\/");
    }

    #[test]
    fn quoted_markers_are_not_understood() {
        assert_eq!(
            strip_line_comment(r#"const char* url = "http://x";"#),
            r#"const char* url = "http:"#
        );
    }

    #[test]
    fn line_preparation() {
        assert_eq!(prepare_line("foo();\n", false), Some("foo();"));
        assert_eq!(prepare_line("foo();\r\n", true), Some("foo();"));
        assert_eq!(prepare_line("\n", false), None);
        assert_eq!(prepare_line("   \t\n", true), None);
        assert_eq!(prepare_line("    // only a comment\n", true), None);
        assert_eq!(
            prepare_line("    // only a comment\n", false),
            Some("    // only a comment")
        );
        assert_eq!(prepare_line("int x; // comment\n", true), Some("int x;"));
        assert_eq!(
            prepare_line("int x; // comment\n", false),
            Some("int x; // comment")
        );
        assert_eq!(prepare_line("y\x1f\x1c \n", false), Some("y"));
        assert_eq!(prepare_line("\x1e\r", true), None);
        // Leading whitespace is kept
        assert_eq!(prepare_line("    indented  \n", false), Some("    indented"));
    }

    #[test]
    fn fragments() {
        assert_eq!(escape_fragment("foo();"), r#""foo();\n""#);
        assert_eq!(escape_fragment(r#"say("hi")"#), r#""say(\"hi\")\n""#);
        assert_eq!(escape_fragment(r"a\b"), r#""a\\b\n""#);
        assert_eq!(escape_fragment("a\tb"), r#""a\tb\n""#);
        assert_eq!(escape_fragment("bell\u{7}"), r#""bell\u0007\n""#);
        assert_eq!(escape_fragment("żółw"), "\"żółw\\n\"");
    }

    #[test]
    fn fragments_decode_to_the_original_line() {
        let lines = [
            r#"printf("%s\n", "quoted");"#,
            r"C:\shaders\blit.frag",
            "tab\there",
            "ünïcödé ✓",
        ];

        for line in lines {
            let decoded: String = serde_json::from_str(&escape_fragment(line)).unwrap();
            assert_eq!(decoded, format!("{line}\n"));
        }
    }
}
