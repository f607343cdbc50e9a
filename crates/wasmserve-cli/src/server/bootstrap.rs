//! The synthesized `index.html` that loads and runs the wasm module.

use crate::assets;
use std::fmt::Write as _;

const ARGV_PLACEHOLDER: &str = "{{ARGV}}";
const WASM_FILE_PLACEHOLDER: &str = "{{WASM_FILE}}";

/// Render the bootstrap page for `wasm_file` with `go.argv` set to `argv`.
///
/// Returns `None` if the embedded template is missing.
pub fn render(wasm_file: &str, argv: &[String]) -> Option<String> {
    let template = assets::bootstrap_template()?;
    Some(
        template
            .replace(WASM_FILE_PLACEHOLDER, &js_escape(wasm_file))
            .replace(ARGV_PLACEHOLDER, &argv_literal(argv)),
    )
}

/// `["a", "b"]`, each element script-escaped.
pub fn argv_literal(argv: &[String]) -> String {
    let items: Vec<String> = argv
        .iter()
        .map(|arg| format!("\"{}\"", js_escape(arg)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Escape text for a JavaScript string literal inside an HTML `<script>`.
///
/// Backslash and quotes are backslash-escaped. `<`, `>`, `&`, `=` and every
/// non-printable character become `\uXXXX`, matching Go's
/// `template.JSEscapeString`. Non-printable means control, format,
/// private-use, or any whitespace other than U+0020. Unassigned code points
/// are passed through, where Go would escape them.
pub fn js_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '<' | '>' | '&' | '=' => push_unicode_escape(&mut out, c),
            c if !is_printable(c) => push_unicode_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out
}

/// Unicode general category Cf.
const FORMAT_RANGES: &[(u32, u32)] = &[
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x180E, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
];

/// Unicode general category Co.
const PRIVATE_USE_RANGES: &[(u32, u32)] = &[
    (0xE000, 0xF8FF),
    (0xF0000, 0xFFFFD),
    (0x100000, 0x10FFFD),
];

fn in_ranges(c: char, ranges: &[(u32, u32)]) -> bool {
    let cp = u32::from(c);
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control()
        || c.is_whitespace()
        || in_ranges(c, FORMAT_RANGES)
        || in_ranges(c, PRIVATE_USE_RANGES))
}

fn push_unicode_escape(out: &mut String, c: char) {
    let mut buf = [0u16; 2];
    for unit in c.encode_utf16(&mut buf) {
        let _ = write!(out, "\\u{:04X}", unit);
    }
}
