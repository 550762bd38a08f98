//! Best-effort JSON extraction from raw model output
//!
//! Models wrap payloads in markdown fences or prepend commentary despite
//! instructions. This strips that transport noise without attempting any
//! parsing; validation happens downstream.

/// Strip fence markers and leading noise to recover a JSON payload candidate.
///
/// Total function: always returns its best guess, even when the result is
/// not valid JSON. Fence markers are stripped once, not recursively.
pub fn extract_json(raw: &str) -> String {
    let mut text = raw.trim();

    // Opening fence: drop everything up to and including the first line break
    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(nl) => &text[nl + 1..],
            None => "",
        };
    }

    // Closing fence: drop from the last marker to the end
    if text.trim_end().ends_with("```") {
        if let Some(pos) = text.rfind("```") {
            text = &text[..pos];
        }
    }

    let text = text.trim();

    // Leading commentary before the object start
    if let Some(start) = text.find('{') {
        if start > 0 {
            return text[start..].to_string();
        }
    }

    text.to_string()
}
