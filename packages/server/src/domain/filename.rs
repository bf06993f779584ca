//! Filename derivation for ingested file payloads.

/// Reduce a raw token to a filesystem-safe form.
///
/// Keeps ASCII alphanumerics, `-`, `_` and `.`; whitespace runs collapse to a
/// single `_`; everything else is dropped. Leading dots are stripped so the
/// result can never look like a hidden or relative path component.
pub fn sanitize_token(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            if pending_space {
                out.push('_');
                pending_space = false;
            }
            out.push(ch);
        } else if ch.is_whitespace() {
            pending_space = !out.is_empty();
        }
    }
    let trimmed = out.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map a declared MIME type to a filename extension.
///
/// The extension is the trailing `/`-segment, with fixed remaps
/// (`jpeg`/`jpg` → `jpg`, `mpga` → `mp3`) and vendor-prefixed subtypes
/// reduced to the trailing `.`-token before any `;` parameter.
pub fn extension_for_mime(mime: &str) -> String {
    let subtype = mime.rsplit('/').next().unwrap_or(mime);
    let ext = if subtype.starts_with("vnd.") {
        mime.rsplit('.')
            .next()
            .unwrap_or(subtype)
            .split(';')
            .next()
            .unwrap_or(subtype)
    } else {
        match subtype {
            "jpeg" | "jpg" => "jpg",
            "mpga" => "mp3",
            other => other,
        }
    };
    let safe: String = ext
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .collect();
    if safe.is_empty() { "bin".to_string() } else { safe }
}
