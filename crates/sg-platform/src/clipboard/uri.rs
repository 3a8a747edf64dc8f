use std::path::PathBuf;

/// Turns a clipboard file entry (`file:///a%20b.png` or a bare path) into
/// a local path. Non-file URIs yield `None`.
pub(crate) fn file_entry_to_path(entry: &str) -> Option<PathBuf> {
    let entry = entry.trim();
    if entry.is_empty() || entry.starts_with('#') {
        return None;
    }
    let raw = match entry.strip_prefix("file://") {
        Some(rest) => {
            // Drop an optional authority (`file://localhost/...`).
            let path_start = rest.find('/')?;
            percent_decode(&rest[path_start..])?
        }
        None if entry.contains("://") => return None,
        None => entry.to_string(),
    };
    Some(PathBuf::from(raw))
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return None;
            }
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
