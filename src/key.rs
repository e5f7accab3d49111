use crate::types::{DocumentKey, Role};

/// Extension-to-role table
///
/// The source system exports every certificate twice: a machine-readable
/// `.json` form and a printable `.pdf` form. Matching is case-insensitive
/// on the extension; anything else is `Unknown`.
fn role_for_extension(extension: &str) -> Role {
    match extension.to_ascii_lowercase().as_str() {
        "json" => Role::StructuredData,
        "pdf" => Role::RenderedFile,
        _ => Role::Unknown,
    }
}

/// Derive the grouping key and role from a file name
///
/// Exported names look like `20250725135757_<certificate-id>.<ext>`: an
/// export timestamp prefix, an underscore, the certificate identity, and
/// the role-determining extension. The role comes from the final
/// extension; the key is everything before the first dot with the prefix
/// up to the first underscore stripped, trimmed and case-folded. Cutting
/// at the first dot keeps siblings with compound suffixes (`x_abc.v1.pdf`
/// next to `x_abc.json`) under one key. Derivation is deterministic:
/// equal normalized bases always produce byte-for-byte equal keys.
pub fn classify(name: &str) -> (DocumentKey, Role) {
    let role = match name.rsplit_once('.') {
        Some((_, extension)) => role_for_extension(extension),
        None => Role::Unknown,
    };

    let base = match name.split_once('.') {
        Some((base, _)) => base,
        None => name,
    };

    // Drop the export timestamp prefix when present; a name with nothing
    // after the underscore keeps its full base so the key is never empty.
    let identity = match base.split_once('_') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => base,
    };

    let key = identity.trim().to_lowercase();
    (DocumentKey(key), role)
}
