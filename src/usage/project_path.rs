use std::path::Path;

/// Decode a Claude Code project folder name into a readable path.
///
/// Project folders encode the session's working directory with every
/// path separator replaced by a hyphen, which collides with literal
/// hyphens inside directory names. Reconstruction probes the
/// filesystem: at each position the longest run of tokens naming an
/// existing entry wins. The probe is injected so the heuristic can be
/// swapped for a lossless encoding without touching callers.
pub fn decode_project_folder(name: &str) -> String {
    match dirs::home_dir() {
        Some(home) => decode_with(name, &home, |p| p.exists()),
        None => name.to_string(),
    }
}

fn decode_with<F>(name: &str, home: &Path, probe: F) -> String
where
    F: Fn(&Path) -> bool,
{
    let home_encoded = home.to_string_lossy().replace('/', "-");
    if name == home_encoded {
        return "~".to_string();
    }
    let prefix = format!("{home_encoded}-");
    let Some(remainder) = name.strip_prefix(prefix.as_str()) else {
        // Not an encoded home path; assume it is already a literal id.
        return name.to_string();
    };

    let parts: Vec<&str> = remainder.split('-').collect();
    let mut path = home.to_path_buf();
    let mut i = 0;
    while i < parts.len() {
        // Longest run of tokens that names an existing entry wins;
        // this is what recovers directories containing hyphens.
        let mut matched = false;
        for j in (i + 1..=parts.len()).rev() {
            let candidate = path.join(parts[i..j].join("-"));
            if probe(&candidate) {
                path = candidate;
                i = j;
                matched = true;
                break;
            }
        }
        if !matched {
            // Dead end: keep the rest as one literal segment.
            let remaining = parts[i..].join("-");
            return if path == home {
                format!("~/{remaining}")
            } else {
                format!("~/{}/{remaining}", relative_to(&path, home))
            };
        }
    }

    format!("~/{}", relative_to(&path, home))
}

fn relative_to(path: &Path, home: &Path) -> String {
    path.strip_prefix(home)
        .map(|rel| rel.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string_lossy().into_owned())
}
