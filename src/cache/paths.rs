// Cache path utilities.
// Maps user identities onto files beneath the cache root.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/octofeed on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "octofeed").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to a user's cached events record under `root`.
pub fn user_events_path(root: &Path, identity: &str) -> PathBuf {
    root.join("users")
        .join(format!("{}.json", cache_key(identity)))
}

/// Normalize an identity into a cache key.
/// GitHub logins are case-insensitive, so keys are lowercased.
pub fn cache_key(identity: &str) -> String {
    sanitize_name(&identity.trim().to_lowercase())
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => format!("_{}", sanitized),
        _ => sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("simple"), "simple");
        assert_eq!(sanitize_name("with/slash"), "with_slash");
        assert_eq!(sanitize_name("owner:name"), "owner_name");
        assert_eq!(sanitize_name(".."), "_..");
        assert_eq!(sanitize_name(""), "_");
    }

    #[test]
    fn test_cache_key_is_case_insensitive() {
        assert_eq!(cache_key("OctoCat"), cache_key("octocat"));
        assert_eq!(cache_key(" octocat "), "octocat");
    }

    #[test]
    fn test_user_events_path() {
        let root = Path::new("/tmp/octofeed");
        let path = user_events_path(root, "Phatblat");
        assert!(path.ends_with("users/phatblat.json"));
        assert!(path.starts_with(root));
    }
}
