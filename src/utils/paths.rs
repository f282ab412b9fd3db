use std::path::{Path, PathBuf};

use super::environment::home_dir;

/// Replace a leading home directory with `~`
///
/// # Examples
///
/// ```no_run
/// use dirhist::format_path_with_tilde;
///
/// // Returns "~/src/dirhist" if HOME=/home/alice
/// let formatted = format_path_with_tilde("/home/alice/src/dirhist");
/// ```
pub fn format_path_with_tilde(path: &str) -> String {
    let home = home_dir();
    format_path_with_tilde_internal(path, home.as_deref().and_then(Path::to_str))
}

/// Internal helper for path formatting with optional home (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &str, home: Option<&str>) -> String {
    if let Some(home) = home.map(|h| h.trim_end_matches('/'))
        && !home.is_empty()
        && let Some(rest) = path.strip_prefix(home)
        && (rest.is_empty() || rest.starts_with('/'))
    {
        return format!("~{}", rest);
    }
    path.to_string()
}

/// Expand a leading `~` or `~/` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_internal(path, home_dir())
}

pub(crate) fn expand_tilde_internal(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Abbreviate a directory to fit `max_width` characters
///
/// The home prefix becomes `~`, then leading components are cut to their
/// first character until the path fits, e.g. `~/Documents/bar/baz` becomes
/// `~/D/b/baz`. If that is still too long, leading components are dropped
/// behind a `.../` marker. The last component is always kept whole.
pub fn shorten_path(path: &str, max_width: usize) -> String {
    let home = home_dir();
    shorten_path_internal(path, max_width, home.as_deref().and_then(Path::to_str))
}

pub(crate) fn shorten_path_internal(path: &str, max_width: usize, home: Option<&str>) -> String {
    if path.is_empty() {
        return String::new();
    }

    let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };
    let clean = format_path_with_tilde_internal(if trimmed.is_empty() { "/" } else { trimmed }, home);

    let mut parts: Vec<String> = clean.split('/').map(str::to_string).collect();
    if parts.len() == 1 {
        return clean;
    }
    let (mut prefix, start) = match parts[0].as_str() {
        "" => ("/".to_string(), 1),
        "~" => ("~/".to_string(), 1),
        _ => (String::new(), 0),
    };
    let last = parts.len() - 1;

    for i in start..last {
        if width(&parts[start..].join("/")) < max_width {
            break;
        }
        if let Some(first) = parts[i].chars().next() {
            parts[i] = first.to_string();
        }
    }

    for i in start..last {
        let candidate = format!("{}{}", prefix, parts[i..].join("/"));
        if width(&candidate) <= max_width {
            return candidate;
        }
        prefix = ".../".to_string();
    }

    format!("{}{}", prefix, parts[last])
}

fn width(text: &str) -> usize {
    text.chars().count()
}
