//! Posix path helpers
//!
//! Output paths, module specifiers and URLs all use `/` regardless of
//! platform, so relative-path arithmetic is done lexically on strings.

use std::path::{Component, Path};

/// Render a path with `/` separators, dropping `.` components
pub fn to_posix(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;
    for component in path.components() {
        match component {
            Component::RootDir => absolute = true,
            Component::Prefix(p) => parts.push(p.as_os_str().to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Lexically normalize a posix path (`a/./b/../c` → `a/c`)
///
/// Leading `..` segments that cannot be resolved are kept.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match out.last() {
                Some(last) if *last != ".." => {
                    out.pop();
                }
                _ if absolute => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    let joined = out.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Join two posix paths and normalize the result
pub fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        normalize(rest)
    } else {
        normalize(&format!("{base}/{rest}"))
    }
}

/// Posix parent directory (`a/b/c.js` → `a/b`, `c.js` → ``)
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Relative path from directory `from_dir` to `to`
///
/// Both arguments are normalized first. Returns an empty string when `to`
/// is `from_dir` itself.
pub fn relative(from_dir: &str, to: &str) -> String {
    let from = normalize(from_dir);
    let to = normalize(to);
    let from_parts: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<&str> = Vec::new();
    out.extend(std::iter::repeat("..").take(from_parts.len() - common));
    out.extend(&to_parts[common..]);
    out.join("/")
}

/// Relative path that always starts with an explicit `.` marker
///
/// Module resolvers treat `foo/bar` as a package specifier, so
/// path-relative specifiers must begin with `./` or `../`.
pub fn explicit_relative(from_dir: &str, to: &str) -> String {
    let rel = relative(from_dir, to);
    if rel.is_empty() {
        ".".to_string()
    } else if rel == ".." || rel.starts_with("../") {
        rel
    } else {
        format!("./{rel}")
    }
}

/// Strip a trailing extension (including its dot) when present
pub fn strip_extension<'a>(path: &'a str, extension: &str) -> &'a str {
    path.strip_suffix(extension).unwrap_or(path)
}

/// Convert a path under `root` into a normalized relative posix string
pub fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(to_posix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize("a/./b/../c"), "a/c");
        assert_eq!(normalize("./vendor/a.js"), "vendor/a.js");
        assert_eq!(normalize("../x"), "../x");
        assert_eq!(normalize("/root/../a"), "/a");
    }

    #[test]
    fn relative_between_siblings() {
        assert_eq!(relative("assets", "components/foo"), "../components/foo");
        assert_eq!(relative("a/b", "a/b/c"), "c");
        assert_eq!(relative("a/b", "a/b"), "");
        assert_eq!(relative("", "app"), "app");
    }

    #[test]
    fn explicit_relative_always_has_marker() {
        assert_eq!(explicit_relative("", "utils/foo"), "./utils/foo");
        assert_eq!(explicit_relative("components", "utils/foo"), "../utils/foo");
        assert_eq!(explicit_relative("utils", "utils"), ".");
        assert_eq!(explicit_relative("a/b", "a"), "..");
    }

    #[test]
    fn parent_of_nested_and_top_level() {
        assert_eq!(parent("a/b/c.js"), "a/b");
        assert_eq!(parent("c.js"), "");
    }

    #[test]
    fn relative_to_root_strips_prefix() {
        let root = PathBuf::from("/project/app");
        let file = root.join("components").join("foo.js");
        assert_eq!(
            relative_to_root(&root, &file),
            Some("components/foo.js".to_string())
        );
        assert_eq!(relative_to_root(&root, Path::new("/elsewhere/x.js")), None);
    }
}
