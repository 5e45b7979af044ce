//! Path normalization for user-supplied paths
//!
//! Paths given on the command line are expanded (`~`), made absolute
//! against the current directory and lexically cleaned up. Nothing here
//! touches the filesystem, so the paths do not need to exist yet.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Return a normalized, absolute version of `path`
///
/// Relative paths are resolved against the process working directory at
/// call time.
pub fn normalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(normalize_from(&cwd, path))
}

/// Return a normalized, absolute version of `path` resolved against `base`
///
/// `base` is expected to be absolute. Applying this twice yields the same
/// result as applying it once.
pub fn normalize_from(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let expanded = expand_home(path.as_ref());
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    clean(&joined)
}

/// Expand a leading `~` to the user's home directory
///
/// `~user` forms are left untouched, as is everything when no home
/// directory can be determined.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Collapse `.` and `..` segments without resolving symlinks
///
/// `..` never climbs above the root of an absolute path.
fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn base() -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(r"C:\work\src")
        } else {
            PathBuf::from("/work/src")
        }
    }

    #[test]
    fn test_relative_path_is_resolved_against_base() {
        let path = normalize_from(&base(), "out/debug");
        assert_eq!(path, base().join("out").join("debug"));
        assert!(path.is_absolute());
    }

    #[test]
    fn test_dot_segments_are_collapsed() {
        let path = normalize_from(&base(), "./out/../build/./x");
        assert_eq!(path, base().join("build").join("x"));

        let path = normalize_from(&base(), "../../../..");
        assert!(path.is_absolute());
        assert_eq!(path.components().count(), base().components().count() - 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_path_ignores_base() {
        let path = normalize_from(&base(), "/opt/hdf5/../hdf5-1.14/share");
        assert_eq!(path, PathBuf::from("/opt/hdf5-1.14/share"));
    }

    #[test]
    fn test_home_shorthand_is_expanded() {
        let Some(home) = home_dir() else {
            return;
        };
        let path = normalize_from(&base(), "~/hdf5");
        assert_eq!(path, clean(&home.join("hdf5")));
        assert!(path.is_absolute());

        let path = normalize_from(&base(), "~");
        assert_eq!(path, clean(&home));
    }

    #[test]
    fn test_tilde_inside_name_is_not_expanded() {
        let path = normalize_from(&base(), "~backup/x");
        assert_eq!(path, base().join("~backup").join("x"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["out", "./a/../b", "~/x/../y", "../..", "a/./b/c/.."] {
            let once = normalize_from(&base(), input);
            let twice = normalize_from(&base(), &once);
            assert_eq!(once, twice, "input: {input}");
            assert!(once.is_absolute(), "input: {input}");
        }
    }

    #[test]
    #[serial]
    fn test_normalize_uses_current_directory() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize("x").unwrap(), cwd.join("x"));
    }
}
