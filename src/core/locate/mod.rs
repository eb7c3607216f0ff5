//! Executable discovery
//!
//! Finds the game binary in an extracted tree. Matching is a pure function
//! over a listing so it can be exercised without real archives.

use crate::core::platform::{DiscoveryRule, MatchScope};
use crate::util;
use std::path::{Path, PathBuf};

/// One entry of a directory listing, relative to the walk root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Path relative to the root, `/`-separated
    pub relative_path: String,
    pub is_file: bool,
    pub executable: bool,
}

impl ListingEntry {
    fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

impl DiscoveryRule {
    /// Whether a listing entry is a candidate binary
    pub fn matches(&self, entry: &ListingEntry) -> bool {
        if !entry.is_file {
            return false;
        }
        match self.scope {
            MatchScope::FileName => self.pattern.matches(entry.file_name()),
            MatchScope::RelativePath => self.pattern.matches(&entry.relative_path),
        }
    }
}

/// First entry in listing order that satisfies `rule`
pub fn find_candidate<'a>(
    listing: &'a [ListingEntry],
    rule: &DiscoveryRule,
) -> Option<&'a ListingEntry> {
    listing.iter().find(|entry| rule.matches(entry))
}

/// Walk `root` top-down in lexicographic order.
///
/// Each directory yields its files before descending into its
/// subdirectories, so a shallow match always precedes a deeper one.
pub fn list_tree(root: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut listing = Vec::new();
    walk_dir(root, root, &mut listing)?;
    Ok(listing)
}

fn walk_dir(root: &Path, current: &Path, listing: &mut Vec<ListingEntry>) -> std::io::Result<()> {
    let mut entries = std::fs::read_dir(current)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        let relative = path
            .strip_prefix(root)
            .map_err(std::io::Error::other)?
            .to_string_lossy()
            .replace('\\', "/");

        if file_type.is_dir() {
            listing.push(ListingEntry {
                relative_path: relative,
                is_file: false,
                executable: false,
            });
            subdirs.push(path);
        } else {
            listing.push(ListingEntry {
                relative_path: relative,
                is_file: path.is_file(),
                executable: util::is_executable(&path),
            });
        }
    }

    for dir in subdirs {
        walk_dir(root, &dir, listing)?;
    }
    Ok(())
}

/// Find the game binary under `root`, returning its full path.
///
/// When the rule asks for it, the match is made executable before returning
/// because archives do not always keep the bit.
pub fn locate(root: &Path, rule: &DiscoveryRule) -> std::io::Result<Option<PathBuf>> {
    let listing = list_tree(root)?;
    tracing::debug!("Scanned {} entries under {:?}", listing.len(), root);

    let Some(entry) = find_candidate(&listing, rule) else {
        tracing::warn!("No executable matching {} under {:?}", rule.pattern, root);
        return Ok(None);
    };

    let path = root.join(&entry.relative_path);
    if rule.force_executable {
        tracing::debug!("Setting executable bit on {:?}", path);
        util::make_executable(&path)?;
    }

    tracing::info!("Found executable: {:?}", path);
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn file(path: &str, executable: bool) -> ListingEntry {
        ListingEntry {
            relative_path: path.to_string(),
            is_file: true,
            executable,
        }
    }

    fn dir(path: &str) -> ListingEntry {
        ListingEntry {
            relative_path: path.to_string(),
            is_file: false,
            executable: false,
        }
    }

    #[test]
    fn test_posix_rule_first_match_wins() {
        let listing = vec![
            dir("eaglercraft"),
            file("eaglercraft/eaglercraft.sh", true),
            file("eaglercraft/eaglercraft", false),
            file("eaglercraft/lib/eaglercraft", true),
        ];
        let found = find_candidate(&listing, &DiscoveryRule::posix()).unwrap();
        assert_eq!(found.relative_path, "eaglercraft/eaglercraft");
    }

    #[test]
    fn test_posix_rule_ignores_directories() {
        let listing = vec![dir("eaglercraft"), file("eaglercraft/run.sh", true)];
        assert!(find_candidate(&listing, &DiscoveryRule::posix()).is_none());
    }

    #[test]
    fn test_windows_rule_exact_path() {
        let rule = DiscoveryRule::windows();
        let listing = vec![
            file("eaglercraft.exe", false),
            file("other/eaglercraft/eaglercraft.exe", false),
            file("eaglercraft/eaglercraft.exe", false),
        ];
        let found = find_candidate(&listing, &rule).unwrap();
        assert_eq!(found.relative_path, "eaglercraft/eaglercraft.exe");

        assert!(find_candidate(&listing[..2], &rule).is_none());
    }

    #[test]
    fn test_list_tree_order() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("b/deep")).unwrap();
        fs::create_dir_all(root.path().join("a")).unwrap();
        fs::write(root.path().join("z.txt"), b"").unwrap();
        fs::write(root.path().join("a/one"), b"").unwrap();
        fs::write(root.path().join("b/deep/two"), b"").unwrap();
        fs::write(root.path().join("b/three"), b"").unwrap();

        let paths: Vec<String> = list_tree(root.path())
            .unwrap()
            .into_iter()
            .map(|e| e.relative_path)
            .collect();
        assert_eq!(
            paths,
            vec!["a", "b", "z.txt", "a/one", "b/deep", "b/three", "b/deep/two"]
        );
    }

    #[test]
    fn test_locate_prefers_shallow_match() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a/nested")).unwrap();
        fs::write(root.path().join("a/nested/eaglercraft"), b"deep").unwrap();
        fs::write(root.path().join("a/eaglercraft"), b"shallow").unwrap();

        let found = locate(root.path(), &DiscoveryRule::posix()).unwrap().unwrap();
        assert_eq!(found, root.path().join("a/eaglercraft"));
        assert!(util::is_executable(&found));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_sets_owner_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let game = root.path().join("eaglercraft");
        fs::write(&game, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&game, fs::Permissions::from_mode(0o610)).unwrap();

        let found = locate(root.path(), &DiscoveryRule::posix()).unwrap().unwrap();
        assert_eq!(found, game);
        let mode = fs::metadata(&game).unwrap().permissions().mode();
        assert_eq!(mode & 0o100, 0o100);
    }

    #[test]
    fn test_locate_not_found() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("README"), b"").unwrap();
        assert!(locate(root.path(), &DiscoveryRule::posix()).unwrap().is_none());
        assert!(locate(root.path(), &DiscoveryRule::windows()).unwrap().is_none());
    }

    #[test]
    fn test_locate_missing_root() {
        assert!(locate(Path::new("/nonexistent/zaplaunch"), &DiscoveryRule::posix()).is_err());
    }
}
