//! File discovery for the mdxscrub CLI.
//!
//! Enumerates the corpus: every `.mdx` file under a directory, recursively,
//! in lexicographic path order so runs are stable and reports are
//! reproducible.
//!
//! License: MIT OR Apache-2.0

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns all `.mdx` files under `dir`, sorted by path.
pub fn find_mdx_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "mdx"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_nested_mdx_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("z.mdx"), "z").unwrap();
        fs::write(dir.path().join("a.mdx"), "a").unwrap();
        fs::write(dir.path().join("sub/m.mdx"), "m").unwrap();
        fs::write(dir.path().join("skip.md"), "not mdx").unwrap();
        fs::write(dir.path().join("skip.txt"), "not mdx").unwrap();

        let files = find_mdx_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mdx", "sub/m.mdx", "z.mdx"]);
    }

    #[test]
    fn missing_directory_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = find_mdx_files(&dir.path().join("does-not-exist"));
        assert!(files.is_empty());
    }
}
