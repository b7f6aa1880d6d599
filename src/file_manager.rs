//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei file di input e il calcolo dei
//! path di output.
//!
//! ## Responsabilità:
//! - Scansione NON ricorsiva della directory di input
//! - Filtro per suffisso del nome file (case-sensitive, nessuna normalizzazione)
//! - Ordinamento per nome opzionale, per una numerazione riproducibile
//! - Calcolo del nome di output secondo la `NamingPolicy`
//!
//! ## Naming policy:
//! - `PreserveStem`: `canzone.m4a` → `canzone.mp3`
//! - `NumericCounter`: il file i-esimo del batch → `i.mp3` (da 0)
//!
//! I file di output sono sempre piatti nella directory di output.

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Rule deriving an output file name from an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    PreserveStem,
    NumericCounter,
}

/// Manages file discovery and output naming
pub struct FileManager;

impl FileManager {
    /// Files directly inside `dir` whose name ends with `extension`
    pub fn find_matching_files(dir: &Path, extension: &str, sorted: bool) -> Result<Vec<PathBuf>> {
        let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
        if sorted {
            walker = walker.sort_by_file_name();
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(extension) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Stem of `input` with `input_extension` removed from the end of the file name
    pub fn stem(input: &Path, input_extension: &str) -> String {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.strip_suffix(input_extension) {
            Some(stem) => stem.to_string(),
            None => input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or(name),
        }
    }

    /// Output path for the `index`-th file of a batch
    pub fn output_path(
        output_dir: &Path,
        input: &Path,
        input_extension: &str,
        index: usize,
        policy: NamingPolicy,
        output_extension: &str,
    ) -> PathBuf {
        let stem = match policy {
            NamingPolicy::PreserveStem => Self::stem(input, input_extension),
            NamingPolicy::NumericCounter => index.to_string(),
        };
        output_dir.join(format!("{}.{}", stem, output_extension))
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_find_matching_is_case_sensitive_and_flat() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.m4a");
        touch(temp_dir.path(), "a.m4a");
        touch(temp_dir.path(), "loud.M4A");
        touch(temp_dir.path(), "notes.txt");
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
        touch(&temp_dir.path().join("nested"), "deep.m4a");
        std::fs::create_dir(temp_dir.path().join("folder.m4a")).unwrap();

        let files = FileManager::find_matching_files(temp_dir.path(), ".m4a", true).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.m4a", "b.m4a"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "photo.png");
        let files = FileManager::find_matching_files(temp_dir.path(), ".webp", false).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_output_path_policies() {
        let out = Path::new("output");
        let input = Path::new("input/my.song.m4a");

        assert_eq!(
            FileManager::output_path(out, input, ".m4a", 3, NamingPolicy::PreserveStem, "mp3"),
            PathBuf::from("output/my.song.mp3")
        );
        assert_eq!(
            FileManager::output_path(out, input, ".m4a", 3, NamingPolicy::NumericCounter, "pcm"),
            PathBuf::from("output/3.pcm")
        );
    }

    #[test]
    fn test_stem_strips_only_matched_suffix() {
        assert_eq!(FileManager::stem(Path::new("clipmp4"), "mp4"), "clip");
        assert_eq!(FileManager::stem(Path::new("a/photo.jfif"), ".jfif"), "photo");
        assert_eq!(FileManager::stem(Path::new("a/photo.png"), ".jpg"), "photo");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
    }
}
