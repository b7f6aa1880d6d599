//! # Tool Path Resolver
//!
//! Locates the ffmpeg toolchain (`ffmpeg`, `ffprobe`) used by the audio and
//! video converters. Resolution order:
//! 1. Directory passed with `--ffmpeg` (or `ffmpeg_dir` in the config file)
//! 2. System `PATH`
//! 3. A fixed list of well-known installation directories
//!
//! A missing toolchain is not fatal: the converters fall back to the bare
//! command name and individual conversions fail with a clear message.

use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where a tool was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSource {
    ExplicitDir,
    SystemPath,
    WellKnownDir,
}

impl ToolSource {
    fn describe(&self) -> &'static str {
        match self {
            ToolSource::ExplicitDir => "--ffmpeg directory",
            ToolSource::SystemPath => "system PATH",
            ToolSource::WellKnownDir => "well-known location",
        }
    }
}

/// Resolved location of one executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTool {
    pub path: PathBuf,
    pub source: ToolSource,
}

/// Executables used by the ffmpeg-backed converters
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    /// False when at least one tool fell back to its bare name
    pub resolved: bool,
}

impl FfmpegTools {
    /// Bare command names, left to the OS to find at spawn time
    pub fn unresolved() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            resolved: false,
        }
    }
}

/// Tool path resolver
pub struct ToolPathResolver {
    explicit_dir: Option<PathBuf>,
    search_path: Option<std::ffi::OsString>,
    well_known_dirs: Vec<PathBuf>,
}

impl ToolPathResolver {
    /// Create a resolver over the process `PATH` and the platform's well-known directories
    pub fn new(explicit_dir: Option<PathBuf>) -> Self {
        Self {
            explicit_dir,
            search_path: env::var_os("PATH"),
            well_known_dirs: Self::default_well_known_dirs(),
        }
    }

    /// Create a resolver with an explicit search path and fallback list
    pub fn with_search_dirs(
        explicit_dir: Option<PathBuf>,
        search_path: Option<std::ffi::OsString>,
        well_known_dirs: Vec<PathBuf>,
    ) -> Self {
        Self {
            explicit_dir,
            search_path,
            well_known_dirs,
        }
    }

    fn default_well_known_dirs() -> Vec<PathBuf> {
        let mut dirs_list: Vec<PathBuf> = if cfg!(windows) {
            vec![
                PathBuf::from(r"C:\ffmpeg\bin"),
                PathBuf::from(r"C:\Program Files\ffmpeg\bin"),
                PathBuf::from(r"C:\Program Files (x86)\ffmpeg\bin"),
            ]
        } else {
            vec![
                PathBuf::from("/usr/local/bin"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/opt/homebrew/bin"),
                PathBuf::from("/opt/local/bin"),
                PathBuf::from("/snap/bin"),
            ]
        };

        if let Some(home) = dirs::home_dir() {
            dirs_list.push(home.join("ffmpeg").join("bin"));
        }

        dirs_list
    }

    fn executable_name(tool_name: &str) -> String {
        let extension = if cfg!(windows) { ".exe" } else { "" };
        format!("{}{}", tool_name, extension)
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool_name: &str) -> Option<ResolvedTool> {
        let executable = Self::executable_name(tool_name);

        if let Some(ref dir) = self.explicit_dir {
            let candidate = dir.join(&executable);
            debug!("Checking explicit toolchain path: {:?}", candidate);
            if candidate.is_file() {
                return Some(ResolvedTool {
                    path: candidate,
                    source: ToolSource::ExplicitDir,
                });
            }
            warn!("{} not found in {}", executable, dir.display());
        }

        if let Some(path) = self.find_in_system_path(&executable) {
            return Some(ResolvedTool {
                path,
                source: ToolSource::SystemPath,
            });
        }

        self.well_known_dirs
            .iter()
            .map(|dir| dir.join(&executable))
            .find(|candidate| candidate.is_file())
            .map(|path| ResolvedTool {
                path,
                source: ToolSource::WellKnownDir,
            })
    }

    /// Find tool in system PATH
    fn find_in_system_path(&self, executable: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        env::split_paths(search_path)
            .map(|dir| Path::new(&dir).join(executable))
            .find(|path| path.is_file())
    }

    /// Resolve ffmpeg and ffprobe, falling back to bare names
    pub fn ffmpeg_tools(&self) -> FfmpegTools {
        let ffmpeg = self.resolve_tool("ffmpeg");
        let ffprobe = self.resolve_tool("ffprobe");
        let resolved = ffmpeg.is_some() && ffprobe.is_some();

        if !resolved {
            warn!("ffmpeg toolchain not found; some formats may fail to convert");
        }

        let fallback = FfmpegTools::unresolved();
        FfmpegTools {
            ffmpeg: ffmpeg.map(|t| t.path).unwrap_or(fallback.ffmpeg),
            ffprobe: ffprobe.map(|t| t.path).unwrap_or(fallback.ffprobe),
            resolved,
        }
    }

    /// Get a report of tool availability
    pub fn get_tools_report(&self) -> String {
        let mut report = String::from("Toolchain report\n");
        if let Some(ref dir) = self.explicit_dir {
            report.push_str(&format!("Explicit directory: {}\n", dir.display()));
        }

        for tool in ["ffmpeg", "ffprobe"] {
            match self.resolve_tool(tool) {
                Some(found) => report.push_str(&format!(
                    "  ✅ {} -> {} ({})\n",
                    tool,
                    found.path.display(),
                    found.source.describe()
                )),
                None => report.push_str(&format!(
                    "  ❌ {} not found ({})\n",
                    tool,
                    Self::install_hint(tool)
                )),
            }
        }

        report
    }

    fn install_hint(tool_name: &str) -> String {
        if cfg!(target_os = "linux") {
            "install with: sudo apt-get install ffmpeg".to_string()
        } else if cfg!(target_os = "macos") {
            "install with: brew install ffmpeg".to_string()
        } else {
            format!("pass the folder containing {} with --ffmpeg", Self::executable_name(tool_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    fn touch_tool(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(ToolPathResolver::executable_name(name));
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_explicit_dir_wins() {
        let explicit = TempDir::new().unwrap();
        let on_path = TempDir::new().unwrap();
        let expected = touch_tool(explicit.path(), "ffmpeg");
        touch_tool(on_path.path(), "ffmpeg");

        let resolver = ToolPathResolver::with_search_dirs(
            Some(explicit.path().to_path_buf()),
            Some(OsString::from(on_path.path())),
            vec![],
        );

        let found = resolver.resolve_tool("ffmpeg").unwrap();
        assert_eq!(found.path, expected);
        assert_eq!(found.source, ToolSource::ExplicitDir);
    }

    #[test]
    fn test_falls_back_to_path_then_well_known() {
        let on_path = TempDir::new().unwrap();
        let well_known = TempDir::new().unwrap();
        let empty_explicit = TempDir::new().unwrap();
        touch_tool(on_path.path(), "ffmpeg");
        let probe = touch_tool(well_known.path(), "ffprobe");

        let resolver = ToolPathResolver::with_search_dirs(
            Some(empty_explicit.path().to_path_buf()),
            Some(OsString::from(on_path.path())),
            vec![well_known.path().to_path_buf()],
        );

        assert_eq!(resolver.resolve_tool("ffmpeg").unwrap().source, ToolSource::SystemPath);
        let found = resolver.resolve_tool("ffprobe").unwrap();
        assert_eq!(found.path, probe);
        assert_eq!(found.source, ToolSource::WellKnownDir);

        let tools = resolver.ffmpeg_tools();
        assert!(tools.resolved);
    }

    #[test]
    fn test_unresolved_toolchain_is_not_fatal() {
        let resolver = ToolPathResolver::with_search_dirs(None, None, vec![]);
        assert!(resolver.resolve_tool("ffmpeg").is_none());

        let tools = resolver.ffmpeg_tools();
        assert!(!tools.resolved);
        assert_eq!(tools.ffmpeg, PathBuf::from("ffmpeg"));

        let report = resolver.get_tools_report();
        assert!(report.contains("ffmpeg not found"));
    }
}
