//! String path helpers exposed to the UI as `path`.

use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use crate::fs_utils::lexical_normalize;

#[derive(Debug, Clone, Copy, Default)]
pub struct PathUtils;

impl PathUtils {
    pub fn new() -> Self {
        Self
    }

    pub fn sep(&self) -> &'static str {
        MAIN_SEPARATOR_STR
    }

    /// Join segments and normalize the result. An absolute segment resets the path.
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let joined: PathBuf = segments.iter().map(|s| s.as_ref()).collect();
        self.normalize(&joined.to_string_lossy())
    }

    pub fn normalize(&self, path: &str) -> String {
        if path.is_empty() {
            return ".".into();
        }
        let normalized = lexical_normalize(Path::new(path));
        if normalized.as_os_str().is_empty() {
            ".".into()
        } else {
            normalized.to_string_lossy().into_owned()
        }
    }

    pub fn dirname(&self, path: &str) -> String {
        match Path::new(path).parent() {
            Some(parent) if parent.as_os_str().is_empty() => ".".into(),
            Some(parent) => parent.to_string_lossy().into_owned(),
            None if Path::new(path).has_root() => path.into(),
            None => ".".into(),
        }
    }

    /// Final path component, with `ext` stripped when it matches.
    pub fn basename(&self, path: &str, ext: Option<&str>) -> String {
        let base = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match ext {
            Some(ext) if base.len() > ext.len() && base.ends_with(ext) => {
                base[..base.len() - ext.len()].to_string()
            }
            _ => base,
        }
    }

    /// Extension including the leading dot, or an empty string.
    pub fn extname(&self, path: &str) -> String {
        Path::new(path)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    pub fn is_absolute(&self, path: &str) -> bool {
        Path::new(path).is_absolute()
    }
}
