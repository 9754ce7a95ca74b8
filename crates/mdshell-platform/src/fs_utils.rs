//! File utilities exposed to the UI as `fileUtils`.
//!
//! Thin wrappers over `std::fs` and `tokio::fs` that attach the offending
//! path to every error. `copy` recurses into directories and `move_path`
//! survives cross-device renames; nothing else goes beyond the plain call.

use std::future::Future;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::time::UNIX_EPOCH;

use mdshell_common::PlatformError;
use serde::Serialize;
use tracing::debug;

/// Extensions the editor treats as Markdown documents.
pub const MARKDOWN_EXTENSIONS: &[&str] = &[
    "markdown", "mdown", "mkdn", "md", "mkd", "mdwn", "mdtxt", "mdtext", "mdx", "text", "txt",
];

/// Glob patterns matching [`MARKDOWN_EXTENSIONS`], used by the search tool.
pub const MARKDOWN_INCLUSIONS: &[&str] = &[
    "*.markdown",
    "*.mdown",
    "*.mkdn",
    "*.md",
    "*.mkd",
    "*.mdwn",
    "*.mdtxt",
    "*.mdtext",
    "*.mdx",
    "*.text",
    "*.txt",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "svg", "webp"];

/// Subset of file metadata the UI cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    pub size: u64,
    pub is_file: bool,
    pub is_directory: bool,
    pub modified_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileUtils;

impl FileUtils {
    pub fn new() -> Self {
        Self
    }

    pub fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    pub fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    pub fn path_exists_sync(&self, path: &Path) -> bool {
        path.exists()
    }

    pub fn ensure_dir_sync(&self, path: &Path) -> Result<(), PlatformError> {
        std::fs::create_dir_all(path).map_err(|e| PlatformError::file(path, e))
    }

    /// Whether `child` lies strictly inside `dir`. Purely lexical.
    pub fn is_child_of_directory(&self, dir: &Path, child: &Path) -> bool {
        let dir = lexical_normalize(dir);
        let child = lexical_normalize(child);
        child != dir && child.starts_with(&dir)
    }

    pub fn has_markdown_extension(&self, filename: &Path) -> bool {
        has_extension_in(filename, MARKDOWN_EXTENSIONS)
    }

    pub fn is_image_file(&self, path: &Path) -> bool {
        has_extension_in(path, IMAGE_EXTENSIONS) && path.is_file()
    }

    /// Whether both paths resolve to the same file system entry.
    ///
    /// Falls back to lexical comparison when either path can't be resolved.
    pub fn is_same_path_sync(&self, a: &Path, b: &Path) -> bool {
        match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => lexical_normalize(a) == lexical_normalize(b),
        }
    }

    pub fn markdown_inclusions(&self) -> &'static [&'static str] {
        MARKDOWN_INCLUSIONS
    }

    /// Remove everything inside `path`, creating it if missing.
    pub async fn empty_dir(&self, path: &Path) -> Result<(), PlatformError> {
        let mut entries = match tokio::fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return self.ensure_dir(path).await;
            }
            Err(e) => return Err(PlatformError::file(path, e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PlatformError::file(path, e))?
        {
            let entry_path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| PlatformError::file(&entry_path, e))?;
            let removed = if file_type.is_dir() {
                tokio::fs::remove_dir_all(&entry_path).await
            } else {
                tokio::fs::remove_file(&entry_path).await
            };
            removed.map_err(|e| PlatformError::file(&entry_path, e))?;
        }
        Ok(())
    }

    /// Copy a file or a whole directory tree, creating the destination's
    /// parent directories.
    pub async fn copy(&self, src: &Path, dest: &Path) -> Result<(), PlatformError> {
        if dest.starts_with(src) && src.is_dir() {
            return Err(PlatformError::PathError(format!(
                "cannot copy {} into itself",
                src.display()
            )));
        }
        if let Some(parent) = dest.parent() {
            self.ensure_dir(parent).await?;
        }
        self.copy_entry(src, dest).await
    }

    fn copy_entry<'a>(
        &'a self,
        src: &'a Path,
        dest: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), PlatformError>> + 'a>> {
        Box::pin(async move {
            let meta = tokio::fs::metadata(src)
                .await
                .map_err(|e| PlatformError::file(src, e))?;
            if !meta.is_dir() {
                return tokio::fs::copy(src, dest)
                    .await
                    .map(|_| ())
                    .map_err(|e| PlatformError::file(src, e));
            }

            self.ensure_dir(dest).await?;
            let mut entries = tokio::fs::read_dir(src)
                .await
                .map_err(|e| PlatformError::file(src, e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| PlatformError::file(src, e))?
            {
                let from = entry.path();
                self.copy_entry(&from, &dest.join(entry.file_name())).await?;
            }
            Ok(())
        })
    }

    pub async fn ensure_dir(&self, path: &Path) -> Result<(), PlatformError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| PlatformError::file(path, e))
    }

    /// Write `data` to `path`, creating parent directories first.
    pub async fn output_file(&self, path: &Path, data: &[u8]) -> Result<(), PlatformError> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent).await?;
        }
        self.write_file(path, data).await
    }

    /// Move `src` to `dest`, creating the destination's parent directories.
    ///
    /// Falls back to copy-then-delete when the rename crosses devices.
    pub async fn move_path(&self, src: &Path, dest: &Path) -> Result<(), PlatformError> {
        if let Some(parent) = dest.parent() {
            self.ensure_dir(parent).await?;
        }
        match tokio::fs::rename(src, dest).await {
            Ok(()) => Ok(()),
            Err(e) if is_cross_device(&e) => {
                debug!(src = %src.display(), dest = %dest.display(), "cross-device move");
                self.copy(src, dest).await?;
                let removed = if src.is_dir() {
                    tokio::fs::remove_dir_all(src).await
                } else {
                    tokio::fs::remove_file(src).await
                };
                removed.map_err(|e| PlatformError::file(src, e))
            }
            Err(e) => Err(PlatformError::file(src, e)),
        }
    }

    pub async fn stat(&self, path: &Path) -> Result<FileStat, PlatformError> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| PlatformError::file(path, e))?;
        let modified_ms = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64);
        Ok(FileStat {
            size: meta.len(),
            is_file: meta.is_file(),
            is_directory: meta.is_dir(),
            modified_ms,
        })
    }

    pub async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), PlatformError> {
        tokio::fs::write(path, data)
            .await
            .map_err(|e| PlatformError::file(path, e))
    }

    pub async fn read_file(&self, path: &Path) -> Result<Vec<u8>, PlatformError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| PlatformError::file(path, e))
    }
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

fn is_cross_device(err: &io::Error) -> bool {
    // EXDEV on unix, ERROR_NOT_SAME_DEVICE on windows.
    let code = if cfg!(windows) { 17 } else { 18 };
    err.raw_os_error() == Some(code)
}

/// Resolve `.` and `..` components without touching the file system.
pub(crate) fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_extensions_are_case_insensitive() {
        let fu = FileUtils::new();
        assert!(fu.has_markdown_extension(Path::new("README.md")));
        assert!(fu.has_markdown_extension(Path::new("notes.MARKDOWN")));
        assert!(fu.has_markdown_extension(Path::new("a/b/c.mdx")));
        assert!(!fu.has_markdown_extension(Path::new("image.png")));
        assert!(!fu.has_markdown_extension(Path::new("Makefile")));
    }

    #[test]
    fn inclusions_match_extensions() {
        assert_eq!(MARKDOWN_INCLUSIONS.len(), MARKDOWN_EXTENSIONS.len());
        for (glob, ext) in MARKDOWN_INCLUSIONS.iter().zip(MARKDOWN_EXTENSIONS) {
            assert_eq!(*glob, format!("*.{ext}"));
        }
    }

    #[test]
    fn child_of_directory_is_lexical() {
        let fu = FileUtils::new();
        assert!(fu.is_child_of_directory(Path::new("/docs"), Path::new("/docs/a/b.md")));
        assert!(fu.is_child_of_directory(Path::new("/docs/"), Path::new("/docs/./b.md")));
        assert!(!fu.is_child_of_directory(Path::new("/docs"), Path::new("/docs")));
        assert!(!fu.is_child_of_directory(Path::new("/docs"), Path::new("/docs/../etc/passwd")));
        assert!(!fu.is_child_of_directory(Path::new("/docs"), Path::new("/documents/x.md")));
    }

    #[test]
    fn normalize_handles_parent_components() {
        assert_eq!(lexical_normalize(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(lexical_normalize(Path::new("a/./b")), PathBuf::from("a/b"));
        assert_eq!(lexical_normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(lexical_normalize(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(lexical_normalize(Path::new("../../x")), PathBuf::from("../../x"));
    }

    #[test]
    fn same_path_through_symlink_free_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.md");
        std::fs::write(&file, "# a").unwrap();
        let alias = dir.path().join("sub").join("..").join("a.md");
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let fu = FileUtils::new();
        assert!(fu.is_same_path_sync(&file, &alias));
        assert!(!fu.is_same_path_sync(&file, &dir.path().join("b.md")));
    }

    #[test]
    fn image_file_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("shot.PNG");
        std::fs::write(&png, [0x89, 0x50, 0x4E, 0x47]).unwrap();

        let fu = FileUtils::new();
        assert!(fu.is_image_file(&png));
        assert!(!fu.is_image_file(&dir.path().join("missing.png")));
        assert!(!fu.is_image_file(dir.path()));
    }

    #[test]
    fn sync_queries() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x").join("y");
        let fu = FileUtils::new();

        assert!(!fu.path_exists_sync(&nested));
        fu.ensure_dir_sync(&nested).unwrap();
        assert!(fu.is_directory(&nested));
        assert!(!fu.is_file(&nested));
    }

    #[tokio::test]
    async fn output_file_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("note.md");
        let fu = FileUtils::new();

        fu.output_file(&path, b"# hello").await.unwrap();
        assert_eq!(fu.read_file(&path).await.unwrap(), b"# hello");

        let stat = fu.stat(&path).await.unwrap();
        assert!(stat.is_file);
        assert!(!stat.is_directory);
        assert_eq!(stat.size, 7);
        assert!(stat.modified_ms.is_some());
    }

    #[tokio::test]
    async fn copy_and_move() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.md");
        let copied = dir.path().join("copies").join("a.md");
        let moved = dir.path().join("moved").join("b.md");
        let fu = FileUtils::new();

        fu.write_file(&src, b"text").await.unwrap();
        fu.copy(&src, &copied).await.unwrap();
        assert!(src.exists());
        assert!(copied.exists());

        fu.move_path(&src, &moved).await.unwrap();
        assert!(!src.exists());
        assert_eq!(std::fs::read(&moved).unwrap(), b"text");
    }

    #[tokio::test]
    async fn copy_recurses_into_directories() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("notes");
        std::fs::create_dir_all(src.join("daily")).unwrap();
        std::fs::write(src.join("index.md"), "# index").unwrap();
        std::fs::write(src.join("daily").join("mon.md"), "# mon").unwrap();
        let dest = dir.path().join("backup").join("notes");
        let fu = FileUtils::new();

        fu.copy(&src, &dest).await.unwrap();
        assert_eq!(std::fs::read(dest.join("index.md")).unwrap(), b"# index");
        assert_eq!(std::fs::read(dest.join("daily").join("mon.md")).unwrap(), b"# mon");
        assert!(src.join("daily").join("mon.md").exists());
    }

    #[tokio::test]
    async fn copy_into_own_subtree_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("notes");
        std::fs::create_dir_all(&src).unwrap();

        let err = FileUtils::new()
            .copy(&src, &src.join("inner"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::PathError(_)));
    }

    #[tokio::test]
    async fn move_carries_directory_trees() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("drafts");
        std::fs::create_dir_all(src.join("old")).unwrap();
        std::fs::write(src.join("old").join("a.md"), "a").unwrap();
        let dest = dir.path().join("archive").join("drafts");

        FileUtils::new().move_path(&src, &dest).await.unwrap();
        assert!(!src.exists());
        assert_eq!(std::fs::read(dest.join("old").join("a.md")).unwrap(), b"a");
    }

    #[test]
    fn cross_device_errors_are_recognised() {
        let code = if cfg!(windows) { 17 } else { 18 };
        assert!(is_cross_device(&io::Error::from_raw_os_error(code)));
        assert!(!is_cross_device(&io::Error::new(io::ErrorKind::NotFound, "gone")));
    }

    #[tokio::test]
    async fn empty_dir_clears_contents_and_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("cache");
        std::fs::create_dir_all(target.join("sub")).unwrap();
        std::fs::write(target.join("f.txt"), "x").unwrap();
        std::fs::write(target.join("sub").join("g.txt"), "y").unwrap();

        let fu = FileUtils::new();
        fu.empty_dir(&target).await.unwrap();
        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);

        let missing = dir.path().join("fresh");
        fu.empty_dir(&missing).await.unwrap();
        assert!(missing.is_dir());
    }

    #[tokio::test]
    async fn read_missing_file_reports_path() {
        let fu = FileUtils::new();
        let err = fu
            .read_file(Path::new("/nonexistent/mdshell/file.md"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mdshell/file.md"));
    }
}
