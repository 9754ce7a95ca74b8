//! Platform services behind the capabilities the preload context exposes.

pub mod clipboard;
pub mod command;
pub mod fs_utils;
pub mod path_utils;
pub mod paths;
pub mod search_tool;
pub mod shell;

pub use clipboard::Clipboard;
pub use command::CommandProbe;
pub use fs_utils::{FileStat, FileUtils, MARKDOWN_EXTENSIONS, MARKDOWN_INCLUSIONS};
pub use path_utils::PathUtils;
pub use paths::{config_dir, config_file, data_dir, ensure_dirs, tools_dir};
pub use search_tool::resolve_search_tool;
pub use shell::Shell;
