//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r#"# mdshell configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[bridge]
# Expose capabilities through the isolated context bridge. When false they
# are assigned directly onto the UI global object.
context_isolation = true
# Capabilities made reachable from the UI context.
# exposed = ["bridge", "fileUtils", "path", "rgPath", "commandExists"]
# Explicit search tool location (skips PATH lookup).
# search_tool_path = "/usr/bin/rg"

[relay]
# Warn when a message targets a window that is already gone.
# log_dropped_sends = true

[logging]
# level = "info"          # trace, debug, info, warn, error
"#
}
