use clap::Parser;

/// mdshell-preload: boot the editor's messaging bridge headless and report
/// what it exposes.
#[derive(Parser, Debug)]
#[command(name = "mdshell-preload", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error) or a full filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run as if the host reported context isolation off.
    #[arg(long)]
    pub no_isolation: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
