use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod report;
mod state;
mod verify;

use report::Console;
use verify::{Format, VerifyArgs};

#[derive(Parser, Debug)]
#[command(
    name = "langsync",
    version,
    about = "Check a translation tree against a reference release of the upstream project",
    disable_help_flag = true
)]
struct Cli {
    /// Release tag to test against; defaults to the one remembered from the last run
    tag: Option<String>,

    /// Do not report obsolete phrases
    #[arg(long)]
    ignore_obsolete: bool,

    /// Print help and the available release tags
    #[arg(short = 'h', long)]
    help: bool,

    /// Root of the translated project
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Use an existing reference checkout instead of fetching a release
    #[arg(long, conflicts_with = "archive")]
    reference_root: Option<PathBuf>,

    /// Extract the reference release from a local zip archive
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Locale folder name used by the translated tree (e.g. pl-PL)
    #[arg(long)]
    target_locale: Option<String>,

    /// Locale folder name used by the reference tree (e.g. en-GB)
    #[arg(long)]
    reference_locale: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn into_verify_args(self) -> VerifyArgs {
        VerifyArgs {
            tag: self.tag,
            ignore_obsolete: self.ignore_obsolete,
            root: self.root,
            reference_root: self.reference_root,
            archive: self.archive,
            target_locale: self.target_locale,
            reference_locale: self.reference_locale,
            format: self.format,
        }
    }
}

fn init_tracing(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, "langsync.log"));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let cfg = langsync_config::load_config()?;
    let _guard = init_tracing(cfg.log_dir.as_deref());

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdout.lock(), use_color);

    if cli.help {
        println!("{}", Cli::command().render_help());
        verify::print_release_tags(&mut console, &cfg)?;
        return Ok(());
    }

    let code = verify::run_verify(cli.into_verify_args(), &cfg, &mut console)?;
    tracing::info!(event = "finished", exit_code = code);
    if code != verify::EXIT_OK {
        drop(console);
        drop(_guard);
        std::process::exit(code);
    }
    Ok(())
}
