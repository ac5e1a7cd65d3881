mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::ConsoleHost;
use std::io;
use std::path::PathBuf;
use wimp_core::{init_logging, AppDirs, Config, FileSettings, Session};
use wimp_plugin::{views, Plugin};
use wimp_provider::{WimpClient, WimpConfig};

#[derive(Debug, Parser)]
#[command(name = "wimp", version, about = "WiMP/TIDAL plugin console host")]
struct Cli {
    /// Settings file override (takes precedence over config)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
    /// Plugin URL to open, e.g. plugin://plugin.audio.wimp/artist/42
    url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the route table
    Routes,
}

impl Cli {
    fn target_url(&self, config: &Config) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("plugin://{}/", config.addon_id))
    }

    fn settings_path(&self, config: &Config, dirs: &AppDirs) -> PathBuf {
        self.settings
            .clone()
            .or_else(|| config.settings_path.clone())
            .unwrap_or_else(|| dirs.settings_file())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    dirs.ensure_exists()?;
    let config = Config::load_or_default(&dirs)?;
    let _logging = init_logging(&config.logging, &dirs)?;

    if let Some(Command::Routes) = cli.command {
        print_routes(&config.addon_id)?;
        return Ok(());
    }

    let settings = FileSettings::open(cli.settings_path(&config, &dirs))?;
    let session = Session::from_settings(&settings);
    tracing::info!(
        site = ?session.site(),
        quality = ?session.quality(),
        authenticated = session.is_authenticated(),
        settings = %settings.path().display(),
        "starting plugin"
    );

    let client = WimpClient::new(WimpConfig::from(&config.api), session)?;
    let host = ConsoleHost::new(io::stdin().lock(), io::stdout().lock(), io::stderr());
    let mut plugin = Plugin::new(&config.addon_id, client, settings, host)?;
    plugin.run(&cli.target_url(&config))?;
    Ok(())
}

fn print_routes(addon_id: &str) -> Result<()> {
    let router = views::router(addon_id)?;
    for (pattern, view) in router.routes() {
        println!("{pattern:<32} {view:?}");
    }
    Ok(())
}
