use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabfolio::context::Environment;
use tabfolio::script::{self, Script};
use tabfolio::site::{self, OpenOptions};
use tabfolio::{config, output};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabfolio")]
#[command(about = "Tabbed single-page portfolio with carousels, lightbox and theming")]
#[command(long_about = "\
Tabbed single-page portfolio with carousels, lightbox and theming

A site is one page shell plus a fragment file per tab. Fragments hold
plain HTML (or Markdown); tabs marked `enhance` turn their .timeline
blocks into carousels and their screenshots into lightbox images.

Site structure:

  site/
  ├── config.toml        # Tabs, colors, behavior (optional)
  ├── home.html          # Fragment: content of .container or <main>
  ├── about.html
  ├── ideas.html         # Carousel markup, enhanced
  └── objects.md         # Markdown fragments work too

Commands work headlessly: `check` boots the page the way a browser
would and reports what loaded; `replay` runs a TOML script of clicks,
keys, swipes and scrolls against it and prints the resulting state.

Logging goes to stderr and follows RUST_LOG (default: warn).

Run 'tabfolio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = "site", global = true)]
    site: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the page shell (index.html) for the site
    Render {
        /// Output file; defaults to index.html inside the site directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Boot the page headlessly and report tab loads and carousels
    Check,
    /// Run a TOML script of user interactions and print the final state
    Replay {
        /// Script file
        script: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render { output } => {
            let output = output.unwrap_or_else(|| cli.site.join(site::SHELL_FILE));
            let config = site::render_site(&cli.site, &output)?;
            output::print_render_output(&config, &output);
        }
        Command::Check => {
            println!("==> Checking {}", cli.site.display());
            let report = site::check_site(&cli.site)?;
            output::print_check_output(&report);
            let failed = report.failed_loads();
            if failed > 0 {
                return Err(format!("{} tab(s) failed to load", failed).into());
            }
            println!("==> Site is valid");
        }
        Command::Replay { script: path } => {
            let script = Script::load(&path)?;
            let options = OpenOptions {
                url: Some(script.url.clone()),
                storage: script
                    .storage
                    .as_deref()
                    .map(|storage| relative_to(&path, storage)),
                environment: Environment {
                    prefers_dark: script.prefers_dark,
                },
            };
            let mut page = site::open_page(&cli.site, options)?;
            let reports = script::run(&mut page, &script.steps)?;
            output::print_replay_output(&reports, &page.state());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve `file` against the directory containing `script`.
fn relative_to(script: &Path, file: &Path) -> PathBuf {
    match script.parent() {
        Some(dir) if file.is_relative() => dir.join(file),
        _ => file.to_path_buf(),
    }
}
