use anyhow::{anyhow, Context, Result};
use clap::Parser;
use proxy_board::{
    batch::{plan_batches, ProbeScheduler, RunLoop},
    config::Config,
    error::ConfigError,
    logging::init_logging,
    proxy::{HttpProbe, ProbeConfig, ProxyParser},
    tui::{PlainBoard, TerminalBoard},
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Probe a list of HTTP proxies against one host and watch the results live
#[derive(Parser)]
#[command(name = "proxy-board")]
#[command(about = "Batched proxy reachability checker with a live status board")]
struct Cli {
    /// Proxy list, one host:port[:user:pass] per line
    #[arg(default_value = "proxies.txt")]
    proxies: PathBuf,

    /// TOML config file (delay, domain, timeout, [thresholds] good/bad)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds between dispatches within a batch
    #[arg(long)]
    delay: Option<u64>,

    /// Target host to request through each proxy
    #[arg(long)]
    domain: Option<String>,

    /// Milliseconds before a probe counts as failed
    #[arg(long)]
    timeout: Option<u64>,

    /// Latency below this many milliseconds is shown as good
    #[arg(long)]
    good: Option<u64>,

    /// Latency at or above this many milliseconds is shown as bad
    #[arg(long)]
    bad: Option<u64>,

    /// Rows available for proxies (defaults to terminal height minus one)
    #[arg(short, long)]
    rows: Option<usize>,

    /// Print one line per settled probe instead of drawing a board
    #[arg(long)]
    plain: bool,

    /// In plain output, also print a line as each proxy is dispatched
    #[arg(long)]
    show_running: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(delay) = self.delay {
            config = config.with_delay(delay);
        }
        if let Some(domain) = &self.domain {
            config = config.with_domain(domain.clone());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(good) = self.good {
            config = config.with_good_threshold(good);
        }
        if let Some(bad) = self.bad {
            config = config.with_bad_threshold(bad);
        }

        config.validate()?;
        Ok(config)
    }

    /// Slot rows the board can show, leaving one for the done marker
    fn capacity(&self, plain: bool) -> Result<usize> {
        if plain {
            return Ok(self.rows.unwrap_or(usize::from(u16::MAX)));
        }
        let (_, height) = crossterm::terminal::size().context("failed to read terminal size")?;
        match self.rows {
            Some(rows) if rows >= usize::from(height) => {
                Err(ConfigError::RowsExceedTerminal { rows, height }.into())
            }
            Some(rows) => Ok(rows),
            None => Ok(usize::from(height).saturating_sub(1)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    // Everything that can fail on configuration happens before the board exists
    let config = cli.load_config()?;
    let proxies = ProxyParser::parse_file(&cli.proxies)?;
    let plain = cli.plain || !io::stdout().is_terminal();
    let capacity = cli.capacity(plain)?;
    let total = proxies.len();
    let batches = plan_batches(proxies, capacity)
        .map_err(|e| anyhow!("{} (terminal too small? try --rows)", e))?;

    tracing::info!(
        proxies = total,
        batches = batches.len(),
        capacity,
        domain = %config.domain,
        "starting run"
    );

    let probe = HttpProbe::new(ProbeConfig::from_config(&config))?;
    let mut run_loop = RunLoop::new(ProbeScheduler::from_config(probe, &config));

    let summary = if plain {
        let mut board = PlainBoard::new(io::stdout().lock());
        if cli.show_running {
            board = board.with_running_lines();
        }
        run_loop.run_all(&batches, &mut board).await?
    } else {
        let mut board = TerminalBoard::stdout(capacity)?;
        let summary = run_loop.run_all(&batches, &mut board).await?;
        // Leave the shell prompt below the done marker
        println!();
        summary
    };

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "finished {}",
        cli.proxies.display()
    );
    Ok(())
}
