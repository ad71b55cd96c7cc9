//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::http::MovieApiClient;
use crate::list::FooterState;
use crate::pagination::{PaginationController, ScreenState};
use crate::scroll::Viewport;
use crate::session::{FeedHandle, FeedSession, FeedUpdate};
use crate::types::Movie;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

/// What to do after a failure
enum Recovery {
    Retry,
    Stop,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Browse {
                format,
                visible_rows,
                interactive,
            } => self.browse(*format, *visible_rows, *interactive).await,
            Commands::Config => self.show_config(),
        }
    }

    /// Load configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<FeedConfig> {
        let mut config = match &self.cli.config {
            Some(path) => FeedConfig::load(path)?,
            None => FeedConfig::default(),
        };
        config.apply_env()?;

        if let Some(ref key) = self.cli.api_key {
            config.api.api_key = Some(key.clone());
        }
        if let Some(pages) = self.cli.total_pages {
            config.total_pages = pages;
        }

        config.validate()?;
        Ok(config)
    }

    /// Print the effective configuration
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let yaml = serde_yaml::to_string(&config.masked())?;
        println!("{yaml}");
        Ok(())
    }

    /// Load the feed page by page until the last page or a failure
    async fn browse(
        &self,
        format: OutputFormat,
        visible_rows: usize,
        interactive: bool,
    ) -> Result<()> {
        let config = self.load_config()?;
        config.require_api_key()?;

        let client = MovieApiClient::new(config.api_client())?;
        let controller: PaginationController<Movie> = PaginationController::new(config.pagination());
        let session = FeedSession::new(controller, Arc::new(client), Arc::new(config.probe()))
            .with_trigger(config.scroll);

        info!(total_pages = config.total_pages, "Browsing top-rated movies");
        let (handle, mut updates, join) = session.spawn();

        // One reader for the whole session so buffered answers are not lost
        let mut input = interactive.then(|| BufReader::new(tokio::io::stdin()).lines());

        let mut printed = 0;
        let result = loop {
            let Some(update) = updates.recv().await else {
                break Err(Error::SessionClosed);
            };
            for movie in &update.appended {
                printed += 1;
                println!(
                    "{}",
                    render_row(printed, movie, &config.api.image_base_url, format)?
                );
            }

            match next_step(&update, &handle, visible_rows, input.as_mut()).await {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        // The session may already be gone
        let _ = handle.shutdown();
        if let Err(e) = join.await {
            debug!("Session task ended abnormally: {}", e);
        }

        info!(rows = printed, "Done");
        result
    }
}

/// React to an update; returns false when browsing is over
///
/// `input` is the answer source for retry prompts; without one, failures stop
/// browsing.
async fn next_step<R>(
    update: &FeedUpdate<Movie>,
    handle: &FeedHandle,
    visible_rows: usize,
    input: Option<&mut Lines<R>>,
) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let snapshot = &update.snapshot;

    if let ScreenState::Error { message } = &snapshot.screen {
        return match recover(message, input).await? {
            Recovery::Retry => handle.retry().map(|()| true),
            Recovery::Stop => Err(Error::Other(message.clone())),
        };
    }

    if snapshot.state.is_last_page {
        return Ok(false);
    }

    match &snapshot.footer {
        Some(FooterState::RetryPrompt { message }) => match recover(message, input).await? {
            Recovery::Retry => handle.retry().map(|()| true),
            Recovery::Stop => Ok(false),
        },
        Some(FooterState::Loading) if !snapshot.state.is_loading => {
            // Simulate the user reaching the bottom of the list
            handle.scrolled(Viewport::at_end(snapshot.row_count, visible_rows))?;
            Ok(true)
        }
        _ => Ok(true),
    }
}

/// Show a failure and, when there is input, ask whether to retry
///
/// End of input counts as a refusal.
async fn recover<R>(message: &str, input: Option<&mut Lines<R>>) -> Result<Recovery>
where
    R: AsyncBufRead + Unpin,
{
    eprintln!("{message}");
    let Some(lines) = input else {
        return Ok(Recovery::Stop);
    };

    eprint!("Retry? [Y/n] ");
    let Some(line) = lines.next_line().await? else {
        debug!("No answer to retry prompt, stopping");
        return Ok(Recovery::Stop);
    };

    Ok(match line.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Recovery::Retry,
        _ => Recovery::Stop,
    })
}

/// One rendered movie row
#[derive(Debug, Serialize)]
struct MovieRow<'a> {
    index: usize,
    title: &'a str,
    release_date: &'a str,
    poster_url: Option<String>,
}

/// Render a movie as a line of output
fn render_row(index: usize, movie: &Movie, image_base: &str, format: OutputFormat) -> Result<String> {
    let poster_url = movie.poster_url(image_base).map(String::from);
    match format {
        OutputFormat::Json => {
            let row = MovieRow {
                index,
                title: &movie.title,
                release_date: &movie.release_date,
                poster_url,
            };
            Ok(serde_json::to_string(&row)?)
        }
        OutputFormat::Pretty => {
            let year = movie
                .release_year()
                .map_or_else(|| "----".to_string(), |y| y.to_string());
            let mut line = format!("{index:>4}. {} ({year})", movie.title);
            if let Some(url) = poster_url {
                line.push_str("  ");
                line.push_str(&url);
            }
            Ok(line)
        }
    }
}
