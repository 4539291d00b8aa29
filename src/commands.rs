//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the catalog gateways.
//! Each handler takes CLI args and Output, returns ExitCode.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::admin::AdminWorkflow;
use crate::api::media::image_mime;
use crate::api::{is_cancelled, Gateways};
use crate::cli::{
    ConfigCmd, EpisodesAction, EpisodesCmd, ExitCode, Output, SeasonsAction, SeasonsCmd,
    SeriesAction, SeriesCmd, UploadPosterCmd, UploadResponse,
};
use crate::config::Config;
use crate::models::{non_blank, NewEpisode, NewSeason, NewSeries};
use crate::runtime::{Input, Runtime, Trigger};
use crate::shell::{self, Action};

/// Token cancelled on Ctrl-C, so a slow list can be abandoned
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    token
}

fn list_failed(err: &anyhow::Error, output: &Output) -> ExitCode {
    if is_cancelled(err) {
        return output.error("Interrupted", ExitCode::Error);
    }
    output.failure(err)
}

fn printed(result: anyhow::Result<()>, output: &Output) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Series Command
// =============================================================================

pub async fn series_cmd(cmd: SeriesCmd, gateways: &Gateways, output: &Output) -> ExitCode {
    match cmd.action {
        SeriesAction::List => match gateways.series.list(&(), &interrupt_token()).await {
            Ok(series) => printed(output.print_list(&series), output),
            Err(e) => list_failed(&e, output),
        },
        SeriesAction::Create {
            title,
            description,
            poster_url,
        } => {
            let Some(title) = non_blank(&title) else {
                return output.error("Title is required", ExitCode::InvalidArgs);
            };
            let draft = NewSeries {
                title,
                description: description.as_deref().and_then(non_blank),
                poster_url: poster_url.as_deref().and_then(non_blank),
            };

            output.info(format!("Creating series: {}", draft.title));
            match gateways.series.create(&(), draft).await {
                Ok(series) => printed(output.print_item(&series), output),
                Err(e) => output.failure(&e),
            }
        }
    }
}

// =============================================================================
// Seasons Command
// =============================================================================

pub async fn seasons_cmd(cmd: SeasonsCmd, gateways: &Gateways, output: &Output) -> ExitCode {
    match cmd.action {
        SeasonsAction::List { series_id } => {
            match gateways.seasons.list(&series_id, &interrupt_token()).await {
                Ok(seasons) => printed(output.print_list(&seasons), output),
                Err(e) => list_failed(&e, output),
            }
        }
        SeasonsAction::Create { series_id, number } => {
            output.info(format!("Creating season {} of {}", number, series_id));
            match gateways.seasons.create(&series_id, NewSeason { number }).await {
                Ok(season) => printed(output.print_item(&season), output),
                Err(e) => output.failure(&e),
            }
        }
    }
}

// =============================================================================
// Episodes Command
// =============================================================================

pub async fn episodes_cmd(cmd: EpisodesCmd, gateways: &Gateways, output: &Output) -> ExitCode {
    match cmd.action {
        EpisodesAction::List { season_id } => {
            match gateways.episodes.list(&season_id, &interrupt_token()).await {
                Ok(episodes) => printed(output.print_list(&episodes), output),
                Err(e) => list_failed(&e, output),
            }
        }
        EpisodesAction::Create {
            season_id,
            number,
            title,
            duration,
            video_url,
        } => {
            let Some(title) = non_blank(&title) else {
                return output.error("Title is required", ExitCode::InvalidArgs);
            };
            let draft = NewEpisode {
                number,
                title,
                duration_seconds: duration,
                video_url: video_url.as_deref().and_then(non_blank),
            };

            output.info(format!("Creating episode {} of {}", number, season_id));
            match gateways.episodes.create(&season_id, draft).await {
                Ok(episode) => printed(output.print_item(&episode), output),
                Err(e) => output.failure(&e),
            }
        }
    }
}

// =============================================================================
// Upload Poster Command
// =============================================================================

pub async fn upload_poster_cmd(cmd: UploadPosterCmd, gateways: &Gateways, output: &Output) -> ExitCode {
    let Some(file_name) = cmd.file.file_name().and_then(|n| n.to_str()) else {
        return output.error("Poster path has no file name", ExitCode::InvalidArgs);
    };
    if image_mime(file_name).is_none() {
        return output.error(
            format!("Unsupported image type: {} (expected png, jpg, jpeg or webp)", file_name),
            ExitCode::InvalidArgs,
        );
    }

    let bytes = match tokio::fs::read(&cmd.file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return output.error(
                format!("Failed to read {}: {}", cmd.file.display(), e),
                ExitCode::InvalidArgs,
            )
        }
    };

    output.info(format!("Uploading {} ({} bytes)...", file_name, bytes.len()));
    match gateways.media.upload_image(file_name, bytes).await {
        Ok(url) => {
            if output.json {
                printed(output.print(UploadResponse { url }), output)
            } else {
                println!("{}", url);
                ExitCode::Success
            }
        }
        Err(e) => output.failure(&e),
    }
}

// =============================================================================
// Config Command
// =============================================================================

/// Show the config file, updating it first when a setter was given
pub fn config_cmd(cmd: ConfigCmd, path: Option<&Path>, output: &Output) -> ExitCode {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load()),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
    };

    if cmd.is_update() {
        if let Some(url) = cmd.set_api_url {
            config.api_url = url;
        }
        if let Some(secs) = cmd.set_timeout {
            config.timeout_secs = secs;
        }
        let saved = match path {
            Some(path) => config.save_to(path),
            None => config.save(),
        };
        if let Err(e) = saved {
            return output.error(format!("Failed to save config: {:#}", e), ExitCode::Error);
        }
        let location = path
            .map(Path::to_path_buf)
            .or_else(Config::path)
            .unwrap_or_else(|| PathBuf::from("config.toml"));
        output.info(format!("Saved {}", location.display()));
    }

    printed(output.print(&config), output)
}

// =============================================================================
// Admin Session
// =============================================================================

/// Interactive session: stdin lines drive the workflow through the event loop
pub async fn admin_cmd(gateways: Gateways, output: &Output) -> ExitCode {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut runtime = Runtime::new(AdminWorkflow::new(gateways));
    runtime.start();

    output.info("showdesk admin session. Type 'help' for commands.");
    let reader = tokio::spawn(read_commands(tx, *output));

    let mut shown_errors = Vec::new();
    let observer_output = *output;
    runtime
        .run(rx, |workflow, trigger| match trigger {
            Trigger::Inspect | Trigger::Settled => show(workflow, &observer_output),
            Trigger::Operator | Trigger::Completion => {
                report_new_errors(workflow, &mut shown_errors, &observer_output)
            }
        })
        .await;

    match reader.await {
        Ok(Ok(())) => ExitCode::Success,
        Ok(Err(e)) => output.error(format!("Failed to read input: {}", e), ExitCode::Error),
        Err(e) => output.error(format!("Input reader failed: {}", e), ExitCode::Error),
    }
}

async fn read_commands(tx: mpsc::UnboundedSender<Input>, output: Output) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match shell::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output.error(format!("{:#}", e), ExitCode::InvalidArgs);
                continue;
            }
        };

        match command.into_action().await {
            Ok(Action::Send(inputs)) => {
                for input in inputs {
                    if tx.send(input).is_err() {
                        return Ok(());
                    }
                }
            }
            Ok(Action::Help) => println!("{}", shell::HELP),
            Ok(Action::Quit) => break,
            Err(e) => {
                output.error(format!("{:#}", e), ExitCode::InvalidArgs);
            }
        }
    }
    debug!("admin input closed");
    Ok(())
}

fn show(workflow: &AdminWorkflow, output: &Output) {
    let view = workflow.view();
    if output.json {
        if let Err(e) = output.print(&view) {
            output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        print!("{}", view);
    }
}

/// Print each panel error once, when it first appears
fn report_new_errors(workflow: &AdminWorkflow, shown: &mut Vec<Option<String>>, output: &Output) {
    let current: Vec<Option<String>> = [
        workflow.series_list().error(),
        workflow.series_panel().error(),
        workflow.seasons_panel().error(),
        workflow.episodes_panel().error(),
    ]
    .into_iter()
    .map(|e| e.map(str::to_string))
    .collect();

    for (index, error) in current.iter().enumerate() {
        if let Some(message) = error {
            if shown.get(index) != Some(error) {
                output.error(message.clone(), ExitCode::Error);
            }
        }
    }
    *shown = current;
}
