//! Line commands for the interactive admin session
//!
//! Each line is tokenized (double quotes group words) and parsed into a
//! [`ShellCommand`], which expands into the workflow messages an operator
//! would produce by filling in and submitting the panel forms.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::admin::{episodes, seasons, series, Message};
use crate::runtime::Input;

pub const HELP: &str = "\
Commands:
  show                                       Print every panel
  wait                                       Wait for pending calls, then print
  refresh                                    Re-fetch the series list
  create-series <title> [description] [--poster <url>]
  poster <url>                               Set the poster reference
  upload-poster <file>                       Upload an image as the poster
  select-series <id|->                       Seasons panel: pick a series
  reload-seasons                             Seasons panel: fetch again
  create-season <number>
  episodes-series <id|->                     Episodes panel: pick a series
  select-season <id|->                       Episodes panel: pick a season
  reload-episodes                            Episodes panel: fetch again
  create-episode <number> <title> <duration-seconds> [video-url]
  help
  quit
Quote arguments containing spaces: create-series \"The Expanse\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Show,
    Wait,
    Refresh,
    CreateSeries {
        title: String,
        description: Option<String>,
        poster_url: Option<String>,
    },
    Poster(String),
    UploadPoster(PathBuf),
    SelectSeries(Option<String>),
    ReloadSeasons,
    CreateSeason(i64),
    EpisodesSeries(Option<String>),
    SelectSeason(Option<String>),
    ReloadEpisodes,
    CreateEpisode {
        number: i64,
        title: String,
        duration_seconds: i64,
        video_url: Option<String>,
    },
    Quit,
}

/// Split a line on whitespace, keeping double-quoted runs together
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let re = regex::Regex::new(r#""([^"]*)"|(\S+)"#)?;
    Ok(re
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect())
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.as_str() {
        "help" | "?" => ShellCommand::Help,
        "show" => ShellCommand::Show,
        "wait" => ShellCommand::Wait,
        "refresh" => ShellCommand::Refresh,
        "create-series" => parse_create_series(args)?,
        "poster" => ShellCommand::Poster(exactly_one(name, args)?.to_string()),
        "upload-poster" => ShellCommand::UploadPoster(PathBuf::from(exactly_one(name, args)?)),
        "select-series" => ShellCommand::SelectSeries(selection(exactly_one(name, args)?)),
        "reload-seasons" => ShellCommand::ReloadSeasons,
        "create-season" => ShellCommand::CreateSeason(integer("number", exactly_one(name, args)?)?),
        "episodes-series" => ShellCommand::EpisodesSeries(selection(exactly_one(name, args)?)),
        "select-season" => ShellCommand::SelectSeason(selection(exactly_one(name, args)?)),
        "reload-episodes" => ShellCommand::ReloadEpisodes,
        "create-episode" => match args {
            [number, title, duration] | [number, title, duration, _] => ShellCommand::CreateEpisode {
                number: integer("number", number)?,
                title: title.clone(),
                duration_seconds: integer("duration", duration)?,
                video_url: args.get(3).cloned(),
            },
            _ => bail!("usage: create-episode <number> <title> <duration-seconds> [video-url]"),
        },
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command '{}', try 'help'", other),
    };
    Ok(Some(command))
}

fn parse_create_series(args: &[String]) -> Result<ShellCommand> {
    let mut positional = Vec::new();
    let mut poster_url = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--poster" {
            let url = iter.next().ok_or_else(|| anyhow!("--poster needs a URL"))?;
            poster_url = Some(url.clone());
        } else {
            positional.push(arg.clone());
        }
    }

    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next()) {
        (Some(title), description, None) => Ok(ShellCommand::CreateSeries {
            title,
            description,
            poster_url,
        }),
        _ => bail!("usage: create-series <title> [description] [--poster <url>]"),
    }
}

fn exactly_one<'a>(name: &str, args: &'a [String]) -> Result<&'a str> {
    match args {
        [value] => Ok(value.as_str()),
        _ => bail!("{} takes exactly one argument", name),
    }
}

/// `-` clears a selection
fn selection(value: &str) -> Option<String> {
    (value != "-").then(|| value.to_string())
}

fn integer(what: &str, value: &str) -> Result<i64> {
    value
        .parse()
        .with_context(|| format!("{} must be a whole number, got '{}'", what, value))
}

/// What the session should do with a parsed command
#[derive(Debug)]
pub enum Action {
    Send(Vec<Input>),
    Help,
    Quit,
}

impl ShellCommand {
    /// Expand into loop inputs. Reads the file for `upload-poster`.
    pub async fn into_action(self) -> Result<Action> {
        let inputs = match self {
            ShellCommand::Help => return Ok(Action::Help),
            ShellCommand::Quit => return Ok(Action::Quit),
            ShellCommand::Show => vec![Input::Inspect],
            ShellCommand::Wait => vec![Input::Settle],
            ShellCommand::Refresh => vec![Input::Dispatch(Message::RefreshSeries)],
            ShellCommand::CreateSeries {
                title,
                description,
                poster_url,
            } => {
                let mut messages = vec![
                    series::Message::TitleChanged(title),
                    series::Message::DescriptionChanged(description.unwrap_or_default()),
                ];
                if let Some(url) = poster_url {
                    messages.push(series::Message::PosterUrlChanged(url));
                }
                messages.push(series::Message::Submit);
                messages.into_iter().map(|m| Input::Dispatch(Message::Series(m))).collect()
            }
            ShellCommand::Poster(url) => {
                vec![Input::Dispatch(Message::Series(series::Message::PosterUrlChanged(url)))]
            }
            ShellCommand::UploadPoster(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let file_name = file_name(&path)?;
                vec![Input::Dispatch(Message::Series(series::Message::UploadPoster {
                    file_name,
                    bytes,
                }))]
            }
            ShellCommand::SelectSeries(id) => {
                vec![Input::Dispatch(Message::Seasons(seasons::Message::SelectSeries(id)))]
            }
            ShellCommand::ReloadSeasons => vec![Input::Dispatch(Message::Seasons(seasons::Message::Reload))],
            ShellCommand::CreateSeason(number) => [
                seasons::Message::NumberChanged(number),
                seasons::Message::Submit,
            ]
            .into_iter()
            .map(|m| Input::Dispatch(Message::Seasons(m)))
            .collect(),
            ShellCommand::EpisodesSeries(id) => {
                vec![Input::Dispatch(Message::Episodes(episodes::Message::SelectSeries(id)))]
            }
            ShellCommand::SelectSeason(id) => {
                vec![Input::Dispatch(Message::Episodes(episodes::Message::SelectSeason(id)))]
            }
            ShellCommand::ReloadEpisodes => vec![Input::Dispatch(Message::Episodes(episodes::Message::Reload))],
            ShellCommand::CreateEpisode {
                number,
                title,
                duration_seconds,
                video_url,
            } => [
                episodes::Message::NumberChanged(number),
                episodes::Message::TitleChanged(title),
                episodes::Message::DurationChanged(duration_seconds),
                episodes::Message::VideoUrlChanged(video_url.unwrap_or_default()),
                episodes::Message::Submit,
            ]
            .into_iter()
            .map(|m| Input::Dispatch(Message::Episodes(m)))
            .collect(),
        };
        Ok(Action::Send(inputs))
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quotes() {
        let tokens = tokenize(r#"create-series "The Expanse" "Space drama" --poster http://x/p.png"#).unwrap();
        assert_eq!(
            tokens,
            vec!["create-series", "The Expanse", "Space drama", "--poster", "http://x/p.png"]
        );
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_create_series() {
        let cmd = parse(r#"create-series Foo --poster http://x/p.png"#).unwrap().unwrap();
        assert_eq!(
            cmd,
            ShellCommand::CreateSeries {
                title: "Foo".into(),
                description: None,
                poster_url: Some("http://x/p.png".into()),
            }
        );
        assert!(parse("create-series").is_err());
        assert!(parse("create-series a b c").is_err());
        assert!(parse("create-series Foo --poster").is_err());
    }

    #[test]
    fn test_parse_selections() {
        assert_eq!(
            parse("select-series abc").unwrap(),
            Some(ShellCommand::SelectSeries(Some("abc".into())))
        );
        assert_eq!(
            parse("select-season -").unwrap(),
            Some(ShellCommand::SelectSeason(None))
        );
        assert!(parse("select-series").is_err());
    }

    #[test]
    fn test_parse_create_episode() {
        let cmd = parse(r#"create-episode 1 "The Pilot" 1400"#).unwrap().unwrap();
        assert_eq!(
            cmd,
            ShellCommand::CreateEpisode {
                number: 1,
                title: "The Pilot".into(),
                duration_seconds: 1400,
                video_url: None,
            }
        );
        assert!(parse("create-episode one Pilot 1400").is_err());
        // non-positive values reach the form and are gated there
        assert!(parse("create-episode 0 Pilot -5").unwrap().is_some());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("quit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse("exit").unwrap(), Some(ShellCommand::Quit));
        assert!(parse("frobnicate").is_err());
    }

    #[tokio::test]
    async fn test_create_season_expands_to_form_messages() {
        let action = ShellCommand::CreateSeason(3).into_action().await.unwrap();
        let Action::Send(inputs) = action else {
            panic!("expected inputs");
        };
        assert_eq!(inputs.len(), 2);
        assert!(matches!(
            inputs[0],
            Input::Dispatch(Message::Seasons(seasons::Message::NumberChanged(3)))
        ));
        assert!(matches!(
            inputs[1],
            Input::Dispatch(Message::Seasons(seasons::Message::Submit))
        ));
    }

    #[tokio::test]
    async fn test_upload_missing_file_fails() {
        let err = ShellCommand::UploadPoster("/nonexistent/poster.png".into())
            .into_action()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
