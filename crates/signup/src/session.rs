//! Line-driven form session.
//!
//! Stdin lines are edits and submits, a ticker expires notification
//! deadlines. Both arms of the loop run on one task, so every event is
//! handled to completion before the next one.

use std::str::FromStr;
use std::time::{Duration, Instant};

use color_eyre::Result;
use registration::{ChannelKind, DismissReason, Field, SubmissionController, SubmitOutcome};
use strum::IntoEnumIterator;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::interval;
use tracing::{debug, info};

const TICK: Duration = Duration::from_millis(100);

pub const HELP: &str = "\
commands:
  set <field> [value]        fields: lastName firstName email birthday city addressCode
  submit
  status
  dismiss <success|error>
  click-away                 background click on both notifications
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Set(Field, String),
    Submit,
    Status,
    Dismiss(ChannelKind),
    ClickAway,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`, try `help`")]
    UnknownCommand(String),
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("unknown channel `{0}`, expected success or error")]
    UnknownChannel(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

impl SessionCommand {
    /// Parses one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line.trim_end(), ""),
        };

        let cmd = match word {
            "set" => {
                let rest = rest.trim_start();
                let (name, value) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest.trim_end(), ""));
                if name.is_empty() {
                    return Err(ParseError::MissingArgument("set"));
                }
                let field =
                    Field::from_str(name).map_err(|_| ParseError::UnknownField(name.to_string()))?;
                SessionCommand::Set(field, value.to_string())
            }
            "submit" => SessionCommand::Submit,
            "status" => SessionCommand::Status,
            "dismiss" => {
                let name = rest.trim();
                if name.is_empty() {
                    return Err(ParseError::MissingArgument("dismiss"));
                }
                let kind = ChannelKind::from_str(name)
                    .map_err(|_| ParseError::UnknownChannel(name.to_string()))?;
                SessionCommand::Dismiss(kind)
            }
            "click-away" => SessionCommand::ClickAway,
            "help" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

/// Applies one command and returns the lines to show.
pub fn apply(controller: &mut SubmissionController, cmd: SessionCommand, now: Instant) -> Vec<String> {
    match cmd {
        SessionCommand::Set(field, value) => {
            controller.edit(field, value);
            let view = controller.view();
            let mut out = Vec::new();
            if view.field_errors.get(field) {
                out.push(format!("{} looks invalid", field.label()));
            }
            out.push(gate_line(view.submit_disabled));
            out
        }
        SessionCommand::Submit => {
            let outcome = controller.submit_at(now);
            let kind = match outcome {
                SubmitOutcome::Accepted(_) => ChannelKind::Success,
                SubmitOutcome::Rejected(_) | SubmitOutcome::StorageFailed(_) => ChannelKind::Error,
            };
            vec![format!("[{kind}] {}", outcome.message())]
        }
        SessionCommand::Status => status(controller, now),
        SessionCommand::Dismiss(kind) => {
            if controller.dismiss(kind, DismissReason::Explicit) {
                vec![format!("[{kind}] closed")]
            } else {
                vec![format!("[{kind}] nothing to close")]
            }
        }
        SessionCommand::ClickAway => ChannelKind::iter()
            .filter(|kind| controller.dismiss(*kind, DismissReason::ClickAway))
            .map(|kind| format!("[{kind}] closed"))
            .collect(),
        SessionCommand::Help => vec![HELP.to_string()],
        SessionCommand::Quit => Vec::new(),
    }
}

fn gate_line(disabled: bool) -> String {
    if disabled {
        "submit: disabled".to_string()
    } else {
        "submit: enabled".to_string()
    }
}

fn status(controller: &SubmissionController, now: Instant) -> Vec<String> {
    let view = controller.view();
    let mut out: Vec<String> = Field::iter()
        .map(|field| {
            let marker = if view.field_errors.get(field) { "!" } else { " " };
            format!(
                "{marker} {:<18} {}",
                field.label(),
                controller.state().value(field)
            )
        })
        .collect();
    out.push(gate_line(view.submit_disabled));
    for kind in ChannelKind::iter() {
        let channel = controller.notifications().channel(kind);
        if let (Some(message), Some(left)) = (channel.message(), channel.remaining(now)) {
            out.push(format!("[{kind}] {message} ({}s left)", left.as_secs()));
        }
    }
    out
}

pub async fn run(mut controller: SubmissionController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(TICK);
    info!("session started");
    println!("{HELP}");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for kind in controller.poll(Instant::now()) {
                    println!("[{kind}] closed");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match SessionCommand::parse(&line) {
                    Ok(Some(SessionCommand::Quit)) => break,
                    Ok(Some(cmd)) => {
                        for out in apply(&mut controller, cmd, Instant::now()) {
                            println!("{out}");
                        }
                    }
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                }
            }
        }
    }

    controller.teardown();
    info!("session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use registration::{FormSettings, MemoryStore, NotificationSettings};

    fn controller(ignore_background_dismiss: bool) -> SubmissionController {
        let settings = FormSettings {
            notification: NotificationSettings {
                auto_hide_ms: 6000,
                ignore_background_dismiss,
            },
            ..FormSettings::default()
        };
        SubmissionController::new(Box::new(MemoryStore::new()), &settings).with_current_year(2024)
    }

    fn run_lines(controller: &mut SubmissionController, lines: &[&str], now: Instant) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| SessionCommand::parse(line).unwrap())
            .flat_map(|cmd| apply(controller, cmd, now))
            .collect()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            SessionCommand::parse("set lastName Jean Pierre").unwrap(),
            Some(SessionCommand::Set(Field::LastName, "Jean Pierre".into()))
        );
        assert_eq!(
            SessionCommand::parse("set city").unwrap(),
            Some(SessionCommand::Set(Field::City, String::new()))
        );
        assert_eq!(
            SessionCommand::parse("  dismiss error ").unwrap(),
            Some(SessionCommand::Dismiss(ChannelKind::Error))
        );
        assert_eq!(
            SessionCommand::parse("set\tcity\tGrasse").unwrap(),
            Some(SessionCommand::Set(Field::City, "Grasse".into()))
        );
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
        assert_eq!(
            SessionCommand::parse("exit").unwrap(),
            Some(SessionCommand::Quit)
        );
    }

    #[test]
    fn reports_parse_errors() {
        assert_eq!(
            SessionCommand::parse("set zip 06130"),
            Err(ParseError::UnknownField("zip".into()))
        );
        assert_eq!(
            SessionCommand::parse("dismiss"),
            Err(ParseError::MissingArgument("dismiss"))
        );
        assert_eq!(
            SessionCommand::parse("dismiss warning"),
            Err(ParseError::UnknownChannel("warning".into()))
        );
        assert_eq!(
            SessionCommand::parse("send"),
            Err(ParseError::UnknownCommand("send".into()))
        );
    }

    #[test]
    fn full_session_submits_and_resets() {
        let mut c = controller(false);
        let now = Instant::now();
        let out = run_lines(
            &mut c,
            &[
                "set lastName Jean",
                "set firstName Dupont",
                "set email email@example.com",
                "set birthday 02/02/1994",
                "set city Grasse",
                "set addressCode 06130",
            ],
            now,
        );
        assert_eq!(out.last().map(String::as_str), Some("submit: enabled"));

        let out = run_lines(&mut c, &["submit"], now);
        assert_eq!(out, ["[success] Formulaire envoyé avec succès"]);
        assert!(c.is_submit_disabled());
    }

    #[test]
    fn invalid_value_is_flagged_while_typing() {
        let mut c = controller(false);
        let out = run_lines(&mut c, &["set addressCode B6130"], Instant::now());
        assert_eq!(out, ["Code postal looks invalid", "submit: disabled"]);
    }

    #[test]
    fn click_away_follows_setting() {
        let now = Instant::now();

        let mut strict = controller(true);
        run_lines(&mut strict, &["submit"], now);
        assert!(run_lines(&mut strict, &["click-away"], now).is_empty());
        assert!(strict.notifications().channel(ChannelKind::Error).is_open());

        let mut loose = controller(false);
        run_lines(&mut loose, &["submit"], now);
        assert_eq!(run_lines(&mut loose, &["click-away"], now), ["[error] closed"]);
    }

    #[test]
    fn status_lists_open_notifications() {
        let mut c = controller(false);
        let now = Instant::now();
        run_lines(&mut c, &["submit"], now);

        let out = run_lines(&mut c, &["status"], now + Duration::from_secs(2));
        assert_eq!(
            out.last().map(String::as_str),
            Some("[error] Veuillez remplir tous les champs. (4s left)")
        );
    }
}
