//! Interactive console front-end
//!
//! Stands in for the excluded messaging-platform transport: stdin lines are
//! parsed into engine commands and outbound effects are rendered to stdout.
//! One console drives every simulated participant, addressed by chat id.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use pairchat_core::channel::{Actor, ChannelError, Command, Effect, Notice, NonBlockingSend};
use pairchat_core::{Category, ChatId, Profile};
use pairchat_runtime::RuntimeHandle;

use crate::config::CliAppConfig;

// ----------------------------------------------------------------------------
// Input Parsing
// ----------------------------------------------------------------------------

/// What one console line asks for
#[derive(Debug, PartialEq)]
pub enum ConsoleAction {
    Send(Command),
    Help,
    Quit,
    Nothing,
}

const HELP_TEXT: &str = "\
commands:
  start <id> [name] [username]   register a participant
  join <id> male|female          look for a match
  msg <id> <text...>             send text as a participant
  end <id>                       leave the current chat
  cancel <id>                    stop searching
  ban <id> [reason...]           ban a participant (admin)
  unban <id>                     lift a ban (admin)
  stats                          show the operational report (admin)
  help                           show this help
  quit                           shut the engine down and exit";

/// Parse one console line into an action. `admin` carries the configured
/// admin actor, if any; without one, admin commands are rejected here.
pub fn parse_line(line: &str, admin: Option<Actor>) -> Result<ConsoleAction, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(ConsoleAction::Nothing);
    };

    let parse_id = |s: Option<&str>| -> Result<ChatId, String> {
        s.ok_or_else(|| "missing chat id (try `help`)".to_string())?
            .parse::<ChatId>()
            .map_err(|e| e.to_string())
    };
    let require_admin = || admin.ok_or_else(|| "no admin id configured".to_string());

    match verb {
        "start" => {
            let id = parse_id(parts.next())?;
            let name = parts.next().map(str::to_string);
            let username = parts.next().map(str::to_string);
            Ok(ConsoleAction::Send(Command::Register {
                id,
                profile: Profile::new(name, username),
            }))
        }
        "join" => {
            let id = parse_id(parts.next())?;
            let category = parts
                .next()
                .ok_or_else(|| "missing category: male|female".to_string())?
                .parse::<Category>()
                .map_err(|e| e.to_string())?;
            Ok(ConsoleAction::Send(Command::Join { id, category }))
        }
        "msg" => {
            let id = parse_id(parts.next())?;
            let text = parts.collect::<Vec<_>>().join(" ");
            Ok(ConsoleAction::Send(Command::Text { id, text }))
        }
        "end" => Ok(ConsoleAction::Send(Command::EndChat {
            id: parse_id(parts.next())?,
        })),
        "cancel" => Ok(ConsoleAction::Send(Command::CancelSearch {
            id: parse_id(parts.next())?,
        })),
        "ban" => {
            let actor = require_admin()?;
            let target = parse_id(parts.next())?;
            let rest = parts.collect::<Vec<_>>().join(" ");
            let reason = (!rest.is_empty()).then_some(rest);
            Ok(ConsoleAction::Send(Command::Ban {
                actor,
                target,
                reason,
            }))
        }
        "unban" => {
            let actor = require_admin()?;
            let target = parse_id(parts.next())?;
            Ok(ConsoleAction::Send(Command::Unban { actor, target }))
        }
        "stats" => Ok(ConsoleAction::Send(Command::Stats {
            actor: require_admin()?,
        })),
        "help" => Ok(ConsoleAction::Help),
        "quit" | "exit" => Ok(ConsoleAction::Quit),
        other => Err(format!("unknown command {other:?} (try `help`)")),
    }
}

// ----------------------------------------------------------------------------
// Effect Rendering
// ----------------------------------------------------------------------------

/// Render one outbound effect the way the platform client would deliver it
pub fn render_effect(effect: &Effect) -> Option<String> {
    match effect {
        Effect::Deliver { to, text } => Some(format!("[{to}] partner: {text}")),
        Effect::Notify { to, notice } => Some(format!("[{to}] {}", render_notice(notice))),
        // Timer effects never leave the engine
        Effect::ArmSearchTimer { .. } | Effect::CancelSearchTimer { .. } => None,
    }
}

fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Welcome { name } => match name {
            Some(name) => format!("Welcome, {name}! Use `join` to find a partner."),
            None => "Welcome! Use `join` to find a partner.".to_string(),
        },
        Notice::Searching => "Looking for a match...".to_string(),
        Notice::SearchCancelled => "Searching cancelled.".to_string(),
        Notice::SearchTimedOut => "No match found. Search stopped.".to_string(),
        Notice::Matched => "Matched! Say hi.".to_string(),
        Notice::ChatEnded => "Chat ended.".to_string(),
        Notice::PartnerLeft => "Your partner left.".to_string(),
        Notice::NoActiveChat => "No active chat.".to_string(),
        Notice::AlreadyInChat => "Already in a chat.".to_string(),
        Notice::AlreadySearching => "Already searching.".to_string(),
        Notice::Banned { reason } => match reason {
            Some(reason) => format!("You are banned. Reason: {reason}"),
            None => "You are banned.".to_string(),
        },
        Notice::BlockedContent => "That message is not allowed.".to_string(),
        Notice::NoSession => "You are not in a chat. Use `join` to find a partner.".to_string(),
        Notice::BanApplied { target } => format!("User {target} banned."),
        Notice::BanLifted { target } => format!("User {target} unbanned."),
        Notice::StatsReport(report) => {
            let mut out = String::from("Active chats:\n");
            if report.sessions.is_empty() {
                out.push_str("  (none)\n");
            }
            for s in &report.sessions {
                let a_name = s.a_username.as_deref().unwrap_or("-");
                let b_name = s.b_username.as_deref().unwrap_or("-");
                out.push_str(&format!("  {} (@{a_name}) <-> {} (@{b_name})\n", s.a, s.b));
            }
            for q in &report.queues {
                let ids = q
                    .waiting
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("Waiting ({}): [{ids}]\n", q.category));
            }
            out.push_str(&format!(
                "Sessions: {}, known participants: {}",
                report.active_session_count, report.total_participants
            ));
            out
        }
    }
}

// ----------------------------------------------------------------------------
// Console Loop
// ----------------------------------------------------------------------------

/// Run the interactive console against a live runtime. Returns when the user
/// quits or stdin closes.
pub async fn run(mut runtime: RuntimeHandle, config: &CliAppConfig) -> anyhow::Result<()> {
    let admin = config.admin.admin_id.map(|id| Actor::admin(ChatId::new(id)));
    let command_tx = runtime.command_sender();

    // Print outbound effects as they arrive
    let mut effects = runtime.subscribe_effects();
    let printer = tokio::spawn(async move {
        loop {
            match effects.recv().await {
                Ok(effect) => {
                    if let Some(line) = render_effect(&effect) {
                        println!("{line}");
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "console fell behind, dropped effects");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    println!("{HELP_TEXT}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", config.console.prompt);
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        match parse_line(&line, admin) {
            Ok(ConsoleAction::Send(command)) => match command_tx.try_send_non_blocking(command) {
                Ok(()) => {}
                Err(ChannelError::ChannelFull) => eprintln!("engine busy, try again"),
                Err(ChannelError::ChannelClosed) => {
                    eprintln!("engine stopped");
                    break;
                }
            },
            Ok(ConsoleAction::Help) => println!("{HELP_TEXT}"),
            Ok(ConsoleAction::Quit) => break,
            Ok(ConsoleAction::Nothing) => {}
            Err(message) => eprintln!("{message}"),
        }
    }

    runtime.shutdown().await?;
    printer.abort();
    Ok(())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_participant_commands() {
        assert_eq!(
            parse_line("join 7 female", None).unwrap(),
            ConsoleAction::Send(Command::Join {
                id: ChatId::new(7),
                category: Category::Female,
            })
        );
        assert!(matches!(
            parse_line("msg 7 hello out there", None).unwrap(),
            ConsoleAction::Send(Command::Text { id, text })
                if id == ChatId::new(7) && text == "hello out there"
        ));
        assert_eq!(parse_line("", None).unwrap(), ConsoleAction::Nothing);
        assert_eq!(parse_line("quit", None).unwrap(), ConsoleAction::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("join", None).is_err());
        assert!(parse_line("join 7 dog", None).is_err());
        assert!(parse_line("dance 7", None).is_err());
        // Admin commands need a configured admin id
        assert!(parse_line("ban 7", None).is_err());
    }

    #[test]
    fn test_parse_admin_commands() {
        let admin = Some(Actor::admin(ChatId::new(99)));
        assert!(matches!(
            parse_line("ban 7 spamming links", admin).unwrap(),
            ConsoleAction::Send(Command::Ban { actor, target, reason })
                if actor.id == ChatId::new(99)
                    && target == ChatId::new(7)
                    && reason.as_deref() == Some("spamming links")
        ));
        assert!(matches!(
            parse_line("ban 7", admin).unwrap(),
            ConsoleAction::Send(Command::Ban { reason: None, .. })
        ));
        assert!(matches!(
            parse_line("stats", admin).unwrap(),
            ConsoleAction::Send(Command::Stats { .. })
        ));
    }

    #[test]
    fn test_render_effects() {
        let delivered = render_effect(&Effect::Deliver {
            to: ChatId::new(2),
            text: "hi".to_string(),
        });
        assert_eq!(delivered.as_deref(), Some("[2] partner: hi"));

        assert!(render_effect(&Effect::ArmSearchTimer { id: ChatId::new(1) }).is_none());

        let banned = render_effect(&Effect::Notify {
            to: ChatId::new(3),
            notice: Notice::Banned {
                reason: Some("spam".to_string()),
            },
        });
        assert_eq!(banned.as_deref(), Some("[3] You are banned. Reason: spam"));
    }
}
