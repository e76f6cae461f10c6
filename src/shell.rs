// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Line-oriented session shell
//!
//! Reads one command per line, applies it to the [`App`] and renders the
//! visible route from the latest session snapshot.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::analyzers::{AnalysisOption, AnalysisResult};
use crate::app::App;
use crate::session::{CapturedImage, Route, Screen, Snapshot};
use crate::{Result, WhisperLensError};

/// Capture reference: a full id or a 1-based display position (`#2` or `2`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureRef {
    Id(String),
    Position(usize),
}

impl CaptureRef {
    /// Resolve to a capture id. Positions past the end resolve to nothing.
    pub fn resolve(&self, images: &[CapturedImage]) -> Option<String> {
        match self {
            CaptureRef::Id(id) => Some(id.clone()),
            CaptureRef::Position(pos) => pos
                .checked_sub(1)
                .and_then(|index| images.get(index))
                .map(|i| i.id.clone()),
        }
    }
}

impl FromStr for CaptureRef {
    type Err = WhisperLensError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        match digits.parse::<usize>() {
            Ok(pos) => Ok(CaptureRef::Position(parse_position(pos)?)),
            Err(_) => Ok(CaptureRef::Id(s.to_string())),
        }
    }
}

fn parse_position(pos: usize) -> Result<usize> {
    if pos == 0 {
        return Err(WhisperLensError::InvalidArgument("positions start at 1".to_string()));
    }
    Ok(pos)
}

/// One shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Finish onboarding
    Start,
    Screen(Screen),
    Add(Vec<PathBuf>),
    Remove(CaptureRef),
    /// Move a capture to a 1-based position
    Move { capture: CaptureRef, position: usize },
    Option(AnalysisOption),
    Comment(String),
    Analyze,
    Save,
    Discard,
    History,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = WhisperLensError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let missing = |what: &str| WhisperLensError::InvalidArgument(format!("{} expects {}", verb, what));

        match verb.to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "screen" | "go" => {
                let screen = args.first().ok_or_else(|| missing("home, analyze or history"))?;
                Ok(Command::Screen(screen.parse()?))
            }
            "home" => Ok(Command::Screen(Screen::Home)),
            "add" => {
                if args.is_empty() {
                    return Err(missing("one or more image paths"));
                }
                Ok(Command::Add(args.iter().map(|p| PathBuf::from(*p)).collect()))
            }
            "remove" | "rm" => {
                let capture = args.first().ok_or_else(|| missing("a capture"))?;
                Ok(Command::Remove(capture.parse()?))
            }
            "move" | "mv" => {
                let (capture, position) = match args.as_slice() {
                    [capture, position] => (capture, position),
                    _ => return Err(missing("a capture and a position")),
                };
                let position = position
                    .trim_start_matches('#')
                    .parse::<usize>()
                    .map_err(|_| missing("a numeric position"))?;
                Ok(Command::Move {
                    capture: capture.parse()?,
                    position: parse_position(position)?,
                })
            }
            "option" => {
                let option = args.first().ok_or_else(|| missing("an analysis option"))?;
                Ok(Command::Option(option.parse()?))
            }
            "comment" => Ok(Command::Comment(rest.to_string())),
            "analyze" | "analyse" => Ok(Command::Analyze),
            "save" => Ok(Command::Save),
            "discard" => Ok(Command::Discard),
            "history" => Ok(Command::History),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(WhisperLensError::InvalidArgument(format!(
                "unknown command '{}', type 'help'",
                other
            ))),
        }
    }
}

/// Whether the shell keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command to the application
pub async fn execute(app: &mut App, command: Command) -> Result<Flow> {
    debug!("Executing {:?}", command);
    match command {
        Command::Start => app.session_mut().set_onboarded(true),
        Command::Screen(screen) => app.set_active_screen(screen),
        Command::Add(paths) => {
            app.import(paths).await;
        }
        Command::Remove(capture) => {
            if let Some(id) = capture.resolve(app.session().captured_images()) {
                app.session_mut().remove_captured_image(&id);
            }
        }
        Command::Move { capture, position } => {
            let id = capture.resolve(app.session().captured_images());
            if let (Some(id), Some(index)) = (id, position.checked_sub(1)) {
                app.session_mut().update_image_order(&id, index);
            }
        }
        Command::Option(option) => app.session_mut().set_selected_analysis_option(option),
        Command::Comment(text) => app.session_mut().set_user_comment(text),
        Command::Analyze => {
            // Same entry as the home screen button
            if app.session().state().active_screen != Screen::Analyze {
                let comment = app.session().state().comment.clone();
                app.start_analysis(comment)?;
            }
            app.run_analysis().await?;
        }
        Command::Save => {
            app.save_result();
        }
        Command::Discard => app.discard_result(),
        Command::History => app.set_active_screen(Screen::History),
        Command::Show | Command::Help => {}
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

pub const HELP: &str = "\
Commands:
  start                     finish onboarding
  screen <home|analyze|history>
  add <path>...             import screenshots (one picking session)
  remove <#n|id>            remove a screenshot
  move <#n|id> <position>   reorder a screenshot
  option <tag>              response-advice, tone-analysis, hidden-intentions, relationship-dynamics
  comment <text>            context for the analysis
  analyze                   run the analysis
  save | discard            keep or drop the result
  history                   show saved analyses
  show | help | quit";

/// Render the visible route as text
pub fn render(snapshot: &Snapshot, pending: Option<&AnalysisResult>) -> String {
    let mut out = String::new();

    let screen = match snapshot.route() {
        Route::Onboarding => {
            let _ = writeln!(out, "Chat Whisper Lens");
            let _ = writeln!(out, "Comprenez les intentions cachées derrière les messages.");
            let _ = writeln!(out, "Type 'start' to begin.");
            return out;
        }
        Route::Screen(screen) => screen,
    };

    let _ = writeln!(out, "== {} ==", screen.title());
    let _ = writeln!(out, "{}", screen.subtitle());

    match screen {
        Screen::Home => {
            render_captures(&mut out, &snapshot.captured_images);
            if !snapshot.comment.is_empty() {
                let _ = writeln!(out, "Commentaire: {}", snapshot.comment);
            }
        }
        Screen::Analyze => {
            render_captures(&mut out, &snapshot.captured_images);
            let _ = writeln!(out, "Que souhaitez-vous analyser?");
            for option in AnalysisOption::ALL {
                let marker = if option == snapshot.selected_option { "*" } else { " " };
                let _ = writeln!(out, " {} {:<22} {}", marker, option.tag(), option.description());
            }
            match pending {
                Some(result) => {
                    let _ = writeln!(out, "Ton détecté: {}", result.tone.label());
                    let _ = writeln!(out, "{}", result.advice);
                    let _ = writeln!(out, "Type 'save' or 'discard'.");
                }
                None => {
                    let _ = writeln!(out, "Type 'analyze' to run the analysis.");
                }
            }
        }
        Screen::History => {
            if snapshot.analyses().is_empty() {
                let _ = writeln!(out, "Aucune analyse pour le moment.");
            }
            for analysis in snapshot.analyses() {
                let _ = writeln!(
                    out,
                    "{}  {}  [{}]  {} capture(s)",
                    analysis.timestamp.format("%Y-%m-%d %H:%M"),
                    analysis.selected_option.title(),
                    analysis.tone.label(),
                    analysis.images.len()
                );
                let _ = writeln!(out, "    {}", analysis.advice);
            }
        }
    }

    out
}

fn render_captures(out: &mut String, images: &[CapturedImage]) {
    if images.is_empty() {
        let _ = writeln!(out, "Aucune capture d'écran. Use 'add <path>'.");
        return;
    }
    let _ = writeln!(out, "Captures d'écran ({})", images.len());
    for image in images {
        let _ = writeln!(
            out,
            "  #{:<3} {}  {:>9} bytes  {}",
            image.order + 1,
            image.fingerprint(),
            image.len(),
            image.id
        );
    }
}

/// Interactive loop over stdin
pub async fn run(mut app: App) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render(&app.session().snapshot(), app.pending()));

    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let show_help = command == Command::Help;
        match execute(&mut app, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                warn!("{}", e);
                eprintln!("{}", e);
            }
        }

        if show_help {
            println!("{}", HELP);
        } else {
            println!("{}", render(&app.session().snapshot(), app.pending()));
        }
    }

    Ok(())
}
