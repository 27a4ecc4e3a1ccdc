mod command;
mod helper;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use harmony_application::{ChartStep, SessionUseCase};
use harmony_core::audio::{AudioSink, Tone};
use harmony_core::blobs::ShapeId;
use harmony_core::chart::Overlay;
use harmony_core::config::HarmonyConfig;
use harmony_core::conversation::{BubbleState, TurnRole};
use harmony_core::error::HarmonyError;
use harmony_core::generation::TextGenerator;
use harmony_core::interaction::{PointerEvent, PointerOutcome};
use harmony_core::journal::JournalStore;
use harmony_core::session::Scene;
use harmony_infrastructure::{ConfigStorage, FirebaseJournalStore, HarmonyPaths, InMemoryJournalStore};
use harmony_interaction::{ReplicateProxyAgent, ScriptedGenerator};

use command::Command;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "harmony")]
#[command(about = "A guided self-reflection session in the terminal")]
struct Args {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, env = "HARMONY_CONFIG")]
    config: Option<PathBuf>,

    /// Use the scripted generator and the in-memory journal
    #[arg(long)]
    offline: bool,

    /// Width of the virtual viewport
    #[arg(long)]
    width: Option<f64>,

    /// Height of the virtual viewport
    #[arg(long)]
    height: Option<f64>,

    /// Ring the terminal bell while the shapes overlap strongly
    #[arg(long)]
    bell: bool,
}

const BELL_MIN_VOLUME: f64 = 0.06;
/// Longest wait for the frame loop to redraw after a change.
const FRAME_WAIT: Duration = Duration::from_millis(100);

/// Rings the terminal bell for loud tones; quiet ones are dropped.
struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&self, tone: &Tone) {
        if tone.volume >= BELL_MIN_VOLUME && tone.delay_ms == 0 {
            eprint!("\x07");
        }
    }
}

fn init_tracing() -> Result<WorkerGuard> {
    let logs_dir = HarmonyPaths::logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;
    let appender = tracing_appender::rolling::daily(&logs_dir, "harmony.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn load_config(args: &Args) -> Result<HarmonyConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => HarmonyPaths::config_file()?,
    };
    let mut config = ConfigStorage::new(path).load_with_env()?;
    if let Some(width) = args.width {
        config.scene.width = width;
    }
    if let Some(height) = args.height {
        config.scene.height = height;
    }
    Ok(config)
}

async fn build_backends(
    config: &HarmonyConfig,
    offline: bool,
) -> (Arc<dyn JournalStore>, Arc<dyn TextGenerator>) {
    if offline {
        tracing::info!("[Readline] Offline mode: scripted generator, in-memory journal");
        return (
            Arc::new(InMemoryJournalStore::new()),
            Arc::new(ScriptedGenerator::new()),
        );
    }

    let generator: Arc<dyn TextGenerator> = Arc::new(ReplicateProxyAgent::from_config(&config.generation));

    let store: Arc<dyn JournalStore> = if config.persistence.is_configured() {
        match FirebaseJournalStore::connect(&config.persistence).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!("[Readline] Falling back to in-memory journal: {}", e);
                Arc::new(InMemoryJournalStore::new())
            }
        }
    } else {
        tracing::info!("[Readline] No database configured, journal stays in memory");
        Arc::new(InMemoryJournalStore::new())
    };

    (store, generator)
}

fn print_help() {
    let lines = [
        ("<name>", "start the session (start screen)"),
        ("/shapes", "show both shapes, overlap and touch note"),
        ("/press <self|presented>", "press a shape"),
        ("/drag <self|presented> x y", "press, move and release a shape"),
        ("/down x y | /move x y | /up", "raw pointer events"),
        ("/next", "leave the shape exercise"),
        ("/set <axis> <1-10>", "set an axis of the chart being plotted"),
        ("/chart", "show the chart"),
        ("/advance", "press the chart's action button"),
        ("/summary", "show the patient file summary"),
        ("/scene", "show the current scene"),
        ("<text>", "talk to the coach (reflection)"),
        ("quit", "end the session"),
    ];
    for (usage, what) in lines {
        println!("  {:<32}{}", usage.bright_cyan(), what.bright_black());
    }
}

fn print_error(err: &HarmonyError) {
    if err.is_user_visible() {
        println!("{}", err.to_string().yellow());
    } else {
        println!("{}", format!("Error: {err}").red());
    }
}

async fn print_shapes(session: &SessionUseCase) {
    let state = session.state().await;
    let blobs = state.blobs();
    for shape in blobs.shapes() {
        println!(
            "  {:<14} center=({:.0}, {:.0}) r={:.0}",
            shape.id.to_string().bright_magenta(),
            shape.center.x,
            shape.center.y,
            shape.radius
        );
    }
    println!(
        "  overlap {:.2} / congruence {}% / presses {}",
        blobs.intensity(),
        blobs.congruence(),
        blobs.interaction_count()
    );
    if let Some(note) = blobs.touch_note() {
        println!(
            "{}",
            format!(
                "  \"The parts of me that touch\" at ({:.0}, {:.0}), opacity {:.2}",
                note.position.x, note.position.y, note.opacity
            )
            .bright_white()
        );
    }
    if blobs.next_revealed() && state.scene() == Scene::Blobs {
        println!("{}", "  /next is available".bright_green());
    }
}

fn print_outcome(outcome: PointerOutcome) {
    match outcome {
        PointerOutcome::Ignored => println!("{}", "  (nothing there)".bright_black()),
        PointerOutcome::ShapePressed { id, next_revealed } => {
            println!("  pressed {id}");
            if next_revealed {
                println!("{}", "  /next is available".bright_green());
            }
        }
        PointerOutcome::ShapeMoved { id, intensity } => {
            println!("  {id} moved, overlap {intensity:.2}")
        }
        PointerOutcome::NodeGrabbed { index } => println!("  grabbed axis {}", index + 1),
        PointerOutcome::NodeMoved { index, value } => {
            println!("  axis {} -> {:.2}", index + 1, value)
        }
        PointerOutcome::Released => println!("{}", "  released".bright_black()),
    }
}

async fn press(session: &SessionUseCase, shape: ShapeId) -> PointerOutcome {
    let center = session.state().await.blobs().shape(shape).center;
    let outcome = session
        .pointer(PointerEvent::Down {
            x: center.x,
            y: center.y,
        })
        .await;
    session.pointer(PointerEvent::Up).await;
    outcome
}

async fn print_chart(session: &SessionUseCase) {
    let state = session.state().await;
    let chart = state.chart();
    println!("{}", chart.header().bright_magenta().bold());
    println!("{}", session.entry_date().bright_black());

    if state.scene() == Scene::Reflection {
        for item in session.metric_list().await {
            println!("  {}  {}", item.label.bold(), item.meta().bright_black());
            println!("    {}", item.description.bright_black());
        }
        return;
    }

    // The chart text comes from the same frame a drawing front-end paints.
    let mut frames = session.frames();
    let _ = tokio::time::timeout(FRAME_WAIT, frames.changed()).await;
    let Some(frame) = frames.borrow().clone() else {
        println!("{}", "  (the chart is not drawn yet)".bright_black());
        return;
    };

    for (i, label) in frame.labels.iter().enumerate() {
        let score = |overlay: Overlay| {
            frame
                .nodes
                .iter()
                .find(|node| node.overlay == overlay && node.axis == i)
                .map(|node| node.score)
        };
        let current = score(Overlay::Current).map_or_else(|| "-".to_string(), |s| s.to_string());
        let ideal = score(Overlay::Ideal)
            .map(|s| format!(" / ideal {s}"))
            .unwrap_or_default();
        println!(
            "  {} {:<24} current {}{}",
            (i + 1).to_string().bright_cyan(),
            label.label,
            current,
            ideal.bright_magenta()
        );
    }
    if let Some(label) = chart.action_label() {
        println!("{}", format!("  /advance: {label}").bright_green());
    }
}

async fn print_chat_tail(session: &SessionUseCase) {
    let Some(view) = session.chat_view().await else {
        return;
    };
    if let Some(status) = view.status_line() {
        println!("{}", status.bright_black());
    }
    if let Some(bubble) = view.bubbles().last() {
        match (bubble.role, bubble.state) {
            (_, BubbleState::Failed) => println!("{}", bubble.text.red()),
            (TurnRole::Assistant, _) => {
                for line in bubble.text.lines() {
                    println!("{}", line.bright_blue());
                }
            }
            (TurnRole::User, _) => {}
        }
    }
}

async fn handle(session: &SessionUseCase, command: Command) {
    match command {
        Command::Text(text) => match session.scene() {
            Scene::Start => match session.start(&text).await {
                Ok(()) => {
                    println!(
                        "{}",
                        "Move the two shapes. Press them three times, then /next.".bright_black()
                    );
                    print_shapes(session).await;
                }
                Err(e) => print_error(&e),
            },
            Scene::Reflection => {
                println!("{}", "...".bright_black());
                match session.send_message(&text).await {
                    Ok(_) => print_chat_tail(session).await,
                    Err(e) if e.is_retryable() => {
                        print_chat_tail(session).await;
                        let note = "The coach is busy. Send your message again.";
                        println!("{}", note.bright_black());
                    }
                    Err(e) if e.is_generation() => print_chat_tail(session).await,
                    Err(e) => print_error(&e),
                }
            }
            scene => println!(
                "{}",
                format!("Nothing to say in the {scene} scene. Type /help.").bright_black()
            ),
        },
        Command::Shapes => print_shapes(session).await,
        Command::Press(shape) => print_outcome(press(session, shape).await),
        Command::Drag { shape, x, y } => {
            let center = session.state().await.blobs().shape(shape).center;
            let down = session
                .pointer(PointerEvent::Down {
                    x: center.x,
                    y: center.y,
                })
                .await;
            if down == PointerOutcome::Ignored {
                print_outcome(down);
                return;
            }
            print_outcome(session.pointer(PointerEvent::Move { x, y }).await);
            session.pointer(PointerEvent::Up).await;
            print_shapes(session).await;
        }
        Command::Down { x, y } => print_outcome(session.pointer(PointerEvent::Down { x, y }).await),
        Command::Move { x, y } => print_outcome(session.pointer(PointerEvent::Move { x, y }).await),
        Command::Up => print_outcome(session.pointer(PointerEvent::Up).await),
        Command::Next => match session.finish_blobs().await {
            Ok(congruence) => {
                println!("{}", format!("Congruence {congruence}%").bright_green());
                print_chart(session).await;
            }
            Err(e) => print_error(&e),
        },
        Command::Set { axis, score } => match session.set_chart_score(axis, score).await {
            Ok(_) => print_chart(session).await,
            Err(e) => print_error(&e),
        },
        Command::Chart => print_chart(session).await,
        Command::Advance => {
            if session.scene() == Scene::Chart {
                println!("{}", "Saving today's entry...".bright_black());
            }
            match session.advance_chart().await {
                Ok(ChartStep::EnteredIdeal) => print_chart(session).await,
                Ok(ChartStep::Reflecting { .. }) => {
                    print_chart(session).await;
                    println!();
                    print_chat_tail(session).await;
                }
                Err(e) => print_error(&e),
            }
        }
        Command::Summary => match session.summary().await {
            Some(summary) => println!("{}", summary.bright_white()),
            None => println!("{}", "No summary yet.".bright_black()),
        },
        Command::Scene => println!("{}", session.scene().to_string().bright_magenta()),
        Command::Help => print_help(),
        Command::Quit => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing()?;
    let config = load_config(&args)?;

    let (store, generator) = build_backends(&config, args.offline).await;
    tracing::info!("[Readline] Generator: {}", generator.name());
    let mut session = SessionUseCase::new(config, store, generator);
    if args.bell {
        session = session.with_audio_sink(Arc::new(TerminalBell));
    }

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Harmony ===".bright_magenta().bold());
    println!("{}", "What is your name? (/help for commands, 'quit' to exit)".bright_black());
    println!();

    loop {
        let prompt = match session.scene() {
            Scene::Start => "name> ".to_string(),
            scene => format!("{scene}> "),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match command::parse(trimmed) {
                    Ok(Command::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(command) => handle(&session, command).await,
                    Err(e) => println!("{}", e.to_string().yellow()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    session.shutdown().await;
    Ok(())
}
