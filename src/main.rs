mod app;
mod domain;
mod notifications;
mod persistence;
mod rewards;
mod store;
mod ticker;
mod timer;

use std::io::{self, BufRead, Write};
use std::sync::mpsc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use app::App;
use persistence::{init_local_dir, Storage};
use ticker::Ticker;
use timer::{format_mmss, FocusPhase, FocusTimer, TickOutcome};

#[derive(Parser)]
#[command(name = "questlog")]
#[command(about = "A gamified task tracker with XP levels and a focus timer", long_about = None)]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .questlog directory in the current directory
    Init,
    /// Add a new task
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List active tasks (the default)
    List,
    /// Complete the task at POSITION, moving it to the completed list
    Done {
        /// 1-based position in the active list
        position: usize,
    },
    /// Edit the text of the task at POSITION
    Edit {
        position: usize,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Delete the task at POSITION (asks first when it isn't completed)
    Rm { position: usize },
    /// Delete every active task
    RmAll,
    /// Move a task from one position to another
    Move { from: usize, to: usize },
    /// List completed tasks
    Completed,
    /// Restore the completed task at POSITION to the top of the active list
    Restore { position: usize },
    /// Delete the completed task at POSITION
    Forget { position: usize },
    /// Clear the completed list (XP is kept)
    ClearCompleted,
    /// Show XP, level and badge
    Stats,
    /// Show or set the theme
    Theme {
        /// Theme name (light, dark, gradient, custom)
        name: Option<String>,
        /// Accent color, e.g. #2d70fd
        #[arg(long)]
        color: Option<String>,
    },
    /// Run a focus session on the first incomplete task
    Focus {
        /// Session length in minutes (clamped to 1-180)
        #[arg(short, long, default_value_t = 25)]
        minutes: u32,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_dir()?;
        println!("Initialized questlog directory: {}", data_dir.display());
        println!();
        println!("Questlog will now use this local directory for task storage.");
        return Ok(());
    }

    let storage = Storage::open_default()?;
    debug!(dir = %storage.dir().display(), "using data directory");
    let mut app = App::load(storage);
    let mut confirm = confirm_prompt(cli.yes);

    match cli.command {
        Some(Commands::Init) => unreachable!("handled above"),
        None | Some(Commands::List) => render_list(&app),
        Some(Commands::Add { text }) => {
            if app.add_task(&text.join(" "))? {
                render_list(&app);
            } else {
                println!("Nothing to add: task text is empty.");
            }
        }
        Some(Commands::Done { position }) => {
            let index = to_index(position);
            let prior = index.and_then(|i| {
                app.store.tasks().get(i).map(|t| (t.text.clone(), t.completed))
            });
            match (index, prior) {
                (Some(index), Some((text, was_completed))) => {
                    app.toggle_task(index)?;
                    if was_completed {
                        println!("Reopened: {text}");
                    } else {
                        notifications::notify_task_done(&text);
                        println!("Completed: {text} (+1 XP)");
                        render_stats(&app);
                    }
                }
                _ => println!("No task at position {position}."),
            }
        }
        Some(Commands::Edit { position, text }) => {
            let changed = match to_index(position) {
                Some(index) => app.edit_task(index, &text.join(" "))?,
                None => false,
            };
            if changed {
                render_list(&app);
            } else {
                println!("Nothing changed.");
            }
        }
        Some(Commands::Rm { position }) => {
            let changed = match to_index(position) {
                Some(index) => app.delete_task(index, &mut confirm)?,
                None => false,
            };
            if changed {
                render_list(&app);
            } else {
                println!("Nothing deleted.");
            }
        }
        Some(Commands::RmAll) => {
            if app.delete_all(&mut confirm)? {
                println!("All tasks deleted.");
            } else {
                println!("Kept everything.");
            }
        }
        Some(Commands::Move { from, to }) => {
            let changed = match (to_index(from), to_index(to)) {
                (Some(from), Some(to)) => app.reorder(from, to)?,
                _ => false,
            };
            if changed {
                render_list(&app);
            } else {
                println!("Nothing moved.");
            }
        }
        Some(Commands::Completed) => render_completed(&app),
        Some(Commands::Restore { position }) => {
            let changed = match to_index(position) {
                Some(index) => app.restore_completed(index)?,
                None => false,
            };
            if changed {
                println!("Restored to the top of the list.");
                render_list(&app);
            } else {
                println!("No completed task at position {position}.");
            }
        }
        Some(Commands::Forget { position }) => {
            let changed = match to_index(position) {
                Some(index) => app.delete_completed(index)?,
                None => false,
            };
            if changed {
                render_completed(&app);
            } else {
                println!("No completed task at position {position}.");
            }
        }
        Some(Commands::ClearCompleted) => {
            if app.clear_completed(&mut confirm)? {
                println!("Completed list cleared. XP is kept.");
            } else {
                println!("Kept everything.");
            }
        }
        Some(Commands::Stats) => render_stats(&app),
        Some(Commands::Theme { name, color }) => {
            if name.is_none() && color.is_none() {
                println!(
                    "Theme: {} (accent {})",
                    app.theme.effective_name(),
                    app.theme.color
                );
            } else {
                app.set_theme(name.as_deref(), color.as_deref())?;
                println!(
                    "Theme set to {} (accent {}).",
                    app.theme.effective_name(),
                    app.theme.color
                );
            }
        }
        Some(Commands::Focus { minutes }) => {
            let Some(label) = app.store.first_incomplete().map(|t| t.text.clone()) else {
                anyhow::bail!("No tasks to focus on");
            };
            let mut timer = FocusTimer::open(&label);
            timer.start(minutes);
            println!(
                "Focusing on: {} ({} min)",
                timer.task_label(),
                timer.duration_secs() / 60
            );
            println!("Controls: p = pause, r = resume, s = stop (press Enter after).");
            run_focus_loop(&mut timer)?;
        }
    }

    Ok(())
}

/// Tracing is opt-in via RUST_LOG.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Convert a 1-based CLI position to a list index.
fn to_index(position: usize) -> Option<usize> {
    position.checked_sub(1)
}

/// Build the confirmation callback: a y/N prompt on stdin, short-
/// circuited to yes by --yes.
fn confirm_prompt(assume_yes: bool) -> impl FnMut(&str) -> bool {
    move |message: &str| {
        if assume_yes {
            return true;
        }
        print!("{message} [y/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

fn render_list(app: &App) {
    if app.store.tasks().is_empty() {
        println!("No active tasks.");
        return;
    }
    for (i, task) in app.store.tasks().iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        println!("{:>3}. [{mark}] {}", i + 1, task.text);
    }
    println!("{} task(s)", app.store.tasks().len());
}

fn render_completed(app: &App) {
    if app.store.completed().is_empty() {
        println!("No completed tasks.");
        return;
    }
    for (i, task) in app.store.completed().iter().enumerate() {
        let when = task
            .completed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:>3}. {} {}", i + 1, task.text, when);
    }
}

fn render_stats(app: &App) {
    println!("XP: {}", app.ledger.xp);
    println!("Level: {}", app.ledger.level);
    if let Some(badge) = badge(app.ledger.level) {
        println!("Badge: {badge}");
    }
    println!(
        "{} XP LEFT to level {}",
        app.ledger.xp_to_next_level(),
        app.ledger.level + 1
    );
}

/// Crown badge for a level: one crown per level up to five, then a
/// multiplier. Hidden at level 0.
fn badge(level: u64) -> Option<String> {
    const CAP: u64 = 5;
    if level == 0 {
        None
    } else if level <= CAP {
        Some("👑".repeat(level as usize))
    } else {
        Some(format!("👑 x{level}"))
    }
}

/// Commands the focus loop accepts from stdin while ticking.
enum FocusCommand {
    Pause,
    Resume,
    Stop,
}

/// Read focus commands line by line on a background thread so the
/// tick loop never blocks on stdin.
fn spawn_input_thread() -> mpsc::Receiver<FocusCommand> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = match line.trim() {
                "p" => Some(FocusCommand::Pause),
                "r" => Some(FocusCommand::Resume),
                "s" | "q" => Some(FocusCommand::Stop),
                _ => None,
            };
            if let Some(command) = command {
                if tx.send(command).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

/// Drive the focus timer at one tick per second until it expires or
/// the user stops it. This loop is the timer's only tick source.
fn run_focus_loop(timer: &mut FocusTimer) -> Result<()> {
    if timer.phase() != FocusPhase::Running {
        return Ok(());
    }

    let commands = spawn_input_thread();
    let mut ticker = Ticker::new();
    print_remaining(timer.remaining_secs())?;

    loop {
        ticker.wait();

        while let Ok(command) = commands.try_recv() {
            match command {
                FocusCommand::Pause => {
                    if timer.pause() {
                        println!("\nPaused.");
                    }
                }
                FocusCommand::Resume => {
                    if timer.resume() {
                        println!("Resumed.");
                    }
                }
                FocusCommand::Stop => {
                    timer.stop();
                    println!("\nStopped.");
                    return Ok(());
                }
            }
        }

        match timer.tick() {
            TickOutcome::Ticked(remaining) => print_remaining(remaining)?,
            TickOutcome::Expired => {
                println!("\r00:00");
                println!("Pomodoro complete!");
                notifications::notify_focus_complete(timer.task_label());
                return Ok(());
            }
            // Paused: keep polling for a resume or stop.
            TickOutcome::Inert => {}
        }
    }
}

fn print_remaining(remaining: u32) -> Result<()> {
    print!("\r{}", format_mmss(remaining));
    io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_index_is_one_based() {
        assert_eq!(to_index(1), Some(0));
        assert_eq!(to_index(3), Some(2));
        assert_eq!(to_index(0), None);
    }

    #[test]
    fn test_badge_tiers() {
        assert_eq!(badge(0), None);
        assert_eq!(badge(1).unwrap(), "👑");
        assert_eq!(badge(5).unwrap(), "👑👑👑👑👑");
        assert_eq!(badge(6).unwrap(), "👑 x6");
    }
}
