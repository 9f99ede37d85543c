use clap::{Parser, Subcommand};
use sous_core::*;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sous")]
#[command(about = "Step-by-step cooking assistant with step timers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cook a recipe step by step
    Cook {
        /// Recipe JSON file ({"name": ..., "steps": [...] or {"1": ...}})
        recipe: PathBuf,

        /// Walk every step without prompting (arms hinted timers, never waits)
        #[arg(long)]
        auto: bool,

        /// Use this duration for every timer instead of the step's hint
        #[arg(long)]
        timer_seconds: Option<i64>,
    },

    /// Show the timer a piece of step text implies
    Extract {
        /// Step text, e.g. "Bake for 25 minutes"
        text: String,
    },

    /// Show journaled cooking sessions
    History {
        /// Number of most recent sessions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    sous_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Cook {
            recipe,
            auto,
            timer_seconds,
        } => cmd_cook(&config, recipe, auto, timer_seconds),
        Commands::Extract { text } => cmd_extract(&text),
        Commands::History { limit } => cmd_history(&config, limit),
    }
}

fn cmd_cook(
    config: &Config,
    recipe_path: PathBuf,
    auto: bool,
    timer_seconds: Option<i64>,
) -> Result<()> {
    let recipe = Recipe::load(&recipe_path)?;
    tracing::debug!("Cooking {:?} from {:?}", recipe.name, recipe_path);
    let service = CookingService::new(config);

    let started = service.start_recipe(&recipe)?;
    let id = started.session_id;

    display_header(&started.recipe_name);
    display_step(&started.step);

    let result = if auto {
        run_auto(&service, id, started.step, timer_seconds)
    } else {
        run_interactive(&service, id, timer_seconds)
    };

    service.end_session(id)?;
    result
}

fn run_auto(
    service: &CookingService,
    id: Uuid,
    first: StepView,
    timer_seconds: Option<i64>,
) -> Result<()> {
    let mut step = first;
    loop {
        if step.has_timer {
            let armed = service.arm_timer(id, timer_seconds)?;
            println!("  ⏲ Timer armed: {}", format_clock(armed.duration_seconds));
        }

        match service.advance_session(id)? {
            Advance::Step(next) => {
                display_step(&next);
                step = next;
            }
            Advance::Completed => {
                display_completed(service, id);
                return Ok(());
            }
        }
    }
}

fn run_interactive(service: &CookingService, id: Uuid, timer_seconds: Option<i64>) -> Result<()> {
    loop {
        let Some(action) = prompt_user_action()? else {
            println!("\nEnding session.");
            return Ok(());
        };

        match action {
            UserAction::Next => match service.advance_session(id)? {
                Advance::Step(next) => display_step(&next),
                Advance::Completed => {
                    display_completed(service, id);
                    return Ok(());
                }
            },

            UserAction::Timer(custom) => {
                let duration = match custom {
                    Some(text) => match parse_custom_duration(&text) {
                        Some(d) => Some(i64::try_from(d.as_secs()).unwrap_or(i64::MAX)),
                        None => {
                            println!("  Could not understand duration: {}", text);
                            continue;
                        }
                    },
                    None => timer_seconds,
                };

                match service.arm_timer(id, duration) {
                    Ok(armed) => {
                        println!("  ⏲ Timer started: {}", format_clock(armed.duration_seconds))
                    }
                    Err(Error::InvalidDuration(secs)) => {
                        println!(
                            "  Timer duration must be between 1 second and {} (got {})",
                            format_clock(MAX_DURATION_SECONDS as u64),
                            secs
                        )
                    }
                    Err(e) => return Err(e),
                }
            }

            UserAction::Status => display_timer(&service.query_timer(id)?),
            UserAction::Pause => display_timer(&service.pause_timer(id)?),
            UserAction::Resume => display_timer(&service.resume_timer(id)?),
            UserAction::Cancel => {
                service.cancel_timer(id)?;
                println!("  Timer cancelled.");
            }

            UserAction::Quit => {
                println!("\nEnding session.");
                return Ok(());
            }
        }
    }
}

fn cmd_extract(text: &str) -> Result<()> {
    match extract_duration(text) {
        Some(duration) => println!(
            "{} seconds ({})",
            duration.as_secs(),
            format_clock(duration.as_secs())
        ),
        None => println!("no timer"),
    }
    Ok(())
}

fn cmd_history(config: &Config, limit: usize) -> Result<()> {
    let records = read_records(&config.journal_path())?;

    if records.is_empty() {
        println!("No cooking sessions journaled yet.");
        return Ok(());
    }

    for record in records.iter().rev().take(limit) {
        let outcome = if record.completed {
            "completed".to_string()
        } else {
            format!("stopped at step {}", record.steps_reached)
        };
        println!(
            "{}  {}  {} of {} steps, {}",
            record.finished_at.format("%Y-%m-%d %H:%M"),
            record.recipe_name,
            record.steps_reached,
            record.total_steps,
            outcome
        );
    }

    Ok(())
}

fn display_header(recipe_name: &str) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", recipe_name);
    println!("╰─────────────────────────────────────────╯");
}

fn display_step(step: &StepView) {
    println!();
    println!("  Step {} of {}", step.step_number, step.total_steps);
    println!("  {}", step.step_text);
    if step.has_timer {
        println!("  → This step has a wait. 't' + Enter to start a timer.");
    }
}

fn display_timer(status: &TimerStatus) {
    if !status.active {
        println!("  No timer running.");
    } else if status.paused {
        println!("  ⏸ {} left (paused)", format_clock(status.remaining_seconds));
    } else {
        println!("  ⏲ {} left", format_clock(status.remaining_seconds));
    }
}

fn display_completed(service: &CookingService, id: Uuid) {
    let name = service
        .session_status(id)
        .map(|s| s.recipe_name)
        .unwrap_or_default();
    println!("\n✓ Recipe completed! Enjoy your {}.", name);
}

enum UserAction {
    Next,
    Timer(Option<String>),
    Status,
    Pause,
    Resume,
    Cancel,
    Quit,
}

/// Read one command; `None` on end of input.
fn prompt_user_action() -> Result<Option<UserAction>> {
    println!("─────────────────────────────────────────");
    println!("Enter = next step  t [duration] = timer  s = timer status");
    println!("p = pause  r = resume  c = cancel timer  q = quit");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    let input = input.trim().to_lowercase();
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, Some(rest.trim().to_string())),
        None => (input.as_str(), None),
    };

    let action = match command {
        "t" | "timer" => UserAction::Timer(rest.filter(|r| !r.is_empty())),
        "s" | "status" => UserAction::Status,
        "p" | "pause" => UserAction::Pause,
        "r" | "resume" => UserAction::Resume,
        "c" | "cancel" => UserAction::Cancel,
        "q" | "quit" => UserAction::Quit,
        _ => UserAction::Next,
    };

    Ok(Some(action))
}
