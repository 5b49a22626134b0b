use party_games::error::{ConfigError, GamesError};
use party_games::games;
use std::env;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PARTY_GAMES_LOG";
const LOG_FILE_NAME: &str = "party-games.log";

fn main()
{
    if let Err(err) = init_logging().and_then(|()| run()) {
        tracing::error!(error = %err, "party-games failed");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<(), GamesError>
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    let path = log_path(env::var_os(LOG_ENV));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| ConfigError::LogFile {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// Games own the terminal, so logs always go to a file.
fn log_path(configured: Option<OsString>) -> PathBuf
{
    configured
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join(LOG_FILE_NAME))
}

fn run() -> Result<(), GamesError>
{
    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();
    match command.as_deref() {
        None => interactive_menu(),
        Some("list") => {
            list_games();
            Ok(())
        }
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => run_game(other, &rest),
    }
}

fn run_game(id: &str, args: &[String]) -> Result<(), GamesError>
{
    let game = games::find(id).ok_or_else(|| GamesError::UnknownGame(id.to_string()))?;
    if !game.is_playable() {
        return Err(GamesError::NotPlayable(game.name.to_string()));
    }
    tracing::info!(game = game.id, "launching game");
    let config = games::stats::StatsConfig::from_args(args)?;
    games::stats::run_with_config(config)
}

fn interactive_menu() -> Result<(), GamesError>
{
    let registry = games::registry();
    println!("Party Games");
    println!();
    println!("Select a game:");
    for (idx, game) in registry.iter().enumerate() {
        let marker = if game.is_playable() { "" } else { " (coming soon)" };
        println!("  {}. {}{}", idx + 1, game.name, marker);
    }
    println!();
    print!("Enter number or id (default {}, q to quit): ", default_choice(&registry));
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let choice = input.trim();

    if choice.eq_ignore_ascii_case("q") {
        return Ok(());
    }
    let selected = select(&registry, choice)
        .ok_or_else(|| GamesError::InvalidSelection(choice.to_string()))?;
    run_game(selected.id, &[])
}

// One-based position of the first playable game.
fn default_choice(registry: &[games::GameDescriptor]) -> usize
{
    registry
        .iter()
        .position(|game| game.is_playable())
        .map_or(1, |idx| idx + 1)
}

fn select<'a>(
    registry: &'a [games::GameDescriptor],
    choice: &str,
) -> Option<&'a games::GameDescriptor>
{
    if choice.is_empty() {
        return registry.get(default_choice(registry) - 1);
    }
    if let Ok(index) = choice.parse::<usize>() {
        return index.checked_sub(1).and_then(|idx| registry.get(idx));
    }
    registry
        .iter()
        .find(|game| game.id.eq_ignore_ascii_case(choice))
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!(
            "  {:<15} {:<16} players: {:<7} icon: {:<26} {}",
            game.id,
            game.name,
            game.players_label(),
            game.icon,
            game.description
        );
    }
}

fn print_help()
{
    println!("party-games");
    println!("\nUsage:");
    println!("  party-games                 interactive menu");
    println!("  party-games list");
    println!("  party-games stat-challenge [--seed=N] [--fade-ms=300]");
    println!("\nEnvironment:");
    println!("  PARTY_GAMES_SEED     default seed for question order");
    println!("  PARTY_GAMES_FADE_MS  default delay before each question");
    println!("  PARTY_GAMES_LOG      log file (default party-games.log in the temp dir)");
    println!("  RUST_LOG             log filter (default warn)");
}
