use crate::error::{ConfigError, GamesError};
use crate::picker::ExhaustiblePicker;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::env;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

const TICK_MS: u64 = 33;
const DEFAULT_FADE_MS: u64 = 300;
const MAX_FADE_MS: u64 = 2000;
const SEED_ENV: &str = "PARTY_GAMES_SEED";
const FADE_ENV: &str = "PARTY_GAMES_FADE_MS";

const INTRO: &str = "Let the stats speak for themselves!";
const WARNING: &str = "Warning: May ruin friendships!";

/// A question together with the picture shown under it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prompt
{
    pub text: &'static str,
    pub asset: &'static str,
}

pub const PROMPTS: [Prompt; 8] = [
    Prompt {
        text: "Fastest 2.4km timing?",
        asset: "assets/run.jpeg",
    },
    Prompt {
        text: "Heaviest squat/bench/deadlift?",
        asset: "assets/sbd.jpg",
    },
    Prompt {
        text: "Most number of SUs used?",
        asset: "assets/su.jpeg",
    },
    Prompt {
        text: "Most cooked for uni?",
        asset: "assets/cooked.jpeg",
    },
    Prompt {
        text: "Stays nearest to campus?",
        asset: "assets/nus.jpg",
    },
    Prompt {
        text: "Highest GPA/CAP?",
        asset: "assets/grades.png",
    },
    Prompt {
        text: "Most number of internships done?",
        asset: "assets/internships.png",
    },
    Prompt {
        text: "Most number of mods taken this sem?",
        asset: "assets/nusmods.png",
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsConfig
{
    pub seed: Option<u64>,
    pub fade: Duration,
}

impl StatsConfig
{
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError>
    {
        Self::from_sources(args, |key| env::var(key).ok())
    }

    fn from_sources(
        args: &[String],
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError>
    {
        let mut seed: Option<u64> = None;
        let mut fade_ms: Option<u64> = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "--seed" {
                let value = iter.next().ok_or(ConfigError::MissingValue("--seed"))?;
                seed = Some(parse_number("--seed", value)?);
            } else if let Some(rest) = arg.strip_prefix("--seed=") {
                seed = Some(parse_number("--seed", rest)?);
            } else if arg == "--fade-ms" {
                let value = iter
                    .next()
                    .ok_or(ConfigError::MissingValue("--fade-ms"))?;
                fade_ms = Some(parse_number("--fade-ms", value)?);
            } else if let Some(rest) = arg.strip_prefix("--fade-ms=") {
                fade_ms = Some(parse_number("--fade-ms", rest)?);
            } else {
                return Err(ConfigError::UnknownOption(arg.clone()));
            }
        }

        if seed.is_none() {
            if let Some(value) = lookup_env(SEED_ENV) {
                seed = Some(parse_number(SEED_ENV, &value)?);
            }
        }
        if fade_ms.is_none() {
            if let Some(value) = lookup_env(FADE_ENV) {
                fade_ms = Some(parse_number(FADE_ENV, &value)?);
            }
        }

        let fade_ms = fade_ms.unwrap_or(DEFAULT_FADE_MS).min(MAX_FADE_MS);
        Ok(Self {
            seed,
            fade: Duration::from_millis(fade_ms),
        })
    }
}

impl Default for StatsConfig
{
    fn default() -> Self
    {
        Self {
            seed: None,
            fade: Duration::from_millis(DEFAULT_FADE_MS),
        }
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError>
{
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::NotANumber {
            name,
            value: value.to_string(),
        })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase
{
    Intro,
    Fading,
    Showing,
    GameOver,
}

/// Screen state for one Stats Challenge session.
///
/// Each request schedules a draw `fade` after the request; the draw happens on
/// the first `poll` at or past that deadline. A request made after the pool ran
/// out starts a new round first.
pub struct StatsChallenge
{
    picker: ExhaustiblePicker<Prompt>,
    shown: Option<Prompt>,
    game_over: bool,
    pending: Option<Instant>,
    fade: Duration,
}

impl StatsChallenge
{
    pub fn new(config: &StatsConfig) -> Self
    {
        let picker = match config.seed {
            Some(seed) => ExhaustiblePicker::seeded(PROMPTS, seed),
            None => ExhaustiblePicker::new(PROMPTS),
        };
        Self::with_picker(picker, config.fade)
    }

    /// `fade` is capped at the same limit the config applies.
    pub fn with_picker(picker: ExhaustiblePicker<Prompt>, fade: Duration) -> Self
    {
        Self {
            picker,
            shown: None,
            game_over: false,
            pending: None,
            fade: fade.min(Duration::from_millis(MAX_FADE_MS)),
        }
    }

    pub fn phase(&self) -> Phase
    {
        if self.pending.is_some() {
            Phase::Fading
        } else if self.game_over {
            Phase::GameOver
        } else if self.shown.is_some() {
            Phase::Showing
        } else {
            Phase::Intro
        }
    }

    /// Schedules the next draw. Returns false when a draw is already pending.
    pub fn request_next(&mut self, now: Instant) -> bool
    {
        if self.pending.is_some() {
            return false;
        }
        if self.game_over {
            self.picker.reset();
            self.game_over = false;
            tracing::info!(questions = self.picker.len(), "starting a new round");
        }
        self.pending = Some(now.checked_add(self.fade).unwrap_or(now));
        true
    }

    /// Performs the pending draw once its deadline has passed. Returns true if
    /// the screen changed.
    pub fn poll(&mut self, now: Instant) -> bool
    {
        match self.pending {
            Some(due) if now >= due => {}
            _ => return false,
        }
        self.pending = None;

        match self.picker.draw().copied() {
            Some(prompt) => {
                tracing::debug!(question = prompt.text, asset = prompt.asset, "next question");
                self.shown = Some(prompt);
            }
            None => {
                tracing::info!(asked = self.picker.len(), "all questions asked");
                self.shown = None;
                self.game_over = true;
            }
        }
        true
    }

    pub fn cancel_pending(&mut self) -> bool
    {
        self.pending.take().is_some()
    }

    /// Puts every question back in play without changing what is on screen.
    pub fn restart(&mut self)
    {
        self.pending = None;
        self.game_over = false;
        self.picker.reset();
    }

    pub fn shown(&self) -> Option<&Prompt>
    {
        self.shown.as_ref()
    }

    /// Questions asked this round and the pool size.
    pub fn progress(&self) -> (usize, usize)
    {
        (self.picker.drawn(), self.picker.len())
    }

    pub fn button_label(&self) -> &'static str
    {
        if self.game_over {
            "Play again?"
        } else if self.shown.is_some() {
            "Next Question"
        } else {
            "Start"
        }
    }
}

struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

enum Action
{
    Next,
    Restart,
    Quit,
}

pub fn run_with_config(config: StatsConfig) -> Result<(), GamesError>
{
    tracing::info!(
        seed = ?config.seed,
        fade = ?config.fade,
        "starting stats challenge"
    );
    let mut game = StatsChallenge::new(&config);
    let mut term = TerminalGuard::enter()?;
    let mut last_tick: Option<Instant> = None;

    loop {
        let now = Instant::now();
        match handle_input()? {
            Some(Action::Quit) => break,
            Some(Action::Next) => {
                game.request_next(now);
            }
            Some(Action::Restart) => game.restart(),
            None => {}
        }
        game.poll(Instant::now());

        let due = last_tick.is_none_or(|tick| tick.elapsed() >= Duration::from_millis(TICK_MS));
        if due {
            draw_ui(term.stdout(), &game)?;
            last_tick = Some(Instant::now());
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    let (asked, total) = game.progress();
    tracing::info!(asked, total, "stats challenge closed");
    Ok(())
}

fn handle_input() -> Result<Option<Action>, GamesError>
{
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        {
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Some(Action::Quit));
                }
                KeyCode::Char(' ') | KeyCode::Enter => return Ok(Some(Action::Next)),
                KeyCode::Char('r') => return Ok(Some(Action::Restart)),
                _ => {}
            }
        }
    }
    Ok(None)
}

fn screen_lines(game: &StatsChallenge) -> Vec<String>
{
    let (asked, total) = game.progress();
    let mut lines = Vec::new();
    lines.push("Party Games - Stats Challenge".to_string());
    lines.push(format!("Asked: {asked}/{total}"));
    lines.push(String::new());

    match (game.phase(), game.shown()) {
        (Phase::Fading, _) => lines.push("...".to_string()),
        (Phase::Showing, Some(prompt)) => {
            lines.push(prompt.text.to_string());
            lines.push(format!("[image: {}]", prompt.asset));
        }
        _ => {
            lines.push(INTRO.to_string());
            lines.push(WARNING.to_string());
        }
    }

    lines.push(String::new());
    lines.push(format!("[ {} ]", game.button_label()));
    lines.push(String::new());
    lines.push("Controls: SPACE/ENTER next, r restart round, ESC or q to quit".to_string());
    lines
}

fn draw_ui(stdout: &mut Stdout, game: &StatsChallenge) -> Result<(), GamesError>
{
    let output = format!("{}\r\n", screen_lines(game).join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::collections::HashSet;

    const FADE: Duration = Duration::from_millis(300);

    fn game(seed: u64) -> StatsChallenge
    {
        StatsChallenge::with_picker(ExhaustiblePicker::seeded(PROMPTS, seed), FADE)
    }

    fn args(list: &[&str]) -> Vec<String>
    {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    // Requests a question and lets the fade run out.
    fn advance(game: &mut StatsChallenge, now: &mut Instant)
    {
        assert!(game.request_next(*now));
        *now += FADE;
        assert!(game.poll(*now));
    }

    #[test]
    fn starts_on_intro()
    {
        let game = game(1);
        assert_eq!(game.phase(), Phase::Intro);
        assert_eq!(game.button_label(), "Start");
        assert_eq!(game.progress(), (0, 8));
        assert!(game.shown().is_none());
    }

    #[test]
    fn draw_waits_for_fade()
    {
        let mut game = game(2);
        let start = Instant::now();
        assert!(game.request_next(start));
        assert_eq!(game.phase(), Phase::Fading);

        assert!(!game.poll(start + Duration::from_millis(299)));
        assert!(game.shown().is_none());

        assert!(game.poll(start + FADE));
        assert_eq!(game.phase(), Phase::Showing);
        assert!(game.shown().is_some());
        assert_eq!(game.button_label(), "Next Question");
    }

    #[test]
    fn only_one_draw_pending()
    {
        let mut game = game(3);
        let start = Instant::now();
        assert!(game.request_next(start));
        assert!(!game.request_next(start + Duration::from_millis(100)));

        assert!(game.poll(start + FADE));
        assert!(!game.poll(start + FADE * 2));
        assert_eq!(game.progress(), (1, 8));
    }

    #[test]
    fn oversized_fade_is_capped()
    {
        let config = StatsConfig {
            seed: Some(1),
            fade: Duration::MAX,
        };
        let mut game = StatsChallenge::new(&config);
        let start = Instant::now();
        assert!(game.request_next(start));
        assert!(!game.poll(start + Duration::from_millis(MAX_FADE_MS - 1)));
        assert!(game.poll(start + Duration::from_millis(MAX_FADE_MS)));
        assert_eq!(game.phase(), Phase::Showing);
    }

    #[test]
    fn cancelled_draw_leaves_pool_alone()
    {
        let mut game = game(4);
        let start = Instant::now();
        game.request_next(start);
        assert!(game.cancel_pending());
        assert!(!game.poll(start + FADE));
        assert_eq!(game.progress(), (0, 8));
        assert!(!game.cancel_pending());
    }

    #[test]
    fn full_round_then_play_again()
    {
        let mut game = game(5);
        let mut now = Instant::now();
        let mut seen = HashSet::new();
        for _ in 0..PROMPTS.len() {
            advance(&mut game, &mut now);
            assert!(seen.insert(game.shown().unwrap().text));
        }
        assert_eq!(seen.len(), PROMPTS.len());

        advance(&mut game, &mut now);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.button_label(), "Play again?");
        assert!(game.shown().is_none());

        advance(&mut game, &mut now);
        assert_eq!(game.phase(), Phase::Showing);
        assert_eq!(game.progress(), (1, 8));
    }

    #[test]
    fn restart_keeps_shown_question()
    {
        let mut game = game(6);
        let mut now = Instant::now();
        advance(&mut game, &mut now);
        advance(&mut game, &mut now);
        let shown = *game.shown().unwrap();

        game.restart();
        assert_eq!(game.progress(), (0, 8));
        assert_eq!(game.shown(), Some(&shown));
    }

    #[test]
    fn every_prompt_has_an_asset()
    {
        for prompt in PROMPTS {
            assert!(prompt.asset.starts_with("assets/"), "{}", prompt.text);
        }
        let texts: HashSet<&str> = PROMPTS.iter().map(|prompt| prompt.text).collect();
        assert_eq!(texts.len(), PROMPTS.len());
    }

    #[test]
    fn screen_shows_intro_and_question()
    {
        let mut game = game(7);
        assert!(screen_lines(&game).iter().any(|line| line == INTRO));

        let mut now = Instant::now();
        advance(&mut game, &mut now);
        let text = game.shown().unwrap().text;
        let lines = screen_lines(&game);
        assert!(lines.iter().any(|line| line == text));
        assert!(lines.iter().all(|line| line != INTRO));
    }

    #[test]
    fn config_defaults()
    {
        let config = StatsConfig::from_sources(&[], |_| None).unwrap();
        assert_eq!(config, StatsConfig::default());
        assert_eq!(config.fade, Duration::from_millis(300));
    }

    #[test]
    fn config_reads_flags()
    {
        let config =
            StatsConfig::from_sources(&args(&["--seed", "9", "--fade-ms=120"]), |_| None).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.fade, Duration::from_millis(120));
    }

    #[test]
    fn flags_win_over_env()
    {
        let lookup = |key: &str| match key {
            SEED_ENV => Some("1".to_string()),
            FADE_ENV => Some("50".to_string()),
            _ => None,
        };
        let config = StatsConfig::from_sources(&args(&["--seed=2"]), lookup).unwrap();
        assert_eq!(config.seed, Some(2));
        assert_eq!(config.fade, Duration::from_millis(50));
    }

    #[test]
    fn fade_is_clamped()
    {
        let config = StatsConfig::from_sources(&args(&["--fade-ms=60000"]), |_| None).unwrap();
        assert_eq!(config.fade, Duration::from_millis(MAX_FADE_MS));
    }

    #[test]
    fn config_rejects_bad_input()
    {
        assert_eq!(
            StatsConfig::from_sources(&args(&["--seed"]), |_| None),
            Err(ConfigError::MissingValue("--seed"))
        );
        assert_eq!(
            StatsConfig::from_sources(&args(&["--fade-ms=soon"]), |_| None),
            Err(ConfigError::NotANumber {
                name: "--fade-ms",
                value: "soon".to_string(),
            })
        );
        assert_eq!(
            StatsConfig::from_sources(&args(&["--wpm=20"]), |_| None),
            Err(ConfigError::UnknownOption("--wpm=20".to_string()))
        );
        assert!(StatsConfig::from_sources(&[], |_| Some("lots".to_string())).is_err());
    }
}
