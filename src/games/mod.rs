pub mod stats;

pub const STAT_CHALLENGE_ID: &str = "stat-challenge";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameDescriptor
{
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Relative path of the menu icon.
    pub icon: &'static str,
    /// `None` means any number of players.
    pub max_players: Option<u8>,
}

impl GameDescriptor
{
    pub fn players_label(&self) -> String
    {
        match self.max_players {
            Some(max) => format!("up to {max}"),
            None => "any".to_string(),
        }
    }

    pub fn is_playable(&self) -> bool
    {
        self.id == STAT_CHALLENGE_ID
    }
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![
        GameDescriptor {
            id: "coin-toss",
            name: "Coin Toss",
            description: "Quick and simple",
            icon: "assets/coin_icon.png",
            max_players: Some(2),
        },
        GameDescriptor {
            id: "spin-the-wheel",
            name: "Spin the Wheel",
            description: "Use the + and - buttons to adjust the number of players",
            icon: "assets/wheel_icon.png",
            max_players: Some(6),
        },
        GameDescriptor {
            id: "dice-roll",
            name: "dice",
            description: "",
            icon: "assets/dice_icon.png",
            max_players: Some(2),
        },
        GameDescriptor {
            id: "reaction-test",
            name: "Reaction Test",
            description: "When the blue buttons turns green, click as fast as you can. \
                          If you click early, you will lose immediately.",
            icon: "assets/bolt_icon.webp",
            max_players: Some(2),
        },
        GameDescriptor {
            id: "click-test",
            name: "Clicking Test",
            description: "Click the button as many times as you can before the timer runs out",
            icon: "assets/cursor_icon.webp",
            max_players: Some(2),
        },
        GameDescriptor {
            id: STAT_CHALLENGE_ID,
            name: "Stats Challenge",
            description: "Click the button to generate a random question. \
                          Whoever has the highest stats wins!",
            icon: "assets/stats_icon.png",
            max_players: None,
        },
        GameDescriptor {
            id: "balloon-pop",
            name: "Balloon Pop",
            description: "Take turns to pump the balloon until it pops",
            icon: "assets/balloon_icon.png",
            max_players: None,
        },
        GameDescriptor {
            id: "pen14",
            name: "Pen14",
            description: "In a public space, choose a word, take turns to say the word with \
                          increasing volume, first one who chickens out loses",
            icon: "assets/pen_icon.png",
            max_players: None,
        },
        GameDescriptor {
            id: "typing-test",
            name: "Typing Test",
            description: "Type as many words as you can within the time limit",
            icon: "assets/keyboard_icon.png",
            max_players: None,
        },
    ]
}

pub fn find(id: &str) -> Option<GameDescriptor>
{
    registry()
        .into_iter()
        .find(|game| game.id.eq_ignore_ascii_case(id))
}
