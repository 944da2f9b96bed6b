//! HUD and overlay text shared by the DOM and terminal front-ends

use crate::highscores::Leaderboard;
use crate::sim::{GameMode, GameOverView, Snapshot};

pub const HIGH_SCORE_BANNER: &str = "NEW HIGH SCORE!";
pub const NAME_PROMPT: &str = "Enter your name:";
pub const SUBMIT_HINT: &str = "Press ENTER to submit";
pub const BOARD_TITLE: &str = "LEADERBOARD";
pub const RESTART_HINT: &str = "GAME OVER - Press SPACE to restart";

/// Names are cut to this many chars on the board
const BOARD_NAME_WIDTH: usize = 10;

/// One formatted leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub text: String,
    /// Entry carries the score submitted this run
    pub highlighted: bool,
}

/// Top-of-screen counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLines {
    pub lives: String,
    pub score: String,
    pub coins: String,
}

impl HudLines {
    pub fn from_snapshot(snapshot: &Snapshot<'_>) -> Self {
        Self {
            lives: format!("Lives: {}", snapshot.lives),
            score: format!("Score: {}", snapshot.total_score),
            coins: format!("Coins: {}", snapshot.tokens_collected),
        }
    }
}

/// The name being typed, with a cursor
pub fn name_field(buffer: &str) -> String {
    format!("{buffer}_")
}

/// Rows like `1. ALICE        50`, highlighting every row equal to `highlight`
pub fn board_rows(board: &Leaderboard, highlight: Option<u32>) -> Vec<BoardRow> {
    board
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let name: String = entry.name.chars().take(BOARD_NAME_WIDTH).collect();
            BoardRow {
                text: format!("{}. {:<10} {:>4}", i + 1, name, entry.score),
                highlighted: highlight == Some(entry.score),
            }
        })
        .collect()
}

/// Which overlay, if any, sits over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    NameEntry,
    Board,
}

impl From<GameMode> for Overlay {
    fn from(mode: GameMode) -> Self {
        match mode {
            GameMode::Playing => Overlay::None,
            GameMode::GameOver(GameOverView::EnteringName) => Overlay::NameEntry,
            GameMode::GameOver(GameOverView::ShowingBoard) => Overlay::Board,
        }
    }
}
