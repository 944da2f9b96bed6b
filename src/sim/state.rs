//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::spawner::Spawner;
use crate::consts::*;
use crate::highscores::Leaderboard;
use crate::tuning::Tuning;

/// What the run-over screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverView {
    /// New high score: collecting the player's name
    EnteringName,
    /// Showing the leaderboard, waiting for restart
    ShowingBoard,
}

/// Current mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Active gameplay
    Playing,
    /// Out of lives
    GameOver(GameOverView),
}

impl GameMode {
    pub fn is_playing(&self) -> bool {
        matches!(self, GameMode::Playing)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameMode::GameOver(_))
    }

    pub fn is_entering_name(&self) -> bool {
        matches!(self, GameMode::GameOver(GameOverView::EnteringName))
    }
}

/// The player's craft
///
/// x never changes; y grows downward. The craft can't leave through the
/// ceiling, but nothing stops it sinking past the floor (that's a hit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craft {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity per tick (positive = falling)
    pub vel: f32,
    /// Half-width of the footprint
    pub size: f32,
}

impl Craft {
    /// Fresh craft at the spawn pose
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: CRAFT_X,
            y: CRAFT_START_Y,
            vel: 0.0,
            size: tuning.craft_size,
        }
    }

    /// Thrust upward
    pub fn jump(&mut self, tuning: &Tuning) {
        self.vel = tuning.jump_velocity;
    }

    /// Integrate one tick
    ///
    /// Gravity is partially cancelled while falling, so the craft floats down
    /// more gently than it decelerates on the way up.
    pub fn update(&mut self, tuning: &Tuning) {
        if self.vel > 0.0 {
            self.vel += tuning.gravity * (1.0 - tuning.anti_gravity);
        } else {
            self.vel += tuning.gravity;
        }
        self.vel = self.vel.min(tuning.terminal_velocity);

        self.y += self.vel;

        if self.y < 0.0 {
            self.y = 0.0;
            self.vel = 0.0;
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Collision footprint
    pub fn footprint(&self) -> Rect {
        Rect::centered(self.pos(), self.size)
    }

    /// Lower edge of the footprint
    pub fn bottom(&self) -> f32 {
        self.y + self.size
    }
}

/// A pair of laser beams with a gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardPair {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Where the gap starts (bottom of the top beam)
    pub gap_top: f32,
    pub gap: f32,
    /// Set once when the trailing edge crosses the craft
    pub passed: bool,
}

impl HazardPair {
    pub fn new(x: f32, gap_top: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            width: tuning.hazard_width,
            gap_top,
            gap: tuning.hazard_gap,
            passed: false,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// Right edge
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn offscreen(&self) -> bool {
        self.trailing_edge() < CULL_MARGIN
    }

    /// Upper beam: ceiling down to the gap
    pub fn top_beam(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gap_top)
    }

    /// Lower beam: end of the gap down to the floor
    pub fn bottom_beam(&self) -> Rect {
        let y = self.gap_top + self.gap;
        Rect::new(self.x, y, self.width, FIELD_HEIGHT - y)
    }

    pub fn collides(&self, footprint: &Rect) -> bool {
        footprint.intersects(&self.top_beam()) || footprint.intersects(&self.bottom_beam())
    }
}

/// A bonus coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub x: f32,
    pub y: f32,
    /// Half-width of the footprint
    pub size: f32,
    pub collected: bool,
}

impl Token {
    pub fn new(x: f32, y: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            y,
            size: tuning.token_size,
            collected: false,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.x -= speed;
    }

    pub fn offscreen(&self) -> bool {
        self.x + self.size < CULL_MARGIN
    }

    pub fn footprint(&self) -> Rect {
        Rect::centered(Vec2::new(self.x, self.y), self.size)
    }

    pub fn collides(&self, footprint: &Rect) -> bool {
        footprint.intersects(&self.footprint())
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Gameplay balance
    pub tuning: Tuning,
    /// Hazard gaps and token heights are drawn from here
    pub rng: Pcg32,
    pub craft: Craft,
    /// Active hazards (oldest first)
    pub hazards: Vec<HazardPair>,
    /// Active tokens (oldest first, never collected)
    pub tokens: Vec<Token>,
    /// Hazards passed this run
    pub obstacle_score: u32,
    /// Token points this run
    pub token_score: u32,
    pub lives: u8,
    /// Ticks of hit immunity remaining
    pub invincible_ticks: u32,
    pub mode: GameMode,
    /// Name typed so far on the high-score screen
    pub name_buffer: String,
    /// A name has been entered for this run
    pub name_submitted: bool,
    /// Score of the entry submitted this run (for highlighting)
    pub submitted_score: Option<u32>,
    pub leaderboard: Leaderboard,
    pub spawner: Spawner,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning, leaderboard: Leaderboard) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            craft: Craft::new(&tuning),
            hazards: Vec::new(),
            tokens: Vec::new(),
            obstacle_score: 0,
            token_score: 0,
            lives: tuning.starting_lives,
            invincible_ticks: 0,
            mode: GameMode::Playing,
            name_buffer: String::new(),
            name_submitted: false,
            submitted_score: None,
            leaderboard,
            spawner: Spawner::new(&tuning),
            tuning,
        }
    }

    /// Start a new run with a freshly loaded leaderboard
    ///
    /// The RNG keeps its stream so consecutive runs differ.
    pub fn reset(&mut self, leaderboard: Leaderboard) {
        let rng = self.rng.clone();
        *self = Self {
            rng,
            ..Self::new(self.seed, self.tuning.clone(), leaderboard)
        };
    }

    /// Obstacles plus token points
    pub fn total_score(&self) -> u32 {
        self.obstacle_score + self.token_score
    }

    /// Number of tokens picked up this run
    pub fn tokens_collected(&self) -> u32 {
        if self.tuning.token_value == 0 {
            0
        } else {
            self.token_score / self.tuning.token_value
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rising_tick_applies_full_gravity() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(&tuning);
        assert_eq!(craft.y, 256.0);
        craft.update(&tuning);
        assert!((craft.vel - 0.2).abs() < 1e-6);
        assert!((craft.y - 256.2).abs() < 1e-4);
    }

    #[test]
    fn test_falling_tick_applies_reduced_gravity() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(&tuning);
        craft.vel = 2.0;
        craft.update(&tuning);
        assert!((craft.vel - (2.0 + 0.2 * 0.85)).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_velocity_caps_fall() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(&tuning);
        craft.vel = 11.95;
        craft.update(&tuning);
        assert_eq!(craft.vel, 12.0);
    }

    #[test]
    fn test_ceiling_clamp_zeroes_velocity() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(&tuning);
        craft.y = 3.0;
        craft.jump(&tuning);
        craft.update(&tuning);
        assert_eq!(craft.y, 0.0);
        assert_eq!(craft.vel, 0.0);
    }

    #[test]
    fn test_craft_can_sink_below_floor() {
        let tuning = Tuning::default();
        let mut craft = Craft::new(&tuning);
        craft.y = FIELD_HEIGHT + 5.0;
        craft.vel = 12.0;
        craft.update(&tuning);
        assert!(craft.y > FIELD_HEIGHT);
    }

    #[test]
    fn test_hazard_beams_span_the_field() {
        let tuning = Tuning::default();
        let hazard = HazardPair::new(100.0, 40.0, &tuning);
        assert_eq!(hazard.top_beam(), Rect::new(100.0, 0.0, 20.0, 40.0));
        assert_eq!(hazard.bottom_beam(), Rect::new(100.0, 190.0, 20.0, 322.0));
        assert!(!hazard.passed);
    }

    #[test]
    fn test_hazard_collision() {
        let tuning = Tuning::default();
        let hazard = HazardPair::new(60.0, 200.0, &tuning);
        let in_gap = Rect::centered(Vec2::new(72.0, 275.0), 12.0);
        let in_top = Rect::centered(Vec2::new(72.0, 150.0), 12.0);
        let in_bottom = Rect::centered(Vec2::new(72.0, 400.0), 12.0);
        let clear = Rect::centered(Vec2::new(200.0, 150.0), 12.0);
        assert!(!hazard.collides(&in_gap));
        assert!(hazard.collides(&in_top));
        assert!(hazard.collides(&in_bottom));
        assert!(!hazard.collides(&clear));
    }

    #[test]
    fn test_hazard_offscreen_margin() {
        let tuning = Tuning::default();
        let mut hazard = HazardPair::new(-30.0, 100.0, &tuning);
        assert!(!hazard.offscreen());
        hazard.update(0.5);
        assert!(hazard.offscreen());
    }

    #[test]
    fn test_token_collision_and_offscreen() {
        let tuning = Tuning::default();
        let token = Token::new(80.0, 250.0, &tuning);
        let craft = Craft::new(&tuning);
        assert!(token.collides(&craft.footprint()));

        let far = Token::new(200.0, 250.0, &tuning);
        assert!(!far.collides(&craft.footprint()));

        let mut leaving = Token::new(-19.0, 100.0, &tuning);
        assert!(!leaving.offscreen());
        leaving.update(1.5);
        assert!(leaving.offscreen());
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut state = GameState::new(7, Tuning::default(), Leaderboard::new());
        state.obstacle_score = 4;
        state.token_score = 10;
        state.lives = 0;
        state.mode = GameMode::GameOver(GameOverView::ShowingBoard);
        state.name_buffer.push_str("abc");
        state.hazards.push(HazardPair::new(10.0, 50.0, &state.tuning));

        let mut board = Leaderboard::new();
        board.add_entry("X", 9);
        state.reset(board.clone());

        assert_eq!(state.mode, GameMode::Playing);
        assert_eq!(state.total_score(), 0);
        assert_eq!(state.lives, 5);
        assert!(state.hazards.is_empty());
        assert!(state.name_buffer.is_empty());
        assert_eq!(state.leaderboard, board);
        assert_eq!(state.craft, Craft::new(&state.tuning));
    }

    proptest! {
        #[test]
        fn prop_craft_never_above_ceiling(
            start_y in 0.0f32..600.0,
            start_vel in -20.0f32..20.0,
            thrusts in proptest::collection::vec(any::<bool>(), 1..200),
        ) {
            let tuning = Tuning::default();
            let mut craft = Craft::new(&tuning);
            craft.y = start_y;
            craft.vel = start_vel;
            for thrust in thrusts {
                if thrust {
                    craft.jump(&tuning);
                }
                let before = craft.clone();
                craft.update(&tuning);
                prop_assert!(craft.y >= 0.0);
                prop_assert!(craft.vel <= tuning.terminal_velocity);
                // Resting on the ceiling with motion left means it landed
                // there exactly, without needing the clamp
                if craft.y == 0.0 && craft.vel != 0.0 {
                    prop_assert_eq!(before.y + craft.vel, 0.0);
                }
            }
        }
    }
}
