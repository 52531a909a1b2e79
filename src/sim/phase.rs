//! Session phases and the commands that move between them
//!
//! The transition table is total: any command that is not valid for the
//! current phase is ignored rather than rejected.

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen, waiting for resume
    Paused,
    /// Run ended, score finalized
    GameOver,
}

/// Player/UI commands routed to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Pause,
    Resume,
    /// Single-key pause (the `P` key in every mini-game)
    TogglePause,
    Restart,
    Menu,
}

impl Command {
    /// Parse a command name sent by the page (`"start"`, `"toggle-pause"`, ...)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "toggle-pause" | "p" => Some(Command::TogglePause),
            "restart" => Some(Command::Restart),
            "menu" => Some(Command::Menu),
            _ => None,
        }
    }
}

impl SessionPhase {
    /// Phase reached by applying `command`, or `None` when the command does
    /// not apply here. `Pause` while already paused maps to `Paused` again.
    pub fn apply(self, command: Command) -> Option<SessionPhase> {
        use Command as C;
        use SessionPhase as P;

        match (self, command) {
            (P::Menu, C::Start) => Some(P::Playing),
            (P::Playing, C::Pause | C::TogglePause) => Some(P::Paused),
            (P::Paused, C::Pause) => Some(P::Paused),
            (P::Paused, C::Resume | C::TogglePause) => Some(P::Playing),
            (P::GameOver, C::Restart) => Some(P::Playing),
            (P::GameOver, C::Menu) => Some(P::Menu),
            _ => None,
        }
    }

    /// Whether the per-tick simulation runs in this phase
    pub fn simulates(self) -> bool {
        self == SessionPhase::Playing
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Menu => "menu",
            SessionPhase::Playing => "playing",
            SessionPhase::Paused => "paused",
            SessionPhase::GameOver => "game-over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let phase = SessionPhase::default();
        assert_eq!(phase, SessionPhase::Menu);
        let phase = phase.apply(Command::Start).unwrap();
        assert_eq!(phase, SessionPhase::Playing);
        let phase = phase.apply(Command::Pause).unwrap();
        assert_eq!(phase, SessionPhase::Paused);
        let phase = phase.apply(Command::Resume).unwrap();
        assert_eq!(phase, SessionPhase::Playing);
    }

    #[test]
    fn test_invalid_commands_ignored() {
        assert_eq!(SessionPhase::Menu.apply(Command::Resume), None);
        assert_eq!(SessionPhase::Menu.apply(Command::Pause), None);
        assert_eq!(SessionPhase::Menu.apply(Command::Restart), None);
        assert_eq!(SessionPhase::Playing.apply(Command::Start), None);
        assert_eq!(SessionPhase::Playing.apply(Command::Resume), None);
        assert_eq!(SessionPhase::GameOver.apply(Command::Pause), None);
        assert_eq!(SessionPhase::GameOver.apply(Command::Resume), None);
    }

    #[test]
    fn test_pause_idempotent() {
        let paused = SessionPhase::Playing.apply(Command::Pause).unwrap();
        assert_eq!(paused.apply(Command::Pause), Some(SessionPhase::Paused));
    }

    #[test]
    fn test_toggle() {
        let paused = SessionPhase::Playing.apply(Command::TogglePause).unwrap();
        assert_eq!(paused, SessionPhase::Paused);
        assert_eq!(paused.apply(Command::TogglePause), Some(SessionPhase::Playing));
    }

    #[test]
    fn test_game_over_exits() {
        assert_eq!(SessionPhase::GameOver.apply(Command::Restart), Some(SessionPhase::Playing));
        assert_eq!(SessionPhase::GameOver.apply(Command::Menu), Some(SessionPhase::Menu));
    }

    #[test]
    fn test_parse_command_names() {
        assert_eq!(Command::parse("Start"), Some(Command::Start));
        assert_eq!(Command::parse(" p "), Some(Command::TogglePause));
        assert_eq!(Command::parse("toggle-pause"), Some(Command::TogglePause));
        assert_eq!(Command::parse("quit"), None);
    }

    #[test]
    fn test_only_playing_simulates() {
        assert!(SessionPhase::Playing.simulates());
        assert!(!SessionPhase::Paused.simulates());
        assert!(!SessionPhase::Menu.simulates());
        assert!(!SessionPhase::GameOver.simulates());
    }
}
