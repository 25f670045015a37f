//! The replicated state snapshot
//!
//! A snapshot is the whole visible game: the master sends one after every change
//! and followers replace their copy with it. Field names are fixed by the wire
//! format shared with browser peers.

use crate::core::{KeyStates, Verdict};
use crate::core::WORD_LEN;
use crate::game::board::{Grid, ROWS, Slot};
use serde::{Deserialize, Serialize};

/// Celebration timing carried alongside a winning snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiCue {
    pub duration_ms: u64,
    pub taper_ms: u64,
}

impl Default for ConfettiCue {
    fn default() -> Self {
        Self {
            duration_ms: 6000,
            taper_ms: 1500,
        }
    }
}

/// Full session state as published by the master
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Grid<Slot>,
    pub tile_states: Grid<Verdict>,
    pub key_states: KeyStates,
    pub current_row: usize,
    pub current_col: usize,
    #[serde(alias = "gameStarted")]
    pub started: bool,
    #[serde(alias = "gameOver")]
    pub over: bool,
    #[serde(default)]
    pub win: bool,
    /// Only present once the game is over
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confetti_cue: Option<ConfettiCue>,
}

impl Snapshot {
    /// Message shown on the end banner, `None` while the game is running
    #[must_use]
    pub fn outcome_text(&self) -> Option<String> {
        if !self.over {
            return None;
        }
        Some(match (&self.solution, self.win) {
            (_, true) => "YOU WIN!".to_string(),
            (Some(word), false) => format!("YOU LOSE! Word: {word}"),
            (None, false) => "GAME OVER".to_string(),
        })
    }

    /// 1-based number of the row being played, never past the last row
    #[must_use]
    pub fn row_number(&self) -> usize {
        self.current_row.min(ROWS - 1) + 1
    }

    /// Pull the cursor back onto the board
    pub fn clamp_cursor(&mut self) {
        self.current_row = self.current_row.min(ROWS);
        self.current_col = self.current_col.min(WORD_LEN);
    }

    /// Verdict for a keyboard letter
    #[must_use]
    pub fn key(&self, letter: char) -> Verdict {
        self.key_states.get(letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn blank_snapshot_wire_shape() {
        let value = serde_json::to_value(Snapshot::default()).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "board",
                "currentCol",
                "currentRow",
                "keyStates",
                "over",
                "started",
                "tileStates",
                "win"
            ]
        );
        assert_eq!(value["board"][5][4], "");
        assert_eq!(value["tileStates"][0][0], "");
        assert_eq!(value["keyStates"], json!({}));
    }

    #[test]
    fn optional_fields_appear_when_set() {
        let snapshot = Snapshot {
            over: true,
            win: true,
            solution: Some("CRANE".into()),
            confetti_cue: Some(ConfettiCue::default()),
            ..Snapshot::default()
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["solution"], "CRANE");
        assert_eq!(
            value["confettiCue"],
            json!({"durationMs": 6000, "taperMs": 1500})
        );
    }

    #[test]
    fn row_number_stays_on_the_board() {
        let mut snapshot = Snapshot {
            current_row: 2,
            ..Snapshot::default()
        };
        assert_eq!(snapshot.row_number(), 3);
        snapshot.current_row = ROWS;
        assert_eq!(snapshot.row_number(), ROWS);
        snapshot.current_row = usize::MAX;
        assert_eq!(snapshot.row_number(), ROWS);
    }

    #[test]
    fn clamp_cursor_bounds_row_and_col() {
        let mut snapshot = Snapshot {
            current_row: usize::MAX,
            current_col: 99,
            ..Snapshot::default()
        };
        snapshot.clamp_cursor();
        assert_eq!((snapshot.current_row, snapshot.current_col), (ROWS, WORD_LEN));
    }

    #[test]
    fn accepts_legacy_field_names_and_extra_fields() {
        let mut value = serde_json::to_value(Snapshot::default()).unwrap();
        let object = value.as_object_mut().unwrap();
        object.remove("started");
        object.remove("over");
        object.remove("win");
        object.insert("gameStarted".into(), json!(true));
        object.insert("gameOver".into(), json!(false));
        object.insert("timestamp".into(), json!(1_700_000_000_000_u64));

        let snapshot: Snapshot = serde_json::from_value(value).unwrap();
        assert!(snapshot.started);
        assert!(!snapshot.over);
        assert!(!snapshot.win);
    }

    #[test]
    fn rejects_wrong_grid_dimensions() {
        let mut value = serde_json::to_value(Snapshot::default()).unwrap();
        value["board"] = json!([["", "", ""]]);
        assert!(serde_json::from_value::<Snapshot>(value).is_err());
    }

    #[test]
    fn outcome_text_variants() {
        let mut snapshot = Snapshot::default();
        assert_eq!(snapshot.outcome_text(), None);

        snapshot.over = true;
        assert_eq!(snapshot.outcome_text().as_deref(), Some("GAME OVER"));

        snapshot.solution = Some("ABIDE".into());
        assert_eq!(
            snapshot.outcome_text().as_deref(),
            Some("YOU LOSE! Word: ABIDE")
        );

        snapshot.win = true;
        assert_eq!(snapshot.outcome_text().as_deref(), Some("YOU WIN!"));
    }
}
