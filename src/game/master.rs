//! Master controller
//!
//! Owns the only writable [`Session`] and republishes the full snapshot after every
//! input that changed it.

use super::session::{Phase, Session};
use crate::sync::{ConfettiCue, Publish, Snapshot};
use tracing::{debug, info};

/// A single master-side action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Set the answer from free text
    Start(String),
    Letter(char),
    Delete,
    Submit,
    /// Clear the board, keep the answer
    Reset,
    /// Clear everything and go back to idle
    Restart,
}

impl Input {
    /// Map an on-screen key label (`ENTER`, `DEL` or a letter) to an input
    #[must_use]
    pub fn from_key_label(label: &str) -> Option<Self> {
        match label {
            "ENTER" => Some(Self::Submit),
            "DEL" => Some(Self::Delete),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if ch.is_ascii_alphabetic() => Some(Self::Letter(ch)),
                    _ => None,
                }
            }
        }
    }
}

pub struct Master<P> {
    session: Session,
    publisher: P,
    cue: ConfettiCue,
    published: u64,
}

impl<P: Publish> Master<P> {
    pub fn new(publisher: P, cue: ConfettiCue) -> Self {
        Self {
            session: Session::new(),
            publisher,
            cue,
            published: 0,
        }
    }

    /// Apply one input; publishes and returns `true` when the session changed
    pub fn apply(&mut self, input: Input) -> bool {
        let changed = match input {
            Input::Start(ref text) => self.session.start(text),
            Input::Letter(ch) => self.session.type_letter(ch),
            Input::Delete => self.session.delete(),
            Input::Submit => self.session.submit().is_some(),
            Input::Reset => self.session.reset(),
            Input::Restart => self.session.restart(),
        };

        if changed {
            if let Phase::Over { win } = self.session.phase() {
                info!(win, "game over");
            }
            self.publish();
        } else {
            debug!(?input, "input left session unchanged");
        }
        changed
    }

    /// Publish the current snapshot unconditionally
    pub fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.publisher.publish(&snapshot);
        self.published += 1;
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot(self.cue)
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Number of snapshots handed to the publisher so far
    #[must_use]
    pub const fn published(&self) -> u64 {
        self.published
    }

    pub const fn publisher(&self) -> &P {
        &self.publisher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Snapshot>>);

    impl Publish for Recorder {
        fn publish(&self, snapshot: &Snapshot) {
            self.0.lock().unwrap().push(snapshot.clone());
        }
    }

    impl Recorder {
        fn taken(&self) -> Vec<Snapshot> {
            self.0.lock().unwrap().clone()
        }
    }

    fn master() -> Master<Recorder> {
        Master::new(Recorder::default(), ConfettiCue::default())
    }

    fn guess(master: &mut Master<Recorder>, word: &str) {
        for ch in word.chars() {
            master.apply(Input::Letter(ch));
        }
        master.apply(Input::Submit);
    }

    #[test]
    fn every_mutation_publishes_a_full_snapshot() {
        let mut m = master();
        assert!(m.apply(Input::Start("crane".into())));
        assert!(m.apply(Input::Letter('S')));
        assert!(m.apply(Input::Delete));

        let published = m.publisher().taken();
        assert_eq!(published.len(), 3);
        assert!(published[0].started);
        assert_eq!(published[1].current_col, 1);
        assert_eq!(published[2].current_col, 0);
        assert_eq!(m.published(), 3);
    }

    #[test]
    fn no_op_inputs_publish_nothing() {
        let mut m = master();
        assert!(!m.apply(Input::Start("four".into())));
        assert!(!m.apply(Input::Letter('A')));
        assert!(!m.apply(Input::Submit));
        assert!(m.publisher().taken().is_empty());

        m.apply(Input::Start("crane".into()));
        assert!(!m.apply(Input::Delete));
        assert!(!m.apply(Input::Submit));
        assert_eq!(m.publisher().taken().len(), 1);
    }

    #[test]
    fn solution_only_published_after_game_ends() {
        let mut m = master();
        m.apply(Input::Start("abide".into()));
        for _ in 0..6 {
            guess(&mut m, "speed");
        }

        let published = m.publisher().taken();
        let (last, earlier) = published.split_last().unwrap();
        assert!(earlier.iter().all(|s| s.solution.is_none() && !s.over));
        assert!(last.over);
        assert!(!last.win);
        assert_eq!(last.solution.as_deref(), Some("ABIDE"));
    }

    #[test]
    fn winning_snapshot_carries_confetti_cue() {
        let mut m = master();
        m.apply(Input::Start("crane".into()));
        guess(&mut m, "crane");

        let last = m.publisher().taken().pop().unwrap();
        assert!(last.win);
        assert_eq!(last.confetti_cue, Some(ConfettiCue::default()));
    }

    #[test]
    fn reset_and_restart_publish() {
        let mut m = master();
        m.apply(Input::Start("crane".into()));
        m.apply(Input::Letter('C'));
        assert!(m.apply(Input::Reset));
        assert!(m.apply(Input::Restart));

        let published = m.publisher().taken();
        let reset = &published[2];
        assert!(reset.started);
        assert_eq!(reset.current_col, 0);
        let restart = &published[3];
        assert!(!restart.started);
    }

    #[test]
    fn key_labels_map_to_inputs() {
        assert_eq!(Input::from_key_label("ENTER"), Some(Input::Submit));
        assert_eq!(Input::from_key_label("DEL"), Some(Input::Delete));
        assert_eq!(Input::from_key_label("Q"), Some(Input::Letter('Q')));
        assert_eq!(Input::from_key_label("QQ"), None);
        assert_eq!(Input::from_key_label("1"), None);
    }
}
