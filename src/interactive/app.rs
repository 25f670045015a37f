//! TUI application state and logic

use super::confetti::Confetti;
use crate::config::Role;
use crate::game::{Follower, Input, Master, Phase};
use crate::sync::{Envelope, Publish, Snapshot, Subscription};
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use std::borrow::Cow;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Two resets closer together than this restart the session
const DOUBLE_RESET_WINDOW: Duration = Duration::from_secs(1);
const FRAME: Duration = Duration::from_millis(33);
const MAX_MESSAGES: usize = 5;

/// Which side of the channel this terminal is sitting on
pub enum Seat {
    Master(Master<Box<dyn Publish>>),
    Follower(Follower),
}

/// Application state
pub struct App {
    pub seat: Seat,
    /// Answer being typed on the start prompt
    pub answer_input: String,
    pub messages: Vec<Message>,
    /// Connection summary shown in the status bar
    pub link: String,
    pub confetti: Option<Confetti>,
    pub should_quit: bool,
    celebrated: bool,
    last_reset: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Error,
}

impl App {
    #[must_use]
    pub fn master(master: Master<Box<dyn Publish>>, link: impl Into<String>) -> Self {
        let mut app = Self::with_seat(Seat::Master(master), link.into());
        app.add_message("Type the secret word and press Enter", MessageStyle::Info);
        app
    }

    #[must_use]
    pub fn follower(follower: Follower, link: impl Into<String>) -> Self {
        let mut app = Self::with_seat(Seat::Follower(follower), link.into());
        app.add_message("Following the master's board", MessageStyle::Info);
        app
    }

    fn with_seat(seat: Seat, link: String) -> Self {
        Self {
            seat,
            answer_input: String::new(),
            messages: Vec::new(),
            link,
            confetti: None,
            should_quit: false,
            celebrated: false,
            last_reset: None,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        match self.seat {
            Seat::Master(_) => Role::Master,
            Seat::Follower(_) => Role::Follower,
        }
    }

    /// The state to draw
    #[must_use]
    pub fn view(&self) -> Cow<'_, Snapshot> {
        match &self.seat {
            Seat::Master(master) => Cow::Owned(master.snapshot()),
            Seat::Follower(follower) => Cow::Borrowed(follower.view()),
        }
    }

    /// Master's phase; followers have none
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match &self.seat {
            Seat::Master(master) => Some(master.session().phase()),
            Seat::Follower(_) => None,
        }
    }

    pub fn add_message(&mut self, text: &str, style: MessageStyle) {
        self.messages.push(Message {
            text: text.to_string(),
            style,
        });

        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        let Some(phase) = self.phase() else {
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        };

        let input = match (phase, key.code) {
            (_, KeyCode::Char('r')) if ctrl => Some(self.reset_input(now)),
            (_, KeyCode::Char('n')) if ctrl => Some(Input::Restart),
            (Phase::Idle, KeyCode::Char(c)) if !c.is_control() => {
                self.answer_input.push(c);
                None
            }
            (Phase::Idle, KeyCode::Backspace) => {
                self.answer_input.pop();
                None
            }
            (Phase::Idle, KeyCode::Enter) => Some(Input::Start(self.answer_input.clone())),
            (Phase::Active, KeyCode::Char(c)) if c.is_ascii_alphabetic() => Some(Input::Letter(c)),
            (Phase::Active, KeyCode::Backspace) => Some(Input::Delete),
            (Phase::Active, KeyCode::Enter) => Some(Input::Submit),
            (Phase::Over { .. }, KeyCode::Enter) => Some(Input::Restart),
            _ => None,
        };

        if let Some(input) = input {
            self.apply(input, now);
        }
    }

    fn reset_input(&mut self, now: Instant) -> Input {
        let double = self
            .last_reset
            .is_some_and(|at| now.duration_since(at) < DOUBLE_RESET_WINDOW);
        if double {
            self.last_reset = None;
            Input::Restart
        } else {
            self.last_reset = Some(now);
            Input::Reset
        }
    }

    fn apply(&mut self, input: Input, now: Instant) {
        let Seat::Master(master) = &mut self.seat else {
            return;
        };
        let changed = master.apply(input.clone());

        match (&input, changed) {
            (Input::Start(_), true) => {
                self.answer_input.clear();
                self.add_message("Game started, guess away", MessageStyle::Info);
            }
            (Input::Start(_), false) => {
                self.add_message("The secret word must be 5 letters", MessageStyle::Error);
            }
            (Input::Reset, true) => self.add_message("Board reset", MessageStyle::Info),
            (Input::Restart, true) => {
                self.answer_input.clear();
                self.add_message("New game, enter a secret word", MessageStyle::Info);
            }
            _ => {}
        }
        debug!(?input, changed, "master input");

        self.after_change(now);
    }

    /// Apply a message from the subscription
    pub fn handle_remote(&mut self, envelope: &Envelope, now: Instant) {
        let Seat::Follower(follower) = &mut self.seat else {
            return;
        };
        if follower.receive(envelope) {
            self.after_change(now);
        }
    }

    /// The subscription ended
    pub fn disconnected(&mut self) {
        info!("subscription closed");
        self.link = "disconnected".to_string();
        self.add_message("Lost connection to the relay", MessageStyle::Error);
    }

    fn after_change(&mut self, now: Instant) {
        let view = self.view().into_owned();
        if !view.win {
            self.celebrated = false;
            self.confetti = None;
        } else if !self.celebrated {
            self.celebrated = true;
            if let Some(cue) = view.confetti_cue {
                self.confetti = Some(Confetti::new(cue, now, &mut rand::rng()));
            }
        }

        if view.over
            && let Some(text) = view.outcome_text()
        {
            let style = if view.win {
                MessageStyle::Success
            } else {
                MessageStyle::Error
            };
            if self.messages.last().is_none_or(|m| m.text != text) {
                self.add_message(&text, style);
            }
        }
    }

    /// Advance animations by one frame
    pub fn tick(&mut self, now: Instant) {
        if let Some(confetti) = &mut self.confetti {
            if confetti.is_done(now) {
                self.confetti = None;
            } else {
                confetti.step();
            }
        }
    }
}

/// Run the TUI application
///
/// Key presses, incoming snapshots and the frame timer are multiplexed on one
/// task. A `None` subscription means nothing arrives from the network.
///
/// # Errors
///
/// Returns an error if drawing to the terminal fails.
pub async fn run_tui(mut app: App, mut subscription: Option<Subscription>) -> Result<()> {
    let mut terminal = ratatui::init();

    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        default_panic(info);
    }));

    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME);

    let result = loop {
        let mut closed = false;
        tokio::select! {
            remote = next_remote(&mut subscription) => match remote {
                Some(envelope) => app.handle_remote(&envelope, Instant::now()),
                None => closed = true,
            },
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(e.into()),
                None => break Ok(()),
            },
            _ = frames.tick() => {
                app.tick(Instant::now());
                if let Err(e) = terminal.draw(|f| super::rendering::ui(f, &app)) {
                    break Err(e.into());
                }
            }
        }

        if closed {
            subscription = None;
            app.disconnected();
        }
        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();
    result
}

async fn next_remote(subscription: &mut Option<Subscription>) -> Option<Envelope> {
    match subscription {
        Some(sub) => sub.next().await,
        None => std::future::pending().await,
    }
}
