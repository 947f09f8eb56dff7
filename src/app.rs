use std::time::Instant;

use crate::config::GameConfig;
use crate::random::RandomPositionGenerator;
use crate::scheduler::FrameClock;
use crate::session::{Session, Status};
use crate::term::{PixelScale, TermManager};

use anyhow::Result;
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use tracing::info;

/// Terminal front end: feeds keys and clock events into a `Session`.
pub struct App {
    term: TermManager,
    clock: FrameClock,
    session: Session,
    shown_status: Status,
}

impl App {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let scale = PixelScale { px_per_column: config.px_per_column, px_per_row: config.px_per_row };
        let mut term = TermManager::new(config.bounds().size, scale)?;

        let positions = match config.seed {
            Some(seed) => RandomPositionGenerator::from_seed(seed),
            None => RandomPositionGenerator::from_entropy(),
        };
        let session = Session::new(config, positions, &mut term);
        let clock = FrameClock::new(config.fps);

        Ok(App { term, clock, session, shown_status: Status::Ready })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()?;
        self.term.clear()?;
        self.term.draw_borders();
        self.term.flush()
    }

    /// Returns false when the player quit from the intro.
    pub fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Space to start over",
            "CTRL+C or q to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if is_quit(&self.term.read_key_blocking()?) {
            return Ok(false);
        }

        self.term.hide_message();
        self.term.flush()?;
        Ok(true)
    }

    pub fn play(&mut self) -> Result<()> {
        loop {
            let timeout = self.clock.time_until_due(Instant::now());

            for key_ev in self.term.read_key_events(timeout)? {
                match &key_ev {
                    ev if is_quit(ev) => return self.quit(),
                    KeyEvent { code: KeyCode::Char(' '), modifiers: _ } => {
                        self.session.on_reload(&mut self.term, &mut self.clock);
                    }
                    KeyEvent { code, modifiers: _ } => {
                        self.session.on_direction_input(*code, &mut self.clock);
                    }
                }
            }

            for fired in self.clock.fire_due(Instant::now()) {
                self.session.on_fired(fired, &mut self.term, &mut self.clock);
            }

            self.sync_message()?;
            self.term.flush()?;
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn quit(&mut self) -> Result<()> {
        let world = self.session.world();
        info!(score = world.score.score(), seconds_left = world.timer.second(), "player quit");
        self.term.restore()
    }

    fn sync_message(&mut self) -> Result<()> {
        let status = self.session.status();
        if status == self.shown_status {
            return Ok(());
        }
        self.shown_status = status;

        let score = format!("Score: {}", self.session.world().score.score());
        match status {
            Status::Lost => self.end_message("Game over!", &score),
            Status::TimeUp => self.end_message("Time's up!", &score),
            Status::Ready | Status::Running => {
                self.term.hide_message();
                Ok(())
            }
        }
    }

    fn end_message(&mut self, title: &str, score: &str) -> Result<()> {
        self.term.show_message(&[
            title,
            score,
            "",
            "Press Space to play again,",
            "or CTRL+C to quit."
        ])
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
        || matches!(ev, KeyEvent { code: KeyCode::Char('q'), modifiers: _ })
}
