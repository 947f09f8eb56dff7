use crossterm::event::KeyCode;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::game::GameLoop;
use crate::input::InputRouter;
use crate::random::RandomPositionGenerator;
use crate::render::{self, Canvas, Hud};
use crate::scheduler::{Fired, Scheduler};
use crate::world::World;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// Waiting for the first direction key.
    Ready,
    Running,
    Lost,
    TimeUp,
}

/// One live game: owns the world, the loop and the input router.
pub struct Session {
    world: World,
    game_loop: GameLoop,
    input: InputRouter,
}

impl Session {
    pub fn new<D: Canvas + Hud + ?Sized>(
        config: &GameConfig,
        positions: RandomPositionGenerator,
        display: &mut D,
    ) -> Self {
        let mut world = World::new(config, positions);
        world.score.render(display);
        world.timer.render(display);
        render::draw_snake(display, &mut world.snake);
        render::draw_food(display, &world.food);

        info!(bounds = ?world.bounds, head = ?world.snake.head(), "session started");
        Session { world, game_loop: GameLoop::new(), input: InputRouter::new() }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn status(&self) -> Status {
        if !self.world.score.is_playing() {
            Status::Lost
        } else if !self.world.timer.is_playing() {
            Status::TimeUp
        } else if self.game_loop.is_running() {
            Status::Running
        } else {
            Status::Ready
        }
    }

    pub fn on_direction_input<S: Scheduler + ?Sized>(&mut self, code: KeyCode, scheduler: &mut S) -> bool {
        self.input.on_direction_input(code, &mut self.game_loop, &mut self.world.timer, scheduler)
    }

    /// Stops the loop and puts everything back to a fresh round.
    pub fn on_reload<D, S>(&mut self, display: &mut D, scheduler: &mut S)
    where
        D: Canvas + Hud + ?Sized,
        S: Scheduler + ?Sized,
    {
        self.input.reload(&mut self.game_loop, scheduler);

        render::clear_snake(display, &mut self.world.snake);
        render::clear_entity(display, &self.world.food);

        let final_score = self.world.score.score();
        self.world.reload(display, scheduler);

        render::draw_snake(display, &mut self.world.snake);
        render::draw_food(display, &self.world.food);

        info!(final_score, head = ?self.world.snake.head(), "session reloaded");
    }

    pub fn on_fired<D, S>(&mut self, fired: Fired, display: &mut D, scheduler: &mut S)
    where
        D: Canvas + Hud + ?Sized,
        S: Scheduler + ?Sized,
    {
        match fired {
            Fired::Frame(handle) => {
                let Some(report) = self.game_loop.on_frame(handle, &mut self.world, display, scheduler) else {
                    return;
                };
                let world = &self.world;
                if report.ate {
                    debug!(eat = world.snake.eat(), score = world.score.score(), "food eaten");
                }
                // Only the first losing frame still moved the snake
                if let (true, Some(cause)) = (report.moved, report.loss) {
                    info!(?cause, score = world.score.score(), head = ?world.snake.head(), "round lost");
                }
            }
            Fired::Interval(handle) => self.world.timer.on_interval(handle, display, scheduler),
        }
    }
}
