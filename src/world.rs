use tracing::debug;

use crate::config::GameConfig;
use crate::food::Food;
use crate::geometry::{has_collision, in_bounds, Bounds, Rect};
use crate::random::RandomPositionGenerator;
use crate::render::Hud;
use crate::scheduler::Scheduler;
use crate::score::ScoreKeeper;
use crate::snake::Snake;
use crate::timer::RoundTimer;

/// Everything a round mutates, built bounds first.
pub struct World {
    pub bounds: Bounds,
    pub snake: Snake,
    pub food: Food,
    pub score: ScoreKeeper,
    pub timer: RoundTimer,
    positions: RandomPositionGenerator,
}

impl World {
    pub fn new(config: &GameConfig, mut positions: RandomPositionGenerator) -> Self {
        let bounds = config.bounds();
        let snake_style = config.snake_style();
        let head = positions.strictly_inside(&bounds, snake_style.size);

        let mut world = World {
            bounds,
            snake: Snake::new(head, snake_style, config.speed),
            food: Food::new(bounds.origin, config.food_style()),
            score: ScoreKeeper::new(config.score_step),
            timer: RoundTimer::new(config.round_seconds),
            positions,
        };
        world.relocate_food();
        world
    }

    /// Moves the food somewhere off the snake's head and tail.
    pub fn relocate_food(&mut self) {
        let mut rerolls = 0u32;
        loop {
            let position = self.positions.anywhere(&self.bounds, self.food.style().size);
            self.food.relocate(position);
            if !self.food_touches_snake() {
                break;
            }
            rerolls += 1;
        }

        if rerolls > 0 {
            debug!(rerolls, "food landed on the snake, re-rolled");
        }
    }

    pub fn food_touches_snake(&mut self) -> bool {
        let food = Rect::of(&self.food);
        if has_collision(&food, &self.snake) {
            return true;
        }
        self.snake.tail().any(|segment| has_collision(&food, &segment))
    }

    /// Head against the tail, skipping the segment right behind the head.
    /// Segments still parked on the short-history fallback never bite.
    pub fn snake_bites_tail(&mut self) -> bool {
        let head = Rect::of(&self.snake);
        let recorded = self.snake.recorded_segments();
        self.snake.tail().take(recorded).skip(1).any(|segment| has_collision(&head, &segment))
    }

    pub fn snake_in_bounds(&self) -> bool {
        in_bounds(&self.snake, &self.bounds)
    }

    /// Fresh snake and food, zeroed score, full timer.
    pub fn reload<H, S>(&mut self, hud: &mut H, scheduler: &mut S)
    where
        H: Hud + ?Sized,
        S: Scheduler + ?Sized,
    {
        let head = self.positions.strictly_inside(&self.bounds, self.snake.style().size);
        self.snake.reload(head);
        self.relocate_food();
        self.score.reload(hud);
        self.timer.reload(hud, scheduler);
    }
}
