use tracing::debug;

use crate::geometry::has_collision;
use crate::render::{self, Canvas, Hud};
use crate::scheduler::{Scheduler, TickHandle};
use crate::snake::Direction;
use crate::world::World;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Loss {
    BitTail,
    OutOfBounds,
}

/// What one tick did to the round.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub moved: bool,
    pub ate: bool,
    pub loss: Option<Loss>,
}

/// Drives the snake one frame at a time in a single direction.
///
/// Only one frame request is live at any time: `run` cancels the previous
/// one before asking for a new frame.
#[derive(Default)]
pub struct GameLoop {
    direction: Option<Direction>,
    active: Option<TickHandle>,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn run<S: Scheduler + ?Sized>(&mut self, direction: Direction, scheduler: &mut S) {
        self.stop(scheduler);
        self.direction = Some(direction);
        self.active = Some(scheduler.request_tick());
        debug!(?direction, "game loop running");
    }

    pub fn stop<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.active.take() {
            scheduler.cancel_tick(handle);
        }
        self.direction = None;
    }

    /// Runs a tick for the active frame and books the next one.
    /// Frames from cancelled or superseded requests are dropped.
    pub fn on_frame<D, S>(
        &mut self,
        handle: TickHandle,
        world: &mut World,
        display: &mut D,
        scheduler: &mut S,
    ) -> Option<TickReport>
    where
        D: Canvas + Hud + ?Sized,
        S: Scheduler + ?Sized,
    {
        if self.active != Some(handle) {
            return None;
        }
        let direction = self.direction?;

        let report = tick(direction, world, display, scheduler);
        self.active = Some(scheduler.request_tick());
        Some(report)
    }
}

fn tick<D, S>(direction: Direction, world: &mut World, display: &mut D, scheduler: &mut S) -> TickReport
where
    D: Canvas + Hud + ?Sized,
    S: Scheduler + ?Sized,
{
    let mut report = TickReport::default();
    let was_playing = world.score.is_playing() && world.timer.is_playing();

    render::clear_snake(display, &mut world.snake);

    if was_playing {
        world.snake.move_step(direction);
        let head = world.snake.head();
        world.snake.record_position(head);
        report.moved = true;
    }

    if has_collision(&world.snake, &world.food) {
        world.snake.set_eat();
        world.score.add_score();
        world.score.render(display);
        render::clear_entity(display, &world.food);
        world.relocate_food();
        render::draw_food(display, &world.food);
        report.ate = true;
    }

    if world.snake.eat() > 1 && world.snake_bites_tail() {
        world.score.stop();
        world.timer.stop(scheduler);
        report.loss = Some(Loss::BitTail);
    }

    if !world.snake_in_bounds() {
        world.timer.stop(scheduler);
        world.score.stop();
        report.loss.get_or_insert(Loss::OutOfBounds);
    }

    render::draw_food(display, &world.food);
    render::draw_snake(display, &mut world.snake);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{test_config, ManualScheduler, RecordingCanvas};
    use crate::geometry::{Collidable, Position};
    use crate::random::RandomPositionGenerator;
    use crate::scheduler::Fired;
    use crate::snake::Direction::*;

    struct Rig {
        world: World,
        game: GameLoop,
        canvas: RecordingCanvas,
        sched: ManualScheduler,
    }

    impl Rig {
        fn new() -> Self {
            let world = World::new(&test_config(), RandomPositionGenerator::from_seed(2));
            Rig { world, game: GameLoop::new(), canvas: RecordingCanvas::default(), sched: ManualScheduler::default() }
        }

        fn place(&mut self, head: Position, food: Position) {
            self.world.snake.reload(head);
            self.world.food.relocate(food);
        }

        fn frames(&mut self, n: usize) -> Vec<TickReport> {
            let mut reports = vec![];
            for _ in 0..n {
                for fired in self.sched.next_frame() {
                    if let Fired::Frame(handle) = fired {
                        let report =
                            self.game.on_frame(handle, &mut self.world, &mut self.canvas, &mut self.sched);
                        reports.extend(report);
                    }
                }
            }
            reports
        }
    }

    #[test]
    fn ten_ticks_right_moves_thirty_pixels() {
        let mut rig = Rig::new();
        rig.place(Position::new(100, 100), Position::new(400, 400));
        rig.world.timer.run(&mut rig.sched);
        rig.game.run(Right, &mut rig.sched);

        let reports = rig.frames(10);

        assert_eq!(reports.len(), 10);
        assert_eq!(rig.world.snake.head(), Position::new(130, 100));
        assert_eq!(rig.world.score.score(), 0);
        assert!(rig.world.score.is_playing());
        assert!(rig.world.timer.is_playing());
        assert!(rig.world.timer.is_running());
        assert!(reports.iter().all(|r| r.moved && r.loss.is_none()));
    }

    #[test]
    fn leaving_the_canvas_loses_with_a_final_redraw() {
        let mut rig = Rig::new();
        rig.place(Position::new(495, 100), Position::new(100, 400));
        rig.world.timer.run(&mut rig.sched);
        rig.game.run(Right, &mut rig.sched);

        let reports = rig.frames(1);

        assert_eq!(reports[0].loss, Some(Loss::OutOfBounds));
        assert!(!rig.world.snake_in_bounds());
        assert!(!rig.world.score.is_playing());
        assert!(!rig.world.timer.is_running());
        let snake_color = rig.world.snake.style().color;
        assert_eq!(rig.canvas.draws_in(snake_color), vec![Position::new(498, 100)]);
    }

    #[test]
    fn frozen_after_a_loss() {
        let mut rig = Rig::new();
        rig.place(Position::new(495, 100), Position::new(100, 400));
        rig.game.run(Right, &mut rig.sched);
        rig.frames(1);

        let reports = rig.frames(3);

        assert!(reports.iter().all(|r| !r.moved));
        assert_eq!(rig.world.snake.head(), Position::new(498, 100));
    }

    #[test]
    fn eating_grows_scores_and_moves_the_food() {
        let mut rig = Rig::new();
        rig.place(Position::new(100, 100), Position::new(112, 100));
        rig.game.run(Right, &mut rig.sched);

        let reports = rig.frames(1);

        assert!(reports[0].ate);
        assert_eq!(rig.world.snake.eat(), 1);
        assert_eq!(rig.world.score.score(), 1);
        assert_eq!(rig.canvas.score_text.as_deref(), Some("1"));
        assert!(!rig.world.food_touches_snake());
        assert_ne!(rig.world.food.position(), Position::new(112, 100));
    }

    fn rig_with_history(target: usize) -> Rig {
        // After one tick to the right the head lands on (203, 200) and the
        // history shifts by one, so `newest_first[3]` becomes tail[0] and
        // `newest_first[7]` becomes tail[1].
        let mut rig = Rig::new();
        rig.place(Position::new(200, 200), Position::new(400, 400));
        let mut newest_first = vec![Position::new(60, 60); 9];
        newest_first[target] = Position::new(203, 200);
        for position in newest_first.iter().rev() {
            rig.world.snake.record_position(*position);
        }
        rig.world.snake.set_eat();
        rig.world.snake.set_eat();
        rig.game.run(Right, &mut rig.sched);
        rig
    }

    #[test]
    fn running_into_the_tail_loses() {
        let mut rig = rig_with_history(7);
        rig.world.timer.run(&mut rig.sched);

        let reports = rig.frames(1);

        assert_eq!(reports[0].loss, Some(Loss::BitTail));
        assert!(!rig.world.score.is_playing());
        assert!(!rig.world.timer.is_running());
    }

    #[test]
    fn segment_next_to_the_head_is_harmless() {
        let mut rig = rig_with_history(3);

        let reports = rig.frames(1);

        assert_eq!(reports[0].loss, None);
        assert!(rig.world.score.is_playing());
    }

    #[test]
    fn direction_change_keeps_a_single_frame_request() {
        let mut rig = Rig::new();
        rig.place(Position::new(100, 100), Position::new(400, 400));
        rig.game.run(Right, &mut rig.sched);
        rig.game.run(Down, &mut rig.sched);
        rig.game.run(Left, &mut rig.sched);

        assert_eq!(rig.sched.frames.len(), 1);
        let reports = rig.frames(4);
        assert_eq!(reports.len(), 4);
        assert_eq!(rig.world.snake.head(), Position::new(88, 100));
    }

    #[test]
    fn stale_frames_are_ignored() {
        let mut rig = Rig::new();
        rig.place(Position::new(100, 100), Position::new(400, 400));
        rig.game.run(Right, &mut rig.sched);
        let stale = rig.sched.frames[0];
        rig.game.stop(&mut rig.sched);
        rig.game.stop(&mut rig.sched);

        let report = rig.game.on_frame(stale, &mut rig.world, &mut rig.canvas, &mut rig.sched);

        assert!(report.is_none());
        assert!(!rig.game.is_running());
        assert_eq!(rig.world.snake.head(), Position::new(100, 100));
    }

    #[test]
    fn clears_before_moving() {
        let mut rig = Rig::new();
        rig.place(Position::new(100, 100), Position::new(400, 400));
        rig.game.run(Down, &mut rig.sched);

        rig.frames(1);

        assert_eq!(rig.canvas.clears[0].0, Position::new(100, 100));
        let snake_color = rig.world.snake.style().color;
        assert_eq!(rig.canvas.draws_in(snake_color), vec![Position::new(100, 103)]);
    }
}
