use crossterm::style::Color;

use crate::food::Food;
use crate::geometry::{Collidable, Position, Size};
use crate::snake::Snake;

pub trait Canvas {
    fn draw_rect(&mut self, position: Position, size: Size, color: Color);
    fn clear_rect(&mut self, position: Position, size: Size);
}

pub trait Hud {
    fn show_score(&mut self, text: &str);
    fn show_time(&mut self, seconds: u32, percentage: &str);
}

pub fn draw_entity<C, E>(canvas: &mut C, entity: &E, color: Color)
where
    C: Canvas + ?Sized,
    E: Collidable + ?Sized,
{
    canvas.draw_rect(entity.position(), entity.size(), color);
}

pub fn clear_entity<C, E>(canvas: &mut C, entity: &E)
where
    C: Canvas + ?Sized,
    E: Collidable + ?Sized,
{
    canvas.clear_rect(entity.position(), entity.size());
}

pub fn draw_food<C: Canvas + ?Sized>(canvas: &mut C, food: &Food) {
    draw_entity(canvas, food, food.style().color);
}

pub fn draw_snake<C: Canvas + ?Sized>(canvas: &mut C, snake: &mut Snake) {
    let color = snake.style().color;
    draw_entity(canvas, &*snake, color);
    for segment in snake.tail() {
        draw_entity(canvas, &segment, color);
    }
}

pub fn clear_snake<C: Canvas + ?Sized>(canvas: &mut C, snake: &mut Snake) {
    clear_entity(canvas, &*snake);
    for segment in snake.tail() {
        clear_entity(canvas, &segment);
    }
}
