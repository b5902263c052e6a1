use glam::Vec3;

use super::arena::Arena;
use super::config::ArenaConfig;
use super::food::Food;
use super::locomotion::SnakeController;
use super::state::CollisionType;

/// Logical contact tests between the head, the body, the walls and food.
///
/// All positions are compared after [`Arena::wrap_position`], so a wrapping
/// arena behaves the same as a walled one for contacts inside the volume.
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    body_radius: f32,
    eat_distance: f32,
    self_collision_skip: usize,
}

impl CollisionDetector {
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            body_radius: config.body_radius,
            eat_distance: config.eat_distance,
            self_collision_skip: config.self_collision_skip,
        }
    }

    /// First collision of the head this tick, walls before body.
    ///
    /// Ghost mode is not considered here; the engine decides what a
    /// self-collision means.
    pub fn check(&self, arena: &Arena, snake: &SnakeController) -> Option<CollisionType> {
        let head = snake.head_pose().position;
        if arena.hits_wall(head) {
            return Some(CollisionType::Wall);
        }
        if self.hits_body(arena, snake) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }

    /// Whether the head overlaps a segment beyond the skipped neck segments.
    pub fn hits_body(&self, arena: &Arena, snake: &SnakeController) -> bool {
        let head = arena.wrap_position(snake.head_pose().position);
        let contact = self.body_radius * 2.0;
        snake
            .segments()
            .iter()
            .skip(self.self_collision_skip)
            .any(|segment| arena.wrap_position(segment.pose.position).distance(head) < contact)
    }

    /// Whether the head is close enough to eat `food`.
    pub fn reaches_food(&self, arena: &Arena, head: Vec3, food: &Food) -> bool {
        arena.wrap_position(head).distance(food.position) <= self.eat_distance
    }
}
