use engine::{Level, SolidId, Vec2};

/// Drives a solid back and forth between two waypoints at constant speed,
/// feeding the fractional per-tick delta into the level's solid move pass.
#[derive(Debug, Clone)]
pub struct MovingPlatform {
    solid: SolidId,
    start: Vec2,
    end: Vec2,
    speed: f32,
    heading_to_end: bool,
}

impl MovingPlatform {
    pub fn new(solid: SolidId, start: Vec2, end: Vec2, speed: f32) -> Self {
        Self {
            solid,
            start,
            end,
            speed,
            heading_to_end: true,
        }
    }

    pub fn solid_id(&self) -> SolidId {
        self.solid
    }

    pub fn update(&mut self, level: &mut Level, dt: f32) {
        let Some(solid) = level.solid(self.solid) else {
            return;
        };
        let target = if self.heading_to_end {
            self.end
        } else {
            self.start
        };
        let to_x = target.x - solid.position.x;
        let to_y = target.y - solid.position.y;
        let distance = (to_x * to_x + to_y * to_y).sqrt();
        let step = self.speed * dt;
        if distance <= step {
            // Arrive exactly, then reverse for next tick.
            level.move_solid(self.solid, to_x, to_y);
            self.heading_to_end = !self.heading_to_end;
        } else {
            level.move_solid(self.solid, to_x / distance * step, to_y / distance * step);
        }
    }
}
