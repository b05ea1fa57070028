use engine::{ActorBehavior, ActorId, Button, InputSnapshot, Level, TickContext, Vec2};

/// Tuning constants for the player movement model. Speeds are pixels per
/// second, times are seconds, gravity multipliers are dimensionless.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub max_run_speed: f32,
    pub run_accel: f32,
    pub air_accel: f32,
    pub ground_friction: f32,

    pub jump_speed: f32,
    pub min_jump_speed: f32,
    pub jump_horizontal_boost: f32,
    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    pub wall_jump_horizontal_speed: f32,

    pub dash_speed: f32,
    pub dash_time: f32,
    pub dash_cooldown: f32,
    pub dash_end_time: f32,
    pub dash_end_keep_fraction: f32,
    pub dash_end_damp_fraction: f32,

    pub climb_up_speed: f32,
    pub climb_down_speed: f32,
    pub climb_accel: f32,
    pub max_slide_speed: f32,
    pub stamina_max: f32,
    pub stamina_drain_per_second: f32,
    pub stamina_regen_per_second: f32,

    pub gravity: f32,
    pub max_fall_speed: f32,
    pub fast_fall_threshold: f32,
    pub gravity_mult_dash_ending: f32,
    pub gravity_mult_rising_held: f32,
    pub gravity_mult_rising_released: f32,
    pub gravity_mult_fall_start: f32,
    pub gravity_mult_fast_fall: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_run_speed: 90.0,
            run_accel: 1000.0,
            air_accel: 650.0,
            ground_friction: 400.0,

            jump_speed: 105.0,
            min_jump_speed: 55.0,
            jump_horizontal_boost: 13.0,
            jump_buffer_time: 0.1,
            coyote_time: 0.1,
            wall_jump_horizontal_speed: 110.0,

            dash_speed: 240.0,
            dash_time: 0.15,
            dash_cooldown: 0.2,
            dash_end_time: 0.1,
            dash_end_keep_fraction: 0.65,
            dash_end_damp_fraction: 0.25,

            climb_up_speed: 45.0,
            climb_down_speed: 80.0,
            climb_accel: 900.0,
            max_slide_speed: 60.0,
            stamina_max: 2.0,
            stamina_drain_per_second: 1.0,
            stamina_regen_per_second: 4.0,

            gravity: 900.0,
            max_fall_speed: 160.0,
            fast_fall_threshold: 100.0,
            gravity_mult_dash_ending: 0.15,
            gravity_mult_rising_held: 0.45,
            gravity_mult_rising_released: 0.7,
            gravity_mult_fall_start: 0.85,
            gravity_mult_fast_fall: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashState {
    Inactive,
    Active,
    Ending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimbState {
    Free,
    Grabbing,
    Sliding,
}

/// The player movement state machine, layered over a Center-anchored actor
/// via the level's move primitives. All timers count wall-clock seconds and
/// tick down by the fixed delta; every timer is armed in the same tick as
/// its triggering event.
pub struct Player {
    config: PlayerConfig,
    velocity: Vec2,
    facing: i32,
    grounded: bool,
    dash_state: DashState,
    climb_state: ClimbState,
    dash_direction: Vec2,
    // +1 wall on the right, -1 wall on the left, while grabbing.
    grab_wall: i32,
    can_dash: bool,
    dash_released: bool,
    was_dashing_prev_tick: bool,
    grab_armed: bool,
    stamina: f32,
    coyote_timer: f32,
    jump_buffer_timer: f32,
    dash_timer: f32,
    dash_cooldown_timer: f32,
    dash_end_timer: f32,
    prev_input: InputSnapshot,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        let stamina = config.stamina_max;
        Self {
            config,
            velocity: Vec2::ZERO,
            facing: 1,
            grounded: false,
            dash_state: DashState::Inactive,
            climb_state: ClimbState::Free,
            dash_direction: Vec2::new(1.0, 0.0),
            grab_wall: 0,
            can_dash: true,
            dash_released: true,
            was_dashing_prev_tick: false,
            grab_armed: true,
            stamina,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            dash_timer: 0.0,
            dash_cooldown_timer: 0.0,
            dash_end_timer: 0.0,
            prev_input: InputSnapshot::empty(),
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn dash_state(&self) -> DashState {
        self.dash_state
    }

    pub fn climb_state(&self) -> ClimbState {
        self.climb_state
    }

    pub fn facing(&self) -> i32 {
        self.facing
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn can_dash(&self) -> bool {
        self.can_dash
    }

    fn end_dash(&mut self, blocked_horizontally: bool) {
        self.dash_state = DashState::Ending;
        self.dash_end_timer = self.config.dash_end_time;
        self.dash_cooldown_timer = self.config.dash_cooldown;
        if blocked_horizontally {
            return;
        }
        if self.dash_direction.x.abs() > self.dash_direction.y.abs() {
            self.velocity.x *= self.config.dash_end_keep_fraction;
            self.velocity.y *= self.config.dash_end_damp_fraction;
        } else {
            self.velocity.x *= self.config.dash_end_damp_fraction;
            self.velocity.y *= self.config.dash_end_keep_fraction;
        }
    }
}

/// Moves `current` toward `target` by at most `max_delta`, never
/// overshooting.
fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}

impl ActorBehavior for Player {
    fn update(&mut self, level: &mut Level, id: ActorId, ctx: &TickContext) {
        let Some(actor) = level.actor(id) else {
            return;
        };
        let position = actor.position;
        let dt = ctx.fixed_dt_seconds;
        let input = ctx.input;
        let jump_pressed = input.is_down(Button::Jump) && !self.prev_input.is_down(Button::Jump);
        let move_x = input.x_axis();
        if move_x != 0 {
            self.facing = move_x;
        }

        // 1. grounded state, coyote time
        let grounded_now = level.collide_at(id, Vec2::new(position.x, position.y + 1.0));
        if self.grounded && !grounded_now {
            self.coyote_timer = self.config.coyote_time;
        } else if !grounded_now {
            self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        }
        self.grounded = grounded_now;
        if self.grounded && self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }

        // 2. horizontal control
        if self.dash_state != DashState::Active && self.climb_state != ClimbState::Grabbing {
            let target = move_x as f32 * self.config.max_run_speed;
            if self.grounded && move_x == 0 {
                self.velocity.x = approach(self.velocity.x, 0.0, self.config.ground_friction * dt);
            } else {
                let accel = if self.grounded {
                    self.config.run_accel
                } else {
                    self.config.air_accel
                };
                self.velocity.x = approach(self.velocity.x, target, accel * dt);
            }
        }

        // 3. climbing and wall slide
        let wall_left = level.collide_at(id, Vec2::new(position.x - 1.0, position.y));
        let wall_right = level.collide_at(id, Vec2::new(position.x + 1.0, position.y));
        let wants_grab = input.is_down(Button::Grab);
        let can_grab = !self.grounded
            && self.dash_state != DashState::Active
            && wants_grab
            && self.grab_armed
            && (wall_left || wall_right);
        if can_grab {
            if self.climb_state != ClimbState::Grabbing {
                self.grab_wall = if wall_right { 1 } else { -1 };
            }
            self.climb_state = ClimbState::Grabbing;
            let target = match input.y_axis() {
                -1 => -self.config.climb_up_speed,
                1 => self.config.climb_down_speed,
                _ => 0.0,
            };
            self.velocity.y = approach(self.velocity.y, target, self.config.climb_accel * dt);
            self.velocity.x = 0.0;
            self.stamina -= self.config.stamina_drain_per_second * dt;
            if self.stamina <= 0.0 {
                self.stamina = 0.0;
                self.grab_armed = false;
                self.climb_state = ClimbState::Free;
            }
        } else {
            let pushing_into_wall = (move_x == -1 && wall_left) || (move_x == 1 && wall_right);
            if !self.grounded
                && self.dash_state == DashState::Inactive
                && pushing_into_wall
                && self.velocity.y > self.config.max_slide_speed
            {
                self.velocity.y = self.config.max_slide_speed;
                self.climb_state = ClimbState::Sliding;
            } else {
                self.climb_state = ClimbState::Free;
            }
        }
        if self.grounded {
            self.stamina =
                (self.stamina + self.config.stamina_regen_per_second * dt).min(self.config.stamina_max);
            self.grab_armed = true;
        }

        // 4. jump
        if jump_pressed && self.climb_state == ClimbState::Grabbing {
            // Wall jump: away from the grabbed wall, upward; the grab ends
            // now and may not re-engage until next tick's eligibility check.
            self.velocity.x = -self.grab_wall as f32 * self.config.wall_jump_horizontal_speed;
            self.velocity.y = -self.config.jump_speed;
            self.climb_state = ClimbState::Free;
            self.jump_buffer_timer = 0.0;
            self.coyote_timer = 0.0;
        } else {
            if jump_pressed {
                self.jump_buffer_timer = self.config.jump_buffer_time;
            } else {
                self.jump_buffer_timer = (self.jump_buffer_timer - dt).max(0.0);
            }
            if self.jump_buffer_timer > 0.0 && (self.grounded || self.coyote_timer > 0.0) {
                self.velocity.y = -self.config.jump_speed;
                // f32 signum is never zero; only boost an actual heading.
                if self.velocity.x != 0.0 {
                    self.velocity.x += self.velocity.x.signum() * self.config.jump_horizontal_boost;
                }
                self.jump_buffer_timer = 0.0;
                self.coyote_timer = 0.0;
                self.grounded = false;
            }
        }
        // Variable jump height: releasing while rising caps the ascent.
        if !input.is_down(Button::Jump) && self.velocity.y < -self.config.min_jump_speed {
            self.velocity.y = -self.config.min_jump_speed;
        }

        // 5. dash
        self.dash_cooldown_timer = (self.dash_cooldown_timer - dt).max(0.0);
        if !input.is_down(Button::Dash) {
            self.dash_released = true;
        }
        if self.grounded && self.dash_state != DashState::Active && !self.was_dashing_prev_tick {
            self.can_dash = true;
        }
        if self.dash_state == DashState::Active {
            self.velocity = Vec2::new(
                self.dash_direction.x * self.config.dash_speed,
                self.dash_direction.y * self.config.dash_speed,
            );
            self.dash_timer -= dt;
            if self.dash_timer <= 0.0 {
                let blocked = self.velocity.x != 0.0
                    && level.collide_at(
                        id,
                        Vec2::new(position.x + self.velocity.x.signum(), position.y),
                    );
                self.end_dash(blocked);
            }
        } else if self.dash_state == DashState::Ending {
            self.dash_end_timer -= dt;
            if self.dash_end_timer <= 0.0 {
                self.dash_state = DashState::Inactive;
            }
        }
        let dash_pressed = input.is_down(Button::Dash) && self.dash_released;
        if dash_pressed
            && self.can_dash
            && self.dash_cooldown_timer <= 0.0
            && self.dash_state != DashState::Active
        {
            let raw = Vec2::new(move_x as f32, input.y_axis() as f32);
            let length = (raw.x * raw.x + raw.y * raw.y).sqrt();
            self.dash_direction = if length > 0.0 {
                Vec2::new(raw.x / length, raw.y / length)
            } else {
                Vec2::new(self.facing as f32, 0.0)
            };
            self.dash_state = DashState::Active;
            self.dash_timer = self.config.dash_time;
            self.can_dash = false;
            self.dash_released = false;
            self.climb_state = ClimbState::Free;
            self.velocity = Vec2::new(
                self.dash_direction.x * self.config.dash_speed,
                self.dash_direction.y * self.config.dash_speed,
            );
        }

        // 6. gravity: suspended on the ground as well as while dashing or
        // grabbing, so a standing player's vertical velocity rests at zero
        // instead of sawing against the floor every tick.
        if !self.grounded
            && self.dash_state != DashState::Active
            && self.climb_state != ClimbState::Grabbing
        {
            let rising = self.velocity.y < 0.0;
            let multiplier = if self.dash_state == DashState::Ending {
                self.config.gravity_mult_dash_ending
            } else if rising && input.is_down(Button::Jump) {
                self.config.gravity_mult_rising_held
            } else if rising {
                self.config.gravity_mult_rising_released
            } else if self.velocity.y < self.config.fast_fall_threshold {
                self.config.gravity_mult_fall_start
            } else {
                self.config.gravity_mult_fast_fall
            };
            self.velocity.y += self.config.gravity * multiplier * dt;
            self.velocity.y = self
                .velocity
                .y
                .clamp(-self.config.max_fall_speed, self.config.max_fall_speed);
        }

        // 7. integration
        if self.velocity.x != 0.0 {
            let result = level.move_actor_x(id, self.velocity.x * dt, None);
            if result.collided {
                if self.dash_state == DashState::Active
                    && self.dash_direction.y < 0.0
                    && self.dash_direction.x != 0.0
                {
                    // Upward-diagonal dash into a wall redirects straight up.
                    self.dash_direction = Vec2::new(0.0, -1.0);
                    self.velocity = Vec2::new(0.0, -self.config.dash_speed);
                } else {
                    if self.dash_state == DashState::Active {
                        self.end_dash(true);
                    }
                    self.velocity.x = 0.0;
                }
            }
        }
        if self.velocity.y != 0.0 {
            let result = level.move_actor_y(id, self.velocity.y * dt, None);
            if result.collided {
                if self.dash_state == DashState::Active {
                    self.end_dash(false);
                }
                if self.velocity.y > 0.0 {
                    self.grounded = true;
                }
                self.velocity.y = 0.0;
            }
        }

        self.was_dashing_prev_tick = self.dash_state == DashState::Active;
        self.prev_input = input;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Actor, Anchor, Solid};

    const DT: f32 = 1.0 / 60.0;

    fn level_with_floor() -> Level {
        let mut level = Level::new();
        level.add_solid(Solid::new(Vec2::new(-200.0, 0.0), 400, 8).expect("floor"));
        level
    }

    fn spawn_player(level: &mut Level, x: f32, y: f32) -> ActorId {
        let actor =
            Actor::with_anchor(Vec2::new(x, y), 8, 8, Anchor::Center).expect("player actor");
        level.add_actor(actor)
    }

    // Center-anchored 8x8 body resting on a floor whose top edge is y = 0.
    fn grounded_player(level: &mut Level) -> ActorId {
        spawn_player(level, 0.0, -4.0)
    }

    fn tick(player: &mut Player, level: &mut Level, id: ActorId, input: InputSnapshot) {
        let ctx = TickContext::new(input);
        player.update(level, id, &ctx);
    }

    fn held(buttons: &[Button]) -> InputSnapshot {
        let mut input = InputSnapshot::empty();
        for &button in buttons {
            input = input.with_button_down(button, true);
        }
        input
    }

    #[test]
    fn run_accelerates_to_max_speed_and_holds_it() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        for _ in 0..60 {
            tick(&mut player, &mut level, id, held(&[Button::Right]));
        }
        assert!((player.velocity().x - 90.0).abs() < 1e-3);
        assert!(player.grounded());
    }

    #[test]
    fn ground_friction_stops_without_overshooting_zero() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        for _ in 0..30 {
            tick(&mut player, &mut level, id, held(&[Button::Right]));
        }
        for _ in 0..30 {
            tick(&mut player, &mut level, id, held(&[]));
        }
        assert_eq!(player.velocity().x, 0.0);
    }

    #[test]
    fn fresh_jump_press_launches_from_the_ground() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        assert!(player.grounded());

        tick(&mut player, &mut level, id, held(&[Button::Jump]));
        assert!(!player.grounded());
        assert!(player.velocity().y < -90.0);
    }

    #[test]
    fn releasing_jump_while_rising_caps_ascent_speed() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        tick(&mut player, &mut level, id, held(&[Button::Jump]));
        assert!(player.velocity().y < -90.0);

        tick(&mut player, &mut level, id, held(&[]));
        assert!(player.velocity().y >= -55.0);
        assert!(player.velocity().y < 0.0);
    }

    #[test]
    fn holding_jump_does_not_retrigger_without_a_release() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        tick(&mut player, &mut level, id, held(&[Button::Jump]));
        // Ride the jump out and land again, never releasing the button.
        for _ in 0..120 {
            tick(&mut player, &mut level, id, held(&[Button::Jump]));
        }
        assert!(player.grounded());
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn coyote_window_allows_a_late_jump_after_leaving_the_ground() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        assert!(player.grounded());

        // Step off the ledge without a jump.
        level.actor_mut(id).expect("actor").position = Vec2::new(300.0, -4.0);
        for _ in 0..3 {
            tick(&mut player, &mut level, id, held(&[]));
        }
        assert!(!player.grounded());

        tick(&mut player, &mut level, id, held(&[Button::Jump]));
        assert!(player.velocity().y < -90.0);
    }

    #[test]
    fn jump_after_the_coyote_window_does_not_fire() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        level.actor_mut(id).expect("actor").position = Vec2::new(300.0, -4.0);
        for _ in 0..10 {
            tick(&mut player, &mut level, id, held(&[]));
        }

        tick(&mut player, &mut level, id, held(&[Button::Jump]));
        assert!(player.velocity().y > 0.0);
    }

    #[test]
    fn jump_buffered_before_landing_fires_on_the_landing_tick() {
        let mut level = level_with_floor();
        // Falling fast, bottom edge eight pixels above the floor.
        let id = spawn_player(&mut level, 0.0, -12.0);
        let mut player = Player::new(PlayerConfig::default());
        player.velocity = Vec2::new(0.0, 100.0);

        // One early press, then nothing; the buffer must carry it through
        // the remaining fall.
        tick(&mut player, &mut level, id, held(&[Button::Jump]));
        let mut jumped = false;
        for _ in 0..5 {
            tick(&mut player, &mut level, id, held(&[]));
            if player.velocity().y < 0.0 {
                jumped = true;
                break;
            }
        }
        assert!(jumped);
    }

    #[test]
    fn jump_pressed_too_early_is_forgotten_before_landing() {
        let mut level = level_with_floor();
        // Same fall, but from high enough that the buffer expires mid-air.
        let id = spawn_player(&mut level, 0.0, -36.0);
        let mut player = Player::new(PlayerConfig::default());
        player.velocity = Vec2::new(0.0, 100.0);

        tick(&mut player, &mut level, id, held(&[Button::Jump]));
        for _ in 0..20 {
            tick(&mut player, &mut level, id, held(&[]));
        }
        assert!(player.grounded());
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn dash_pins_velocity_for_the_full_duration_then_decays() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        tick(&mut player, &mut level, id, held(&[Button::Right, Button::Dash]));
        assert_eq!(player.dash_state(), DashState::Active);
        assert_eq!(player.velocity(), Vec2::new(240.0, 0.0));

        // 0.15s at 60 Hz: the timer runs down over the nine ticks after the
        // start tick, holding the dash speed throughout.
        for _ in 0..8 {
            tick(&mut player, &mut level, id, held(&[Button::Right, Button::Dash]));
            assert_eq!(player.velocity().x, 240.0);
        }
        // Expiry lands on the next tick, give or take float residue.
        let mut extra = 0;
        while player.dash_state() == DashState::Active && extra < 2 {
            tick(&mut player, &mut level, id, held(&[Button::Right, Button::Dash]));
            extra += 1;
        }
        assert_eq!(player.dash_state(), DashState::Ending);
        // Horizontal dash keeps a fraction of its speed on expiry.
        assert!((player.velocity().x - 240.0 * 0.65).abs() < 1.0);
    }

    #[test]
    fn dash_with_no_direction_held_uses_facing() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        // Face left first, then dash with no direction held.
        tick(&mut player, &mut level, id, held(&[Button::Left]));
        tick(&mut player, &mut level, id, held(&[Button::Dash]));
        assert_eq!(player.dash_state(), DashState::Active);
        assert!(player.velocity().x < 0.0);
    }

    #[test]
    fn dash_suspends_gravity() {
        let mut level = level_with_floor();
        // Airborne, far above the floor.
        let id = spawn_player(&mut level, 0.0, -100.0);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[Button::Right, Button::Dash]));
        for _ in 0..5 {
            tick(&mut player, &mut level, id, held(&[Button::Right, Button::Dash]));
            assert_eq!(player.velocity().y, 0.0);
        }
    }

    #[test]
    fn holding_dash_does_not_chain_into_a_second_dash() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        tick(&mut player, &mut level, id, held(&[Button::Dash]));
        assert_eq!(player.dash_state(), DashState::Active);

        // Hold the button well past the dash and its cooldown.
        for _ in 0..40 {
            tick(&mut player, &mut level, id, held(&[Button::Dash]));
        }
        assert_eq!(player.dash_state(), DashState::Inactive);

        // A release then a fresh press dashes again.
        tick(&mut player, &mut level, id, held(&[]));
        tick(&mut player, &mut level, id, held(&[Button::Dash]));
        assert_eq!(player.dash_state(), DashState::Active);
    }

    #[test]
    fn dash_is_spent_until_restored_on_the_ground() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[]));
        tick(&mut player, &mut level, id, held(&[Button::Dash]));
        assert!(!player.can_dash());

        for _ in 0..60 {
            tick(&mut player, &mut level, id, held(&[]));
        }
        assert!(player.grounded());
        assert!(player.can_dash());
    }

    #[test]
    fn upward_diagonal_dash_into_a_wall_redirects_straight_up() {
        let mut level = level_with_floor();
        // Wall immediately to the player's right.
        level.add_solid(Solid::new(Vec2::new(4.0, -200.0), 8, 200).expect("wall"));
        let id = spawn_player(&mut level, 0.0, -50.0);
        let mut player = Player::new(PlayerConfig::default());

        tick(
            &mut player,
            &mut level,
            id,
            held(&[Button::Right, Button::Up, Button::Dash]),
        );
        assert_eq!(player.dash_state(), DashState::Active);
        assert_eq!(player.velocity(), Vec2::new(0.0, -240.0));
    }

    #[test]
    fn wall_slide_caps_descent_speed() {
        let mut level = Level::new();
        // Tall wall to the right, no floor anywhere.
        level.add_solid(Solid::new(Vec2::new(4.0, -400.0), 8, 800).expect("wall"));
        let id = spawn_player(&mut level, 0.0, -100.0);
        let mut player = Player::new(PlayerConfig::default());
        player.velocity = Vec2::new(0.0, 150.0);

        for _ in 0..30 {
            tick(&mut player, &mut level, id, held(&[Button::Right]));
            // Bounded near the slide cap, well under terminal velocity.
            assert!(player.velocity().y <= 60.0 + 900.0 * 1.5 * DT + 1e-3);
        }
        assert_eq!(player.climb_state(), ClimbState::Sliding);
    }

    #[test]
    fn wall_slide_never_speeds_up_a_slow_descent() {
        let mut level = Level::new();
        level.add_solid(Solid::new(Vec2::new(4.0, -400.0), 8, 800).expect("wall"));
        let id = spawn_player(&mut level, 0.0, -100.0);
        let mut player = Player::new(PlayerConfig::default());
        player.velocity = Vec2::new(0.0, 10.0);

        tick(&mut player, &mut level, id, held(&[Button::Right]));
        // Only gravity applies; the clamp must not pull the speed up to cap.
        assert!(player.velocity().y < 30.0);
    }

    #[test]
    fn grab_pins_horizontal_velocity_and_climbs_toward_input() {
        let mut level = Level::new();
        level.add_solid(Solid::new(Vec2::new(4.0, -400.0), 8, 800).expect("wall"));
        let id = spawn_player(&mut level, 0.0, -100.0);
        let mut player = Player::new(PlayerConfig::default());
        player.velocity = Vec2::new(30.0, 40.0);

        for _ in 0..10 {
            tick(&mut player, &mut level, id, held(&[Button::Grab, Button::Up]));
        }
        assert_eq!(player.climb_state(), ClimbState::Grabbing);
        assert_eq!(player.velocity().x, 0.0);
        assert!((player.velocity().y + 45.0).abs() < 1e-3);
        assert!(player.stamina() < 2.0);
    }

    #[test]
    fn exhausted_stamina_releases_the_grab_until_regrounded() {
        let mut level = Level::new();
        level.add_solid(Solid::new(Vec2::new(4.0, -400.0), 8, 800).expect("wall"));
        let id = spawn_player(&mut level, 0.0, -100.0);
        let mut player = Player::new(PlayerConfig::default());
        player.stamina = 2.0 * DT;

        for _ in 0..3 {
            tick(&mut player, &mut level, id, held(&[Button::Grab]));
        }
        assert_eq!(player.climb_state(), ClimbState::Free);
        assert_eq!(player.stamina(), 0.0);

        // Still holding grab next to the wall; the spent grab stays spent.
        tick(&mut player, &mut level, id, held(&[Button::Grab]));
        assert_ne!(player.climb_state(), ClimbState::Grabbing);
    }

    #[test]
    fn stamina_regenerates_on_the_ground() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());
        player.stamina = 0.0;
        player.grab_armed = false;

        for _ in 0..40 {
            tick(&mut player, &mut level, id, held(&[]));
        }
        assert_eq!(player.stamina(), 2.0);
        assert!(player.grab_armed);
    }

    #[test]
    fn wall_jump_launches_away_from_the_grabbed_wall() {
        let mut level = Level::new();
        level.add_solid(Solid::new(Vec2::new(4.0, -400.0), 8, 800).expect("wall"));
        let id = spawn_player(&mut level, 0.0, -100.0);
        let mut player = Player::new(PlayerConfig::default());

        tick(&mut player, &mut level, id, held(&[Button::Grab]));
        assert_eq!(player.climb_state(), ClimbState::Grabbing);

        tick(&mut player, &mut level, id, held(&[Button::Grab, Button::Jump]));
        assert_eq!(player.climb_state(), ClimbState::Free);
        assert!(player.velocity().x < 0.0);
        assert!(player.velocity().y < -90.0);
    }

    #[test]
    fn standing_still_keeps_vertical_velocity_at_zero() {
        let mut level = level_with_floor();
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        // No saw-toothing against the floor: the resting state is exactly
        // zero every tick, so stepping off a ledge starts the fall from
        // zero rather than from a stale downward speed.
        for _ in 0..10 {
            tick(&mut player, &mut level, id, held(&[]));
            assert_eq!(player.velocity().y, 0.0);
        }
        assert!(player.grounded());
    }

    #[test]
    fn landing_zeroes_vertical_velocity_and_grounds_the_player() {
        let mut level = level_with_floor();
        let id = spawn_player(&mut level, 0.0, -30.0);
        let mut player = Player::new(PlayerConfig::default());

        for _ in 0..60 {
            tick(&mut player, &mut level, id, held(&[]));
        }
        assert!(player.grounded());
        assert_eq!(player.velocity().y, 0.0);
        // Resting flush on the floor top.
        let bounds = level.actor(id).expect("actor").bounds();
        assert_eq!(bounds.bottom(), 0);
    }

    #[test]
    fn running_into_a_wall_zeroes_horizontal_velocity() {
        let mut level = level_with_floor();
        level.add_solid(Solid::new(Vec2::new(20.0, -200.0), 8, 200).expect("wall"));
        let id = grounded_player(&mut level);
        let mut player = Player::new(PlayerConfig::default());

        for _ in 0..60 {
            tick(&mut player, &mut level, id, held(&[Button::Right]));
        }
        let bounds = level.actor(id).expect("actor").bounds();
        assert_eq!(bounds.right(), 20);
        assert_eq!(player.velocity().x, 0.0);
    }
}
