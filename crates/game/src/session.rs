use engine::{
    populate_level, Actor, ActorId, Anchor, DrawSink, GeometryError, InputSnapshot, Level,
    RenderableDesc, RenderableKind, Solid, TickContext, TilesetLayout, Vec2,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::level_file::{LevelDef, LevelFileError};
use crate::platform::MovingPlatform;
use crate::player::{Player, PlayerConfig};

pub const PLAYER_WIDTH: i32 = 8;
pub const PLAYER_HEIGHT: i32 = 11;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    LevelFile(#[from] LevelFileError),
    #[error(transparent)]
    Grid(#[from] engine::GridError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// One running simulation: a level populated from a definition, the player,
/// and the platform drivers. Advances exactly one fixed tick per `step`.
pub struct Session {
    level: Level,
    player_id: ActorId,
    platforms: Vec<MovingPlatform>,
    tick: u64,
}

impl Session {
    pub fn from_def(def: &LevelDef) -> Result<Self, SessionError> {
        let mut level = Level::new();

        let grid = def.tile_grid()?;
        let layout = def.tileset_sprite.as_ref().map(|key| TilesetLayout {
            sprite_key: key.clone(),
            columns: def.tiles_per_row,
        });
        let solids = populate_level(&mut level, &grid, def.tile_size, layout.as_ref())?;
        debug!(solids = solids.len(), "level geometry built");

        let mut platforms = Vec::with_capacity(def.platforms.len());
        for platform_def in &def.platforms {
            let mut solid = Solid::new(
                platform_def.position,
                platform_def.width,
                platform_def.height,
            )?;
            solid.renderable = Some(RenderableDesc {
                kind: RenderableKind::Placeholder,
                source_rect: None,
                debug_name: "platform",
            });
            let id = level.add_solid(solid);
            platforms.push(MovingPlatform::new(
                id,
                platform_def.position,
                platform_def.target,
                platform_def.speed,
            ));
        }

        let mut actor = Actor::with_anchor(
            def.player_spawn,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
            Anchor::Center,
        )?;
        actor.renderable = Some(RenderableDesc {
            kind: RenderableKind::Placeholder,
            source_rect: None,
            debug_name: "player",
        });
        let player_id =
            level.add_actor_with(actor, Box::new(Player::new(PlayerConfig::default())));
        info!(spawn = ?def.player_spawn, "session ready");

        Ok(Self {
            level,
            player_id,
            platforms,
            tick: 0,
        })
    }

    /// Platforms move first so the player integrates against settled
    /// geometry, then every actor behavior runs.
    pub fn step(&mut self, input: InputSnapshot) {
        let ctx = TickContext::new(input);
        for platform in &mut self.platforms {
            platform.update(&mut self.level, ctx.fixed_dt_seconds);
        }
        self.level.update(&ctx);
        for id in self.level.take_squished() {
            if id == self.player_id {
                warn!(tick = self.tick, "player squished");
            } else {
                debug!(?id, tick = self.tick, "actor squished");
            }
        }
        self.tick += 1;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.level.actor(self.player_id).map(|actor| actor.position)
    }

    pub fn player_alive(&self) -> bool {
        self.level.actor(self.player_id).is_some()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        self.level.draw(sink);
    }
}
