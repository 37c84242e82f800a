//! Bouncer — a headless demo of the loom stack.
//!
//! Spawns a handful of entities with `Position`/`Velocity` components and a
//! bounce script, then runs the fixed-timestep loop for a bounded number of
//! ticks. Movement is a plain query-driven system; wall bounces live in the
//! per-entity script. The render callback only logs interpolated positions,
//! standing in for a real renderer.

use anyhow::Result;
use glam::Vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

use components::{Name, Position, Velocity};
use loom_app::{GameLoop, Setting, script_driver};
use loom_ecs::{Entity, World};
use loom_script::Script;

/// Reflects the entity's velocity whenever it leaves the box.
#[derive(Debug, Clone)]
struct Bounce {
    bounds: Vec2,
}

impl Script for Bounce {
    fn on_update(&mut self, self_id: Entity, world: &mut World, _dt: f32) {
        let position = match world.get::<Position>(self_id) {
            Ok(p) => *p,
            Err(_) => return,
        };
        let Ok(velocity) = world.get_mut::<Velocity>(self_id) else {
            return;
        };
        if !(0.0..self.bounds.x).contains(&position.value.x) {
            velocity.value.x = -velocity.value.x;
        }
        if !(0.0..self.bounds.y).contains(&position.value.y) {
            velocity.value.y = -velocity.value.y;
        }
    }
}

fn spawn_ball(world: &mut World, name: &str, position: Position, velocity: Velocity) -> Result<Entity> {
    let e = world.spawn();
    world.emplace(e, Name::new(name))?;
    world.emplace(e, position)?;
    world.emplace(e, velocity)?;
    script_driver::attach_script(
        world,
        e,
        Bounce {
            bounds: Vec2::new(640.0, 480.0),
        },
    )?;
    Ok(e)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bouncer=info".parse()?))
        .init();

    let mut world = World::new();
    spawn_ball(&mut world, "red", Position::new(100.0, 100.0), Velocity::new(120.0, 80.0))?;
    spawn_ball(&mut world, "green", Position::new(320.0, 240.0), Velocity::new(-90.0, 150.0))?;
    spawn_ball(&mut world, "blue", Position::new(500.0, 50.0), Velocity::new(60.0, -200.0))?;

    let setting = Setting::new("bouncer")
        .with_seconds_per_update(0.01)
        .with_max_ticks(500);
    let mut game_loop = GameLoop::new(setting);

    let mut frames = 0u64;
    game_loop.run(
        &mut world,
        |_| Vec::new(),
        |world, dt| {
            // Movement system: integrate every moving entity.
            for e in world.query::<(Position, Velocity)>() {
                let velocity = match world.get::<Velocity>(e) {
                    Ok(v) => *v,
                    Err(_) => continue,
                };
                if let Ok(position) = world.get_mut::<Position>(e) {
                    *position = position.advanced(velocity, dt);
                }
            }
        },
        |world, alpha| {
            frames += 1;
            if frames % 100 == 0 {
                for e in world.query::<(Name, Position, Velocity)>() {
                    let (name, position, velocity) = match (
                        world.get::<Name>(e).cloned(),
                        world.get::<Position>(e).copied(),
                        world.get::<Velocity>(e).copied(),
                    ) {
                        (Ok(n), Ok(p), Ok(v)) => (n, p, v),
                        _ => continue,
                    };
                    // Project the draw position between ticks, the way a
                    // renderer would.
                    let drawn = position.value + velocity.value * 0.01 * alpha;
                    info!(
                        entity = %e,
                        name = %name.value,
                        x = f64::from(drawn.x),
                        y = f64::from(drawn.y),
                        "ball"
                    );
                }
            }
        },
    );

    info!(ticks = game_loop.tick_id(), "bouncer finished");
    Ok(())
}
