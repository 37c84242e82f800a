//! # loom_app
//!
//! The thin application layer over the entity store: tick configuration,
//! the fixed-timestep loop with render interpolation, and the script
//! dispatch driver.
//!
//! The loop owns timing, never storage: it calls store operations at a fixed
//! simulation rate and hands the renderer an interpolation factor, but every
//! invariant lives in `loom_ecs`.

pub mod config;
pub mod game_loop;
pub mod script_driver;

pub use config::Setting;
pub use game_loop::GameLoop;
