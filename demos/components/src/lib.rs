//! Sample component definitions for the loom entity store.
//!
//! These demonstrate how to define components that satisfy the
//! [`Component`] trait requirement: `Clone + 'static`, nothing more.

use glam::Vec2;
use loom_ecs::Component;

/// A 2D world-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Position in world units.
    pub value: Vec2,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            value: Vec2::new(x, y),
        }
    }

    /// The position advanced by `velocity` over `dt` seconds.
    #[must_use]
    pub fn advanced(self, velocity: Velocity, dt: f32) -> Self {
        Self {
            value: self.value + velocity.value * dt,
        }
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// A 2D velocity component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    /// Linear velocity in world units per second.
    pub value: Vec2,
}

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self { value: Vec2::ZERO };

    /// Create a new velocity.
    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self {
            value: Vec2::new(dx, dy),
        }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// A health component with current and maximum hit points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    /// Current hit points.
    pub current: f32,
    /// Maximum hit points.
    pub max: f32,
}

impl Health {
    /// Create a new health component at full HP.
    #[must_use]
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns `true` if the entity is alive (HP > 0).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Apply damage, clamping to zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Heal, clamping to max.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }
}

/// A simple name tag component for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    /// The entity's display name.
    pub value: String,
}

impl Name {
    /// Create a new name component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

impl Component for Name {
    fn type_name() -> &'static str {
        "Name"
    }
}
