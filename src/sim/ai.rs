//! Enemy Patrol Machine
//!
//! Two-direction patrol with enter/update/exit phases per direction.
//! Enter sets the walk velocity, update watches for obstructions, exit
//! idles on a countdown and then flips direction. The machine only
//! writes horizontal velocity; gravity and integration are handled by
//! the owning frame step like any other dynamic entity.
//!
//! An obstruction is a wall at the leading edge (the LEFT/RIGHT contact
//! flag) or a ledge: no blocking tile one cell ahead in the row below,
//! meaning the next step would walk off the floor.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::map::{snap_to_cell, EdgeFlags, OccupancyGrid};

use super::entity::{Physics, Transform};

/// Direction of travel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolDir {
    /// Walking toward negative x.
    #[default]
    GoingLeft,
    /// Walking toward positive x.
    GoingRight,
}

impl PatrolDir {
    /// The opposite direction.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            PatrolDir::GoingLeft => PatrolDir::GoingRight,
            PatrolDir::GoingRight => PatrolDir::GoingLeft,
        }
    }
}

/// Phase within the current direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolPhase {
    /// Set the walk velocity, then advance to `OnUpdate`.
    #[default]
    OnEnter,
    /// Walk until obstructed.
    OnUpdate,
    /// Idle on the countdown, then flip direction.
    OnExit,
}

/// Per-enemy patrol state.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PatrolState {
    /// Direction of travel
    pub dir: PatrolDir,
    /// Phase within the direction
    pub phase: PatrolPhase,
    /// Idle countdown in seconds, meaningful in `OnExit`
    pub counter: f32,
}

/// Advance one enemy's patrol machine by one frame.
///
/// `flags` are the enemy's current edge contacts. At most one phase
/// transition happens per call; `OnEnter` runs its action and hands off
/// so walking starts the following frame.
pub fn tick(
    patrol: &mut PatrolState,
    transform: &mut Transform,
    physics: &mut Physics,
    flags: EdgeFlags,
    grid: &OccupancyGrid,
    speed: f32,
    idle_time: f32,
    dt: f32,
) {
    match patrol.phase {
        PatrolPhase::OnEnter => {
            physics.velocity.x = match patrol.dir {
                PatrolDir::GoingLeft => -speed,
                PatrolDir::GoingRight => speed,
            };
            patrol.phase = PatrolPhase::OnUpdate;
        }
        PatrolPhase::OnUpdate => {
            if obstructed(patrol.dir, transform, flags, grid) {
                physics.velocity.x = 0.0;
                transform.position.x = snap_to_cell(transform.position.x);
                patrol.counter = idle_time;
                patrol.phase = PatrolPhase::OnExit;
                trace!(dir = ?patrol.dir, x = transform.position.x, "patrol obstructed");
            }
        }
        PatrolPhase::OnExit => {
            patrol.counter -= dt;
            if patrol.counter <= 0.0 {
                patrol.dir = patrol.dir.flipped();
                patrol.phase = PatrolPhase::OnEnter;
            }
        }
    }
}

/// Wall at the leading edge, or no floor under the next cell.
fn obstructed(
    dir: PatrolDir,
    transform: &Transform,
    flags: EdgeFlags,
    grid: &OccupancyGrid,
) -> bool {
    let (wall_flag, dx) = match dir {
        PatrolDir::GoingLeft => (EdgeFlags::LEFT, -1),
        PatrolDir::GoingRight => (EdgeFlags::RIGHT, 1),
    };
    let ahead_x = transform.position.x as i32 + dx;
    let below_y = transform.position.y as i32 - 1;
    flags.contains(wall_flag) || !grid.is_blocking(ahead_x, below_y)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;

    const SPEED: f32 = 7.5;
    const IDLE: f32 = 2.0;
    const DT: f32 = 1.0 / 60.0;

    /// Solid floor with walls at both ends of the walkable row.
    fn corridor() -> OccupancyGrid {
        OccupancyGrid::load("Width 5\nHeight 3\n0 0 0 0 0\n1 0 0 0 1\n1 1 1 1 1\n".as_bytes())
            .unwrap()
    }

    /// Floor covering only the left half of the map.
    fn half_floor() -> OccupancyGrid {
        OccupancyGrid::load("Width 4\nHeight 2\n0 0 0 0\n1 1 0 0\n".as_bytes()).unwrap()
    }

    fn enemy_at(x: f32, y: f32) -> (Transform, Physics) {
        (Transform::at(Vec2::new(x, y)), Physics::default())
    }

    #[test]
    fn test_enter_sets_walk_velocity_once() {
        let grid = corridor();
        let (mut transform, mut physics) = enemy_at(2.5, 1.5);
        let mut patrol = PatrolState::default();

        tick(
            &mut patrol, &mut transform, &mut physics,
            EdgeFlags::NONE, &grid, SPEED, IDLE, DT,
        );
        assert_eq!(physics.velocity.x, -SPEED);
        assert_eq!(patrol.phase, PatrolPhase::OnUpdate);
    }

    #[test]
    fn test_wall_contact_stops_and_snaps() {
        let grid = corridor();
        let (mut transform, mut physics) = enemy_at(1.4, 1.5);
        physics.velocity.x = -SPEED;
        let mut patrol = PatrolState {
            phase: PatrolPhase::OnUpdate,
            ..PatrolState::default()
        };

        tick(
            &mut patrol, &mut transform, &mut physics,
            EdgeFlags::LEFT, &grid, SPEED, IDLE, DT,
        );
        assert_eq!(physics.velocity.x, 0.0);
        assert_eq!(transform.position.x, 1.5);
        assert_eq!(patrol.phase, PatrolPhase::OnExit);
        assert_eq!(patrol.counter, IDLE);
    }

    #[test]
    fn test_ledge_ahead_stops_patrol() {
        let grid = half_floor();
        // Standing on the last floor cell, walking right toward the gap.
        let (mut transform, mut physics) = enemy_at(1.5, 1.5);
        physics.velocity.x = SPEED;
        let mut patrol = PatrolState {
            dir: PatrolDir::GoingRight,
            phase: PatrolPhase::OnUpdate,
            counter: 0.0,
        };

        tick(
            &mut patrol, &mut transform, &mut physics,
            EdgeFlags::NONE, &grid, SPEED, IDLE, DT,
        );
        assert_eq!(physics.velocity.x, 0.0);
        assert_eq!(patrol.phase, PatrolPhase::OnExit);
    }

    #[test]
    fn test_solid_floor_ahead_keeps_walking() {
        let grid = corridor();
        let (mut transform, mut physics) = enemy_at(2.5, 1.5);
        physics.velocity.x = -SPEED;
        let mut patrol = PatrolState {
            phase: PatrolPhase::OnUpdate,
            ..PatrolState::default()
        };

        tick(
            &mut patrol, &mut transform, &mut physics,
            EdgeFlags::NONE, &grid, SPEED, IDLE, DT,
        );
        assert_eq!(physics.velocity.x, -SPEED);
        assert_eq!(patrol.phase, PatrolPhase::OnUpdate);
    }

    #[test]
    fn test_exit_counts_down_then_flips() {
        let grid = corridor();
        let (mut transform, mut physics) = enemy_at(1.5, 1.5);
        let mut patrol = PatrolState {
            dir: PatrolDir::GoingLeft,
            phase: PatrolPhase::OnExit,
            counter: IDLE,
        };

        // Idle for just under the full countdown
        let frames = (IDLE / DT) as usize - 1;
        for _ in 0..frames {
            tick(
                &mut patrol, &mut transform, &mut physics,
                EdgeFlags::NONE, &grid, SPEED, IDLE, DT,
            );
            assert_eq!(patrol.phase, PatrolPhase::OnExit);
        }

        // Countdown expires within two more frames
        tick(
            &mut patrol, &mut transform, &mut physics,
            EdgeFlags::NONE, &grid, SPEED, IDLE, DT,
        );
        tick(
            &mut patrol, &mut transform, &mut physics,
            EdgeFlags::NONE, &grid, SPEED, IDLE, DT,
        );
        assert_eq!(patrol.dir, PatrolDir::GoingRight);
        assert!(matches!(
            patrol.phase,
            PatrolPhase::OnEnter | PatrolPhase::OnUpdate
        ));
    }

    #[test]
    fn test_dir_flip_roundtrip() {
        assert_eq!(PatrolDir::GoingLeft.flipped(), PatrolDir::GoingRight);
        assert_eq!(PatrolDir::GoingRight.flipped(), PatrolDir::GoingLeft);
    }
}
