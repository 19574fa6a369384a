//! Collaborator traits the session reads from and writes to.

use codec::{CollisionEvent, ObjectIndex, PhysicsNodeData, Team};
use glam::{Quat, Vec3};

/// How a received snapshot is pushed into a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Take the received pose as is.
    Snap,
    /// Move halfway from the current pose toward the received one.
    Halfway,
}

impl Blend {
    #[must_use]
    pub fn position(self, current: Vec3, target: Vec3) -> Vec3 {
        match self {
            Self::Snap => target,
            Self::Halfway => (current + target) * 0.5,
        }
    }

    #[must_use]
    pub fn orientation(self, current: Quat, target: Quat) -> Quat {
        match self {
            Self::Snap => target,
            Self::Halfway => current.slerp(target, 0.5),
        }
    }
}

/// Read side of the authoritative physics, used by the server.
pub trait PhysicsSource {
    /// Current state of an object, or `None` to keep sending the last one.
    fn object_data(&self, index: ObjectIndex) -> Option<PhysicsNodeData>;

    fn projectile_data(&self, index: ObjectIndex) -> Option<PhysicsNodeData> {
        self.object_data(index)
    }
}

/// Apply side of the local physics, used by the client.
///
/// Velocities are always set directly; only the pose honours [`Blend`].
pub trait PhysicsTarget {
    fn apply_object(&mut self, index: ObjectIndex, data: &PhysicsNodeData, blend: Blend);

    fn apply_projectile(&mut self, index: ObjectIndex, data: &PhysicsNodeData, blend: Blend) {
        self.apply_object(index, data, blend);
    }

    fn projectile_is_alive(&self, index: ObjectIndex) -> bool;

    /// Puts a pool instance in the world for `index`, returning the index of
    /// the instance that now occupies the slot.
    fn spawn_projectile(&mut self, index: ObjectIndex, team: Team) -> ObjectIndex;

    fn despawn_projectile(&mut self, index: ObjectIndex);
}

/// Status and event notifications from a client session.
pub trait SyncListener: Send {
    fn network_delay_changed(&mut self, has_network_delay: bool) {
        let _ = has_network_delay;
    }

    fn collision_sound(&mut self, index: ObjectIndex, event: CollisionEvent) {
        let _ = (index, event);
    }
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SyncListener for NoopListener {}
