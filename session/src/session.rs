//! The synchronization session.

use std::fmt;
use std::time::Duration;

use codec::{
    CollisionEvent, CollisionSoundData, ObjectIndex, PacketNumber, PhysicsNodeData,
    PhysicsSyncData,
};
use wire::MAX_COUNT;

use crate::error::{RegistryKind, SyncError, SyncResult};
use crate::{
    Blend, DelayTracker, Inbox, NoopListener, PhysicsSource, PhysicsTarget, PlayoutBuffer,
    PlayoutStep, SessionStats, StepKind, SyncConfig, SyncListener, Transport,
};

/// Which side of the sync a session plays. Fixed for the session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Authoritative: reads local physics and broadcasts it.
    Server,
    /// Reconciles local physics to what the server sends.
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Client => write!(f, "client"),
        }
    }
}

/// What one client tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub step: StepKind,
    pub discarded: usize,
    pub trimmed: usize,
    pub sounds_played: usize,
    /// New delay status, if it changed this tick.
    pub network_delay_changed: Option<bool>,
}

/// Replicated physics state for one level, in either role.
///
/// Objects and projectiles are kept as parallel lists: slot `i` of a registry
/// pairs with entry `i` of every packet's matching list. Registries are owned
/// by the simulation thread; only the received-packet queue is shared, through
/// [`Inbox`].
pub struct SyncSession {
    role: Role,
    config: SyncConfig,
    objects: Vec<ObjectIndex>,
    node_data: Vec<PhysicsNodeData>,
    projectiles: Vec<ObjectIndex>,
    projectile_data: Vec<PhysicsNodeData>,
    pending_sounds: Vec<CollisionSoundData>,
    inbox: Inbox,
    delay: DelayTracker,
    listener: Box<dyn SyncListener>,
    stats: SessionStats,
}

impl fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSession")
            .field("role", &self.role)
            .field("objects", &self.objects.len())
            .field("projectiles", &self.projectiles.len())
            .field("pending_sounds", &self.pending_sounds.len())
            .field("has_network_delay", &self.delay.has_network_delay())
            .finish_non_exhaustive()
    }
}

impl SyncSession {
    pub fn new(role: Role, config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        let buffer = PlayoutBuffer::new(
            config.max_packet_count,
            config.packet_count_to_slow_data_usage,
        );
        let inbox = Inbox::new(buffer, config.limits.clone());
        let delay = DelayTracker::new(config.network_delay_status_lifetime());
        Ok(Self {
            role,
            config,
            objects: Vec::new(),
            node_data: Vec::new(),
            projectiles: Vec::new(),
            projectile_data: Vec::new(),
            pending_sounds: Vec::new(),
            inbox,
            delay,
            listener: Box::new(NoopListener),
            stats: SessionStats::default(),
        })
    }

    /// Replaces the status and sound listener.
    #[must_use]
    pub fn with_listener(mut self, listener: impl SyncListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl SyncListener + 'static) {
        self.listener = Box::new(listener);
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub const fn has_network_delay(&self) -> bool {
        self.delay.has_network_delay()
    }

    /// Latest snapshot per registered object, in registration order.
    #[must_use]
    pub fn node_data(&self) -> &[PhysicsNodeData] {
        &self.node_data
    }

    /// Latest snapshot per projectile slot.
    #[must_use]
    pub fn projectile_data(&self) -> &[PhysicsNodeData] {
        &self.projectile_data
    }

    /// Object currently occupying each projectile slot.
    #[must_use]
    pub fn projectile_slots(&self) -> &[ObjectIndex] {
        &self.projectiles
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        let state = self.inbox.lock();
        SessionStats {
            packets_received: state.received,
            packets_malformed: state.malformed,
            ..self.stats
        }
    }

    /// Handle for the network thread to deliver packets through.
    #[must_use]
    pub fn inbox(&self) -> Inbox {
        self.inbox.clone()
    }

    /// Adds a non-projectile object. The object set is fixed after level load.
    pub fn register_object(
        &mut self,
        index: ObjectIndex,
        initial: PhysicsNodeData,
    ) -> SyncResult<()> {
        if self.objects.len() >= MAX_COUNT {
            return Err(SyncError::RegistryFull {
                kind: RegistryKind::Objects,
                limit: MAX_COUNT,
            });
        }
        self.objects.push(index);
        self.node_data.push(initial);
        Ok(())
    }

    /// Adds a projectile pool slot.
    pub fn register_projectile(
        &mut self,
        index: ObjectIndex,
        initial: PhysicsNodeData,
    ) -> SyncResult<()> {
        if self.projectiles.len() >= MAX_COUNT {
            return Err(SyncError::RegistryFull {
                kind: RegistryKind::Projectiles,
                limit: MAX_COUNT,
            });
        }
        self.projectiles.push(index);
        self.projectile_data.push(initial);
        Ok(())
    }

    /// Points the slot currently holding `old` at `new`, keeping the pool size.
    pub fn replace_projectile(&mut self, old: ObjectIndex, new: ObjectIndex) -> SyncResult<()> {
        let slot = self
            .projectiles
            .iter_mut()
            .find(|slot| **slot == old)
            .ok_or(SyncError::UnknownProjectile { index: old })?;
        *slot = new;
        Ok(())
    }

    /// Queues a collision sound for the next outgoing packet.
    pub fn queue_sound(&mut self, index: ObjectIndex, event: CollisionEvent) -> SyncResult<()> {
        self.require(Role::Server)?;
        self.pending_sounds.push(CollisionSoundData::new(index, event));
        Ok(())
    }

    /// Snapshots every registered body and drains queued sounds into a packet.
    ///
    /// A body the source has no data for keeps its previous snapshot. At most
    /// 511 sounds go into one packet; the rest wait for the next.
    pub fn generate_data(
        &mut self,
        frame: u64,
        source: &impl PhysicsSource,
    ) -> SyncResult<PhysicsSyncData> {
        self.require(Role::Server)?;
        for (index, data) in self.objects.iter().zip(&mut self.node_data) {
            if let Some(fresh) = source.object_data(*index) {
                *data = fresh;
            }
        }
        for (index, data) in self.projectiles.iter().zip(&mut self.projectile_data) {
            if let Some(fresh) = source.projectile_data(*index) {
                *data = fresh;
            }
        }

        let sound_count = self.pending_sounds.len().min(MAX_COUNT);
        let sounds: Vec<_> = self.pending_sounds.drain(..sound_count).collect();

        Ok(PhysicsSyncData {
            packet_number: PacketNumber::from_frame(frame),
            nodes: self.node_data.clone(),
            projectiles: self.projectile_data.clone(),
            sounds,
        })
    }

    /// Generates, encodes and broadcasts this frame's packet. Returns its size.
    pub fn broadcast<T: Transport>(
        &mut self,
        frame: u64,
        source: &impl PhysicsSource,
        mut transport: T,
    ) -> SyncResult<usize> {
        let packet = self.generate_data(frame, source)?;
        let bytes = packet.encode()?;
        transport
            .broadcast(&bytes)
            .map_err(|err| SyncError::Transport(Box::new(err)))?;
        self.stats.packets_sent += 1;
        self.stats.bytes_sent += bytes.len() as u64;
        tracing::trace!(
            packet = %packet.packet_number,
            bytes = bytes.len(),
            sounds = packet.sounds.len(),
            "broadcast physics packet"
        );
        Ok(bytes.len())
    }

    /// Runs one playout tick and applies its result to `target`.
    ///
    /// `now` is game time. Completes in bounded time and never waits for the
    /// network; the inbox lock is released before any object is touched.
    pub fn update_from_received_data(
        &mut self,
        now: Duration,
        target: &mut impl PhysicsTarget,
    ) -> SyncResult<TickReport> {
        self.require(Role::Client)?;
        let tick = {
            let mut state = self.inbox.lock();
            state.buffer.tick()
        };

        let mut report = TickReport {
            step: tick.step.kind(),
            discarded: tick.discarded,
            trimmed: tick.trimmed,
            sounds_played: 0,
            network_delay_changed: None,
        };
        if tick.discarded > 0 {
            tracing::debug!(count = tick.discarded, "discarded out-of-order physics packets");
        }
        self.stats.packets_discarded += tick.discarded as u64;
        self.stats.packets_trimmed += tick.trimmed as u64;

        match tick.step {
            PlayoutStep::Refilling => return Ok(report),
            PlayoutStep::Full(packet) => {
                report.sounds_played = self.apply_packet(packet);
                self.update_objects(Blend::Snap, target);
            }
            PlayoutStep::Half(packet) => {
                report.sounds_played = self.apply_packet(packet);
                self.update_objects(Blend::Halfway, target);
                self.stats.half_weight_ticks += 1;
            }
            PlayoutStep::Complete => self.update_objects(Blend::Snap, target),
            PlayoutStep::Starved => {
                self.stats.starvations += 1;
                tracing::info!("out of physics packets, refilling");
                if self.delay.starved(now) {
                    self.notify_delay(true, &mut report);
                }
            }
        }

        if self.delay.expire(now) {
            self.notify_delay(false, &mut report);
        }
        Ok(report)
    }

    fn require(&self, expected: Role) -> SyncResult<()> {
        if self.role == expected {
            Ok(())
        } else {
            Err(SyncError::WrongRole {
                expected,
                actual: self.role,
            })
        }
    }

    /// Takes over the packet's snapshot lists and plays its sounds once.
    fn apply_packet(&mut self, packet: PhysicsSyncData) -> usize {
        self.stats.packets_applied += 1;
        self.node_data = packet.nodes;
        self.projectile_data = packet.projectiles;
        for sound in &packet.sounds {
            self.listener.collision_sound(sound.object_index, sound.event);
        }
        packet.sounds.len()
    }

    fn update_objects(&mut self, blend: Blend, target: &mut impl PhysicsTarget) {
        for (index, data) in self.objects.iter().zip(&self.node_data) {
            if data.is_alive {
                target.apply_object(*index, data, blend);
            }
        }

        for (slot, data) in self.projectiles.iter_mut().zip(&self.projectile_data) {
            let alive_here = target.projectile_is_alive(*slot);
            if data.is_alive {
                if !alive_here {
                    *slot = target.spawn_projectile(*slot, data.team);
                }
                target.apply_projectile(*slot, data, blend);
            } else if alive_here {
                target.despawn_projectile(*slot);
            }
        }
    }

    fn notify_delay(&mut self, has_network_delay: bool, report: &mut TickReport) {
        tracing::info!(has_network_delay, "network delay status changed");
        self.stats.delay_transitions += 1;
        report.network_delay_changed = Some(has_network_delay);
        self.listener.network_delay_changed(has_network_delay);
    }
}
