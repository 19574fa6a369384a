//! Server/client physics synchronization for shotsync.
//!
//! A [`SyncSession`] replicates rigid-body state from one authoritative peer
//! to any number of clients over an unreliable, unordered transport.
//!
//! - The server calls [`SyncSession::broadcast`] once per simulation tick.
//! - Clients feed arriving bytes to an [`Inbox`] from the network thread and
//!   call [`SyncSession::update_from_received_data`] once per simulation tick.
//!
//! Clients never block on the network. A [`PlayoutBuffer`] absorbs jitter:
//! it waits for a full buffer after a stall, stretches packets over two ticks
//! when supply is low, and drops stale or duplicate packets. Sustained
//! starvation is reported through [`SyncListener::network_delay_changed`].
//!
//! # Design Principles
//!
//! - **Explicit collaborators** - Physics, audio and transport are traits the caller implements.
//! - **Degrade, don't fail** - Lost, late and malformed packets are never errors.
//! - **Short critical sections** - The shared lock covers queue operations only.

mod config;
mod delay;
mod error;
mod inbox;
mod playout;
mod session;
mod stats;
mod transport;
mod world;

pub use config::{SyncConfig, MAX_PACKET_COUNT};
pub use delay::DelayTracker;
pub use error::{RegistryKind, SyncError, SyncResult};
pub use inbox::Inbox;
pub use playout::{PlayoutBuffer, PlayoutStep, PlayoutTick, StepKind};
pub use session::{Role, SyncSession, TickReport};
pub use stats::SessionStats;
pub use transport::Transport;
pub use world::{Blend, NoopListener, PhysicsSource, PhysicsTarget, SyncListener};
