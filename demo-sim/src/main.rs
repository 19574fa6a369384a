mod link;
mod rng;
mod world;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use codec::{CollisionEvent, ObjectIndex};
use serde::Serialize;
use session::{Role, SessionStats, SyncConfig, SyncListener, SyncSession};
use tracing_subscriber::EnvFilter;

use crate::link::LossyLink;
use crate::world::{MirrorWorld, ServerWorld};

const TICK_RATE: f64 = 60.0;

#[derive(Parser)]
#[command(
    name = "demo-sim",
    version,
    about = "Deterministic server/client physics sync capture generator"
)]
struct Cli {
    /// Number of replicated level objects.
    #[arg(long, default_value_t = 24)]
    objects: u16,
    /// Size of the projectile pool.
    #[arg(long, default_value_t = 6)]
    projectiles: u16,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// RNG seed for deterministic results.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Probability that the link drops a packet.
    #[arg(long, default_value_t = 0.05)]
    loss: f64,
    /// Maximum link delay in ticks; packets are delayed 1..=N ticks.
    #[arg(long, default_value_t = 3)]
    max_jitter: u32,
    /// Optional session config JSON, applied to both sides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory for captures.
    #[arg(long, default_value = "captures")]
    out_dir: PathBuf,
    /// Fail if the average packet size exceeds this value.
    #[arg(long)]
    max_avg_bytes: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir {}", cli.out_dir.display()))?;

    let mut world = ServerWorld::new(cli.objects, cli.projectiles, cli.seed);
    let mut mirror = MirrorWorld::default();
    let mut server = SyncSession::new(Role::Server, config.clone()).context("server session")?;
    let mut client = SyncSession::new(Role::Client, config.clone())
        .context("client session")?
        .with_listener(TraceListener);
    for index in world.object_indices() {
        let initial = world.snapshot(index).unwrap_or_default();
        server.register_object(index, initial)?;
        client.register_object(index, initial)?;
    }
    for index in world.projectile_indices() {
        let initial = world.snapshot(index).unwrap_or_default();
        server.register_projectile(index, initial)?;
        client.register_projectile(index, initial)?;
    }

    let inbox = client.inbox();
    let mut link = LossyLink::new(cli.seed ^ 0x5EED, cli.loss, cli.max_jitter);
    let mut summary = Summary::new(&cli);
    let dt = (1.0 / TICK_RATE) as f32;

    for tick in 0..cli.ticks {
        for (index, event) in world.step(dt) {
            server.queue_sound(index, event)?;
            summary.sounds_queued += 1;
        }

        let mut outgoing = Vec::new();
        server.broadcast(tick, &world, &mut outgoing)?;
        for bytes in outgoing {
            validate_packet(&bytes, &config.limits)?;
            let path = cli.out_dir.join(format!("packet_{tick:06}.bin"));
            write_packet(&path, &bytes)?;
            summary.push_packet(bytes.len() as u64);
            link.send(tick, bytes);
        }

        for bytes in link.deliver(tick) {
            if let Err(err) = inbox.receive_bytes(&bytes) {
                tracing::warn!(%err, "client rejected packet");
            }
        }

        let now = Duration::from_secs_f64(tick as f64 / TICK_RATE);
        let report = client
            .update_from_received_data(now, &mut mirror)
            .context("client tick")?;
        summary.sounds_played += report.sounds_played as u64;
    }

    summary.finalize(&server, &client, link.dropped(), &world, &mirror);
    tracing::info!(
        packets = summary.packets_sent,
        avg_bytes = summary.avg_packet_bytes,
        applied = summary.client.packets_applied,
        starvations = summary.client.starvations,
        "simulation finished"
    );
    summary.assert_budgets(cli.max_avg_bytes)?;
    write_summary_json(&cli.out_dir, &summary)?;

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    let Some(path) = path else {
        return Ok(SyncConfig::default());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    SyncConfig::from_json_str(&contents).with_context(|| format!("parse config {}", path.display()))
}

fn write_packet(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}

fn write_summary_json(out_dir: &Path, summary: &Summary) -> Result<()> {
    let path = out_dir.join("summary.json");
    let contents = serde_json::to_string_pretty(summary).context("serialize summary")?;
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn validate_packet(bytes: &[u8], limits: &wire::Limits) -> Result<()> {
    let report = tools::inspect_packet(bytes, limits).context("inspect packet")?;
    if report.bit_len.div_ceil(8) != bytes.len() {
        anyhow::bail!(
            "packet {} is {} bytes but carries {} bits",
            report.packet_number,
            bytes.len(),
            report.bit_len
        );
    }
    Ok(())
}

struct TraceListener;

impl SyncListener for TraceListener {
    fn network_delay_changed(&mut self, has_network_delay: bool) {
        if has_network_delay {
            tracing::warn!("client reports network delay");
        } else {
            tracing::info!("client network delay cleared");
        }
    }

    fn collision_sound(&mut self, index: ObjectIndex, event: CollisionEvent) {
        tracing::trace!(%index, note = event.note, velocity = event.velocity, "collision sound");
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    objects: u16,
    projectiles: u16,
    ticks: u64,
    seed: u64,
    loss: f64,
    max_jitter: u32,
    packets_sent: u64,
    packets_dropped_by_link: u64,
    bytes_total: u64,
    avg_packet_bytes: u64,
    p95_packet_bytes: u64,
    max_packet_bytes: u64,
    sounds_queued: u64,
    sounds_played: u64,
    client_spawns: u64,
    client_despawns: u64,
    /// Mean distance between server and client object positions at the end.
    mean_position_error: f32,
    server: SessionStats,
    client: SessionStats,
    #[serde(skip)]
    packet_sizes: Vec<u64>,
}

impl Summary {
    fn new(cli: &Cli) -> Self {
        Self {
            objects: cli.objects,
            projectiles: cli.projectiles,
            ticks: cli.ticks,
            seed: cli.seed,
            loss: cli.loss,
            max_jitter: cli.max_jitter,
            packets_sent: 0,
            packets_dropped_by_link: 0,
            bytes_total: 0,
            avg_packet_bytes: 0,
            p95_packet_bytes: 0,
            max_packet_bytes: 0,
            sounds_queued: 0,
            sounds_played: 0,
            client_spawns: 0,
            client_despawns: 0,
            mean_position_error: 0.0,
            server: SessionStats::default(),
            client: SessionStats::default(),
            packet_sizes: Vec::new(),
        }
    }

    fn push_packet(&mut self, bytes: u64) {
        self.packets_sent += 1;
        self.bytes_total += bytes;
        self.packet_sizes.push(bytes);
    }

    fn finalize(
        &mut self,
        server: &SyncSession,
        client: &SyncSession,
        dropped: u64,
        world: &ServerWorld,
        mirror: &MirrorWorld,
    ) {
        self.server = server.stats();
        self.client = client.stats();
        self.packets_dropped_by_link = dropped;
        self.client_spawns = mirror.spawned;
        self.client_despawns = mirror.despawned;
        if !self.packet_sizes.is_empty() {
            self.avg_packet_bytes = self.bytes_total / self.packets_sent;
            self.packet_sizes.sort_unstable();
            let idx = ((self.packet_sizes.len() as f64) * 0.95).ceil() as usize;
            let idx = idx.saturating_sub(1).min(self.packet_sizes.len() - 1);
            self.p95_packet_bytes = self.packet_sizes[idx];
            self.max_packet_bytes = self.packet_sizes[self.packet_sizes.len() - 1];
        }

        let mut total = 0.0f32;
        let mut count = 0u32;
        for index in world.object_indices() {
            if let (Some(truth), Some(copy)) = (world.body(index), mirror.body(index)) {
                total += truth.position.distance(copy.position);
                count += 1;
            }
        }
        if count > 0 {
            self.mean_position_error = total / count as f32;
        }
    }

    fn assert_budgets(&self, max_avg: Option<u64>) -> Result<()> {
        if let Some(max_avg) = max_avg {
            if self.avg_packet_bytes > max_avg {
                anyhow::bail!(
                    "avg packet bytes {} exceeds budget {}",
                    self.avg_packet_bytes,
                    max_avg
                );
            }
        }
        Ok(())
    }
}
