use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use tools::{
    decode_packet_json, format_decode_pretty, format_fingerprint, format_inspect_report,
    inspect_packet,
};
use wire::Limits;

#[derive(Parser)]
#[command(
    name = "shotsync-tools",
    version,
    about = "shotsync packet inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect packet lists and sizes.
    Inspect {
        /// Path to a packet file or a directory of captures.
        packet_path: PathBuf,
        /// Optional limits JSON; defaults to the protocol maximums.
        #[arg(long)]
        limits: Option<PathBuf>,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected packets.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected packets (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode a packet into its full contents.
    Decode {
        /// Path to the packet bytes.
        packet_file: PathBuf,
        /// Optional limits JSON; defaults to the protocol maximums.
        #[arg(long)]
        limits: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
    /// Print the protocol fingerprint and field contract.
    Fingerprint,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            packet_path,
            limits,
            glob,
            sort,
            limit,
        } => {
            let limits = load_limits(limits.as_deref())?;
            if packet_path.is_dir() {
                let entries = collect_packet_entries(&packet_path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    let bytes = fs::read(&entry.path)
                        .with_context(|| format!("read packet {}", entry.path.display()))?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    match inspect_packet(&bytes, &limits) {
                        Ok(report) => print!("{}", format_inspect_report(&report)),
                        Err(err) => println!("  malformed: {err}"),
                    }
                }
            } else {
                let bytes = fs::read(&packet_path)
                    .with_context(|| format!("read packet {}", packet_path.display()))?;
                let report = inspect_packet(&bytes, &limits)
                    .with_context(|| format!("decode packet {}", packet_path.display()))?;
                print!("{}", format_inspect_report(&report));
            }
        }
        Command::Decode {
            packet_file,
            limits,
            format,
        } => {
            let limits = load_limits(limits.as_deref())?;
            let bytes = fs::read(&packet_file)
                .with_context(|| format!("read packet {}", packet_file.display()))?;
            let output = decode_packet_json(&bytes, &limits)
                .with_context(|| format!("decode packet {}", packet_file.display()))?;
            match format {
                DecodeFormat::Json => {
                    let json = serde_json::to_string_pretty(&output).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_decode_pretty(&output));
                }
            }
        }
        Command::Fingerprint => print!("{}", format_fingerprint()),
    }
    Ok(())
}

fn load_limits(path: Option<&Path>) -> Result<Limits> {
    let Some(path) = path else {
        return Ok(Limits::default());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read limits {}", path.display()))?;
    serde_json::from_str(&contents).context("parse limits json")
}

struct PacketEntry {
    path: PathBuf,
    size: u64,
}

fn collect_packet_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<PacketEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(PacketEntry { path, size });
    }
    // read_dir order is platform-defined
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn maybe_sort_entries(
    mut entries: Vec<PacketEntry>,
    sort: Option<InspectSort>,
) -> Vec<PacketEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}
