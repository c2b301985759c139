use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use crate::core::time::ApparentTime;
use crate::entities::{AssetProvider, Timeline};

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Non-destructive clip/cut editor for recorded sessions
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Project file to load (JSON with clips and cutSpans) - optional, starts empty
    #[arg(value_name = "FILE")]
    pub file_path: Option<PathBuf>,

    /// Recordings catalog: JSON array of {"name", "duration"}
    #[arg(long = "catalog", value_name = "CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Append a recording from the catalog (can be specified multiple times)
    #[arg(short = 'a', long = "append", value_name = "NAME")]
    pub append: Vec<String>,

    /// Insert a recording from the catalog before clip INDEX
    #[arg(long = "insert", value_names = ["NAME", "INDEX"], num_args = 2)]
    pub insert: Option<Vec<String>>,

    /// Delete clip N together with its cuts
    #[arg(long = "delete-clip", value_name = "N")]
    pub delete_clip: Option<usize>,

    /// Cut apparent range START..END in seconds (can be specified multiple times)
    #[arg(long = "cut", value_names = ["START", "END"], num_args = 2, action = clap::ArgAction::Append, allow_negative_numbers = true)]
    pub cuts: Vec<f64>,

    /// Remove cut N, restoring its interval
    #[arg(long = "uncut", value_name = "N")]
    pub uncut: Option<usize>,

    /// Zoom slider position (0 = widest, 1 = closest)
    #[arg(long = "zoom", value_name = "0..1")]
    pub zoom: Option<f64>,

    /// Pan slider position over the scrollable range
    #[arg(long = "pan", value_name = "0..1")]
    pub pan: Option<f64>,

    /// Play-head position in apparent seconds
    #[arg(long = "play-head", value_name = "SECONDS")]
    pub play_head: Option<f64>,

    /// Print the timeline layout as JSON
    #[arg(long = "layout")]
    pub layout: bool,

    /// Print the kept source segments (edit decision list) as JSON
    #[arg(long = "segments")]
    pub segments: bool,

    /// Save the resulting project to FILE
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug logging to file (default: clipline.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

/// What `apply_edits` did, for the closing summary.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EditReport {
    pub cuts_made: usize,
    pub cuts_rejected: usize,
}

impl Args {
    /// `--insert NAME INDEX` split into its parts.
    pub fn insert_target(&self) -> Result<Option<(&str, usize)>> {
        let Some(values) = &self.insert else {
            return Ok(None);
        };
        let [name, index] = values.as_slice() else {
            bail!("--insert takes NAME INDEX");
        };
        let index = index
            .parse()
            .with_context(|| format!("Invalid clip index for --insert: {}", index))?;
        Ok(Some((name.as_str(), index)))
    }

    /// `--cut` values as `(start, end)` pairs.
    pub fn cut_ranges(&self) -> Vec<(f64, f64)> {
        self.cuts.chunks_exact(2).map(|p| (p[0], p[1])).collect()
    }
}

fn lookup(assets: &dyn AssetProvider, name: &str) -> Result<(String, f64)> {
    match assets.find(name) {
        Some(asset) => Ok((asset.name, asset.duration)),
        None => bail!("Unknown recording '{}' (not in catalog)", name),
    }
}

/// Apply command-line edits in a fixed order: delete, insert, append, uncut,
/// cut, then view changes. A rejected cut is reported and skipped; anything
/// else aborts.
pub fn apply_edits(args: &Args, timeline: &mut Timeline, assets: &dyn AssetProvider) -> Result<EditReport> {
    let mut report = EditReport::default();

    if let Some(index) = args.delete_clip {
        let clip = timeline.delete_clip(index)?;
        info!("Deleted clip {} '{}'", index, clip.name);
    }

    if let Some((name, index)) = args.insert_target()? {
        let (name, duration) = lookup(assets, name)?;
        timeline.insert_clip(name, duration, index)?;
    }

    for name in &args.append {
        let (name, duration) = lookup(assets, name)?;
        timeline.create_clip(name, duration);
    }

    if let Some(index) = args.uncut {
        let span = timeline.delete_cut(index)?;
        info!("Restored {:.2}s of clip {}", span.duration(), span.clip_index);
    }

    for (start, end) in args.cut_ranges() {
        if !timeline.select_range(ApparentTime(start), ApparentTime(end)) {
            warn!("Cut {:.2}..{:.2} selects nothing, skipped", start, end);
            report.cuts_rejected += 1;
            continue;
        }
        match timeline.create_cut() {
            Ok(_) => report.cuts_made += 1,
            Err(reason) => {
                eprintln!("Warning: cut {:.2}..{:.2}: {}", start, end, reason);
                report.cuts_rejected += 1;
            }
        }
    }
    timeline.clear_selection();

    if let Some(zoom) = args.zoom {
        timeline.set_zoom(zoom);
    }
    if let Some(pan) = args.pan {
        timeline.set_time(pan);
    }
    if let Some(t) = args.play_head {
        timeline.set_play_head_time(ApparentTime(t));
    }
    Ok(report)
}
