use clipline::cli::{apply_edits, Args};
use clipline::config::{self, TimelineSettings};
use clipline::entities::{AssetCatalog, ProjectDoc, Timeline};
use clipline::widgets::timeline::project_layout;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

fn init_logging(args: &Args, path_config: &config::PathConfig) -> Result<()> {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| config::data_file(config::LOG_FILE, path_config));

        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!(
            "Logging to file: {} (level: {:?})",
            log_path.display(),
            log_level
        );
    } else {
        // Console logging (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }
    init_logging(&args, &path_config)?;

    info!("clipline {} starting", env!("CARGO_PKG_VERSION"));
    debug!("Command-line args: {:?}", args);

    let settings_path = config::config_file(config::SETTINGS_FILE, &path_config);
    let settings = TimelineSettings::load(&settings_path)?;
    debug!("Settings from {}: {:?}", settings_path.display(), settings);

    let catalog = match &args.catalog {
        Some(path) => AssetCatalog::from_file(path)?,
        None => AssetCatalog::default(),
    };

    let mut timeline = Timeline::with_settings(settings);
    if let Some(path) = &args.file_path {
        timeline.set_json(ProjectDoc::from_file(path)?)?;
    }

    let report = apply_edits(&args, &mut timeline, &catalog)?;

    if let Some(output) = &args.output {
        timeline.get_json().to_file(output)?;
    }

    if args.layout {
        let layout = project_layout(&timeline);
        println!("{}", serde_json::to_string_pretty(&layout)?);
    }
    if args.segments {
        println!("{}", serde_json::to_string_pretty(&timeline.kept_segments())?);
    }

    println!(
        "{} clips, {} cuts, {:.2}s after cuts ({} cut(s) made, {} rejected)",
        timeline.clips().len(),
        timeline.cuts().len(),
        timeline.duration_of_clips_minus_cuts(),
        report.cuts_made,
        report.cuts_rejected
    );
    Ok(())
}
