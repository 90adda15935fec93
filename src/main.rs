mod cli;

use clipcheck::analysis::Analyzer;
use clipcheck::config;
use clipcheck::storage::UploadStore;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipcheck=trace,clipcheck_av=trace,tower_http=debug".to_string()
        } else {
            "clipcheck=debug,clipcheck_av=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            config.server.host = host;
            config.server.port = port;

            tracing::info!("Starting clipcheck server");

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(clipcheck::server::start_server(config))
        }
        Commands::Analyze { input, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(analyze_file(&input, &config, json))
        }
        Commands::Probe { file, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(probe_file(&file, &config, json))
        }
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("clipcheck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn analyze_file(input: &Path, config: &config::Config, json: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let display_name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| input.to_string_lossy().to_string());

    let store = UploadStore::new(
        config.storage.upload_dir.clone(),
        config.storage.max_upload_bytes(),
    )?;
    let analyzer = Analyzer::new(&config.analysis, &config.tools);

    // Stream a working copy into the store; analysis consumes and removes
    // it, leaving the user's original untouched.
    let mut pending = store.begin(&display_name).await?;
    let mut reader = std::fs::File::open(input)?;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        pending.write_chunk(&buf[..n]).await?;
    }
    let stored = pending.finish().await?;

    let result = analyzer.analyze(stored, &store).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let info = &result.video_info;
    println!("File: {}", info.filename);
    if let Some(size) = info.file_size_bytes {
        println!("Size: {} bytes", size);
    }
    if let Some(d) = info.duration_seconds {
        println!("Duration: {:.1}s", d);
    }
    if let Some(res) = info.resolution {
        print!("Resolution: {}", res);
        if let Some(tier) = info.quality_tier {
            print!(" ({})", tier);
        }
        println!();
    }
    if let Some(mbps) = info.bitrate_mbps {
        println!("Bitrate: {:.2} Mbps", mbps);
    }

    let q = &result.quality_analysis;
    println!(
        "\nScore: {}/100 ({:?}, confidence {:.2})",
        q.total, q.confidence_level, q.confidence
    );
    for indicator in &q.indicators {
        println!("  {}", indicator);
    }
    println!(
        "Likely original: {}",
        if result.is_original_likely { "yes" } else { "no" }
    );

    println!("\nFrames: {}", result.frames.len());
    for frame in &result.frames {
        println!(
            "  [{}] {:.1}s -> {}",
            frame.index, frame.timestamp_seconds, frame.reference
        );
    }

    Ok(())
}

async fn probe_file(file: &Path, config: &config::Config, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let ffprobe = config
        .tools
        .ffprobe_path
        .clone()
        .unwrap_or_else(|| "ffprobe".into());
    let prober = clipcheck_av::Prober::new(
        ffprobe,
        Duration::from_secs(config.analysis.probe_timeout_secs),
    );

    let display_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string_lossy().to_string());

    let metadata = prober.probe(file, &display_name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("File: {}", metadata.filename);
    if let Some(size) = metadata.file_size_bytes {
        println!("Size: {} bytes", size);
    }
    match metadata.duration_seconds {
        Some(d) => println!("Duration: {:.1}s", d),
        None => println!("Duration: unknown"),
    }
    match metadata.resolution {
        Some(res) => {
            print!("Resolution: {}", res);
            if let Some(tier) = metadata.quality_tier {
                print!(" ({})", tier);
            }
            println!();
        }
        None => println!("Resolution: unknown"),
    }
    match metadata.bitrate_mbps {
        Some(mbps) => println!("Bitrate: {:.2} Mbps", mbps),
        None => println!("Bitrate: unknown"),
    }
    if let Some(created) = metadata.created_at {
        println!("Created: {}", created);
    }
    if let Some(modified) = metadata.modified_at {
        println!("Modified: {}", modified);
    }

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = clipcheck_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upload dir: {:?}", config.storage.upload_dir);
            println!("  Upload cap: {} MB", config.storage.max_upload_mb);
            println!("  Frames per clip: {}", config.analysis.num_frames);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
