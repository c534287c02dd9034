// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

/*!
Connectome Generation Tool

Builds a sparse weighted connectome for one subject from an MRI Studio
fiber-track file, an atlas volume and a brain mask.

Usage:
  cargo run --bin gengraph -- [config.toml]

With no argument the configuration is discovered via BRAINGRAPH_CONFIG_PATH
or a braingraph.toml in the current directory or its parents.

Copyright 2025 Open Connectome Project
Licensed under the Apache License, Version 2.0
*/

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use braingraph::config::{load_config, validate_config};
use braingraph::connectome::GraphBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 {
        eprintln!("Usage: {} [config.toml]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} subjects/s1/braingraph.toml", args[0]);
        std::process::exit(1);
    }

    let config_path = args.get(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    validate_config(&config)?;

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.system.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🧠 Braingraph Connectome Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Fibers:  {}", config.subject.fiber_path.display());
    println!("📂 Atlas:   {}", config.subject.atlas_data.display());
    println!("📂 Mask:    {}", config.subject.mask_data.display());
    println!("📂 Output:  {}", config.subject.output_path.display());
    println!("   Variant: {}", config.graph.variant);
    println!();

    println!("🔄 Streaming fibers...");
    let report = GraphBuilder::run(&config)?;

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Build complete!");
    println!("   Fibers:    {}", report.fiber_count);
    println!("   Dimension: {}", report.connectome.dimension);
    println!("   Edges:     {}", report.connectome.edge_count());
    println!(
        "   Saved to:  {}",
        config.subject.output_path.display()
    );

    Ok(())
}
