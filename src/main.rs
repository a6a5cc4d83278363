// src/main.rs

use addchain::config::ChainConfig;
use addchain::ir::OpCounts;
use addchain::{ensemble, evaluate, find_best, script};
use env_logger::Env;
use log::{error, info};
use num::BigUint;
use serde::Serialize;
use std::process;

/// Machine-readable result of `addchain search --json`.
#[derive(Debug, Serialize)]
struct SearchReport {
    target: String,
    algorithm: String,
    length: usize,
    op_counts: OpCounts,
    chain: Vec<String>,
    script: String,
}

fn usage() -> ! {
    eprintln!("usage:");
    eprintln!("  addchain search <n> [--json]   search for a short addition chain for n");
    eprintln!("  addchain eval <file>           evaluate a chain script");
    process::exit(2);
}

fn parse_target(text: &str) -> Option<BigUint> {
    match text.strip_prefix("0x") {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => BigUint::parse_bytes(text.as_bytes(), 10),
    }
}

fn search(config: &ChainConfig, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let json = args.iter().any(|a| a == "--json");
    let target = match args.iter().find(|a| !a.starts_with("--")) {
        Some(t) => t,
        None => usage(),
    };
    let n = parse_target(target).ok_or_else(|| format!("invalid target {}", target))?;

    let algorithms = ensemble(&config.ensemble);
    let best = find_best(&n, &algorithms, Some(config.threads()))?;
    let program = best.chain.program()?;
    let text = script::decompile(&program);

    if json {
        let report = SearchReport {
            target: n.to_string(),
            algorithm: best.algorithm.clone(),
            length: best.chain.len() - 1,
            op_counts: program.op_counts(),
            chain: best.chain.iter().map(|x| x.to_string()).collect(),
            script: text,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let counts = program.op_counts();
        println!("{}", "=".repeat(80));
        println!("algorithm: {}", best.algorithm);
        println!("length:    {}", best.chain.len() - 1);
        println!("adds:      {}", counts.adds);
        println!("doubles:   {}", counts.doubles);
        println!("{}", "=".repeat(80));
        print!("{}", text);
    }
    Ok(())
}

fn eval(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let path = match args.first() {
        Some(p) => p,
        None => usage(),
    };
    let text = std::fs::read_to_string(path)?;
    let program = script::compile(&text)?;
    let chain = evaluate(&program);
    let value = chain.end().ok_or_else(|| format!("{} produced no values", path))?;
    info!("{}: {} instructions", path, program.len());
    println!("{}", value);
    Ok(())
}

fn main() {
    let config = ChainConfig::load().unwrap_or_else(|e| {
        eprintln!("Error loading configuration, using defaults: {}", e);
        ChainConfig::default()
    });

    // Initialize the logger; RUST_LOG takes precedence over the configured level
    let env = Env::default()
        .filter_or("RUST_LOG", config.log_level.as_str())
        .write_style_or("RUST_LOG_STYLE", "auto");
    env_logger::Builder::from_env(env).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let result = match args[1].as_str() {
        "search" => search(&config, &args[2..]),
        "eval" => eval(&args[2..]),
        _ => usage(),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
