//! Shipwright Headless Blueprint Harness
//!
//! Builds every ship blueprint in an unpacked game data tree and reports
//! which ones decode cleanly. Runs entirely in-process, with no rendering and no
//! editing.
//!
//! Usage:
//!   cargo run -p shipwright-simtest -- harness.json
//!   cargo run -p shipwright-simtest -- harness.json --verbose --dump

mod config;

use config::HarnessConfig;
use shipwright_logic::layout::{decode_layout, layout_to_text};
use shipwright_logic::prelude::*;
use shipwright_logic::snapshot::{load_snapshot, save_snapshot};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let dump = args.iter().any(|a| a == "--dump");
    let Some(config_path) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("usage: shipwright-simtest <config.json> [--verbose] [--dump]");
        std::process::exit(2);
    };

    let config = match HarnessConfig::load(Path::new(config_path)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    log::info!("data root: {}", config.data_root.display());

    println!("=== Shipwright Blueprint Harness ===\n");
    let results = run(&config, verbose, dump);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run(config: &HarnessConfig, verbose: bool, dump: bool) -> Vec<TestResult> {
    let mut results = Vec::new();
    let archive = DirArchive::new(&config.data_root);
    let registry = config.registry();

    // 1. Catalog
    println!("--- Catalog ---");
    let source = match CatalogSource::from_archive(&archive, &config.catalog) {
        Ok(s) => s,
        Err(e) => {
            results.push(failure("catalog_read", e.to_string()));
            return results;
        }
    };
    let catalog = match source.parse() {
        Ok(c) => c,
        Err(e) => {
            results.push(failure("catalog_parse", e.to_string()));
            return results;
        }
    };

    let records = if config.blueprints.is_empty() {
        catalog.find_all()
    } else {
        let mut picked = Vec::new();
        for name in &config.blueprints {
            match catalog.first_by_name(name) {
                Some(r) => picked.push(r),
                None => results.push(failure(
                    &format!("find_{}", name),
                    "no such blueprint in catalog".into(),
                )),
            }
        }
        picked
    };
    results.push(TestResult {
        name: "catalog_records".into(),
        passed: !records.is_empty(),
        detail: format!("{} blueprint records selected", records.len()),
    });

    if verbose {
        for record in &records {
            match extract_metadata(*record, &registry) {
                Ok(m) => println!(
                    "  {:32} {:8} {}",
                    m.blueprint_name,
                    if m.is_player_ship { "player" } else { "npc" },
                    m.ship_class
                ),
                Err(e) => println!("  {:32} metadata error: {}", record.name().unwrap_or("?"), e),
            }
        }
    }

    // 2. Build every record
    println!("--- Ship graphs ---");
    let builder = ShipGraphBuilder::new(&archive, &registry);
    for record in records {
        let label = record.name().unwrap_or("<unnamed>").to_string();
        let graph = match builder.build(record) {
            Ok(g) => g,
            Err(e) => {
                results.push(failure(&format!("build_{}", label), e.to_string()));
                continue;
            }
        };
        results.push(TestResult {
            name: format!("build_{}", label),
            passed: true,
            detail: graph.summary(),
        });

        results.push(check_layout_roundtrip(&graph));
        if let Some(dir) = &config.snapshot_dir {
            results.push(check_snapshot(dir, &graph));
        }

        if dump {
            match serde_json::to_string_pretty(&graph) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("cannot dump {}: {}", label, e),
            }
        }
    }

    results
}

fn failure(name: &str, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        detail,
    }
}

// ── Per-graph checks ────────────────────────────────────────────────────

/// Re-encode the decoded layout and make sure it decodes to the same thing.
fn check_layout_roundtrip(graph: &ShipGraph) -> TestResult {
    let name = format!("layout_roundtrip_{}", graph.blueprint_name);
    let text = layout_to_text(&graph.layout);
    match decode_layout(text.as_bytes(), &graph.layout_path) {
        Ok(layout) if layout == graph.layout => TestResult {
            name,
            passed: true,
            detail: format!("{} lines", text.lines().count()),
        },
        Ok(_) => failure(&name, "re-decoded layout differs".into()),
        Err(e) => failure(&name, e.to_string()),
    }
}

/// Write a snapshot, read it back, compare.
fn check_snapshot(dir: &Path, graph: &ShipGraph) -> TestResult {
    let name = format!("snapshot_{}", graph.blueprint_name);
    let path = dir.join(format!("{}.bin", graph.blueprint_name));

    let saved = std::fs::create_dir_all(dir)
        .and_then(|_| File::create(&path))
        .map_err(|e| e.to_string())
        .and_then(|f| save_snapshot(BufWriter::new(f), graph).map_err(|e| e.to_string()));
    if let Err(detail) = saved {
        return failure(&name, detail);
    }

    let loaded = File::open(&path)
        .map_err(|e| e.to_string())
        .and_then(|f| load_snapshot(BufReader::new(f)).map_err(|e| e.to_string()));
    match loaded {
        Ok(g) if &g == graph => TestResult {
            name,
            passed: true,
            detail: path.display().to_string(),
        },
        Ok(_) => failure(&name, "snapshot differs from built graph".into()),
        Err(detail) => failure(&name, detail),
    }
}
