//! Word Guesser CLI - Search for low-average guess trees over a word list.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use word_guesser::{
    compute::{evaluate, search::WorkerPool},
    schema::{GeneratorConfig, Vocabulary},
    tree::codec,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <words.txt> [config.json]", args[0]);
        eprintln!();
        eprintln!("Search for a guess tree with a low average number of guesses.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  words.txt    Vocabulary, one word per line after a header line");
        eprintln!("  config.json  Generator configuration (default: built-in defaults)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let words_path = PathBuf::from(&args[1]);

    // Load configuration
    let config: GeneratorConfig = match args.get(2) {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => GeneratorConfig::default(),
    };

    let vocabulary = Vocabulary::load(&words_path).unwrap_or_else(|e| {
        eprintln!("Error loading vocabulary {}: {}", words_path.display(), e);
        std::process::exit(1);
    });
    let vocabulary = Arc::new(vocabulary);

    println!("Word Guesser");
    println!("============");
    println!(
        "Vocabulary: {} entries ({} unique)",
        vocabulary.len(),
        vocabulary.unique_len()
    );
    println!("Workers: {}", config.workers);
    match config.duration_secs {
        Some(secs) => println!("Duration: {}s", secs),
        None => println!("Duration: until interrupted"),
    }
    println!("Checkpoint: {}", config.checkpoint_path.display());
    println!();

    let mut pool = WorkerPool::new(Arc::clone(&vocabulary), &config).unwrap_or_else(|e| {
        eprintln!("Error starting workers: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = pool.start() {
        eprintln!("Error starting workers: {}", e);
        std::process::exit(1);
    }

    let start = Instant::now();
    let report_interval = Duration::from_millis(config.report_interval_ms);
    let duration = config.duration_secs.map(Duration::from_secs);
    let restart_interval = config.restart_interval_secs.map(Duration::from_secs);
    let mut last_restart = Instant::now();
    let mut saved_best = f64::INFINITY;

    while duration.is_none_or(|d| start.elapsed() < d) {
        thread::sleep(report_interval);

        if let Some((id, best)) = pool.global_best() {
            log::info!(
                "{:>6.1}s  global best {:.4} (worker {})",
                start.elapsed().as_secs_f32(),
                best,
                id
            );
            // Keep the file current so an interrupted run loses nothing.
            if best < saved_best {
                match pool.checkpoint(id, &config.checkpoint_path) {
                    Ok(()) => saved_best = best,
                    Err(e) => log::warn!("Checkpoint failed: {}", e),
                }
            }
        }
        for status in pool.statuses() {
            log::debug!("{}", status);
        }

        if let Some(interval) = restart_interval
            && last_restart.elapsed() >= interval
        {
            if let Err(e) = pool.restart_worst_half() {
                log::warn!("Restart failed: {}", e);
            }
            last_restart = Instant::now();
        }
    }

    if let Err(e) = pool.pause() {
        log::warn!("Pause failed: {}", e);
    }

    println!("Final state:");
    for status in pool.statuses() {
        println!("  {}", status);
    }
    println!();

    match pool.checkpoint_best(&config.checkpoint_path) {
        Ok(id) => println!(
            "Best tree from worker {} written to {}",
            id,
            config.checkpoint_path.display()
        ),
        Err(e) => {
            eprintln!("Error writing checkpoint: {}", e);
            pool.shutdown();
            std::process::exit(1);
        }
    }
    pool.shutdown();

    let tree = codec::load(&config.checkpoint_path).unwrap_or_else(|e| {
        eprintln!("Error reading back checkpoint: {}", e);
        std::process::exit(1);
    });
    match evaluate(&tree, vocabulary.entries()) {
        Ok(stats) => {
            println!("  Nodes: {} ({} leaves)", tree.node_count(), tree.leaf_count());
            println!("  Depth: {}", tree.depth());
            println!("  Average guesses: {:.4}", stats.average);
            println!("  Worst case: {} guesses", stats.worst_guesses);
        }
        Err(e) => {
            eprintln!("Checkpointed tree is invalid: {}", e);
            std::process::exit(1);
        }
    }
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());
}

fn print_example_config() {
    let config = GeneratorConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
