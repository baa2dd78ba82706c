/// Songwriter: mines a text file for rhymed, metered verses.
///
/// Usage: songwriter --input <file.txt> --dict <cmudict.dict>
///                   [--config <song.ron>] [--verses <n>] [--seed <n>]
use songwriter::core::rhymes::PronouncingDictionary;
use songwriter::core::songwriter::{SongConfig, Songwriter};
use std::path::Path;
use std::process;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: songwriter --input <file.txt> --dict <cmudict.dict> \
                     [--config <song.ron>] [--verses <n>] [--seed <n>]";

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    let mut input = None;
    let mut dict_path = None;
    let mut config_path = None;
    let mut verses: Option<usize> = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" if i + 1 < args.len() => {
                i += 1;
                input = Some(args[i].clone());
            }
            "--dict" if i + 1 < args.len() => {
                i += 1;
                dict_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--verses" if i + 1 < args.len() => {
                i += 1;
                verses = Some(args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --verses must be a non-negative integer");
                    process::exit(1);
                }));
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be an integer");
                    process::exit(1);
                });
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input.unwrap_or_else(|| {
        eprintln!("Error: --input is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });
    let dict_path = dict_path.unwrap_or_else(|| {
        eprintln!("Error: --dict is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let mut config = match config_path {
        Some(ref path) => SongConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path, e);
            process::exit(1);
        }),
        None => SongConfig::default(),
    };
    if let Some(n) = verses {
        config.verses = n;
    }

    let start = Instant::now();
    let dict = PronouncingDictionary::load(Path::new(&dict_path)).unwrap_or_else(|e| {
        eprintln!("Error reading dictionary '{}': {}", dict_path, e);
        process::exit(1);
    });
    info!(
        "loaded {} dictionary words in {} ms",
        dict.len(),
        start.elapsed().as_millis()
    );

    let start = Instant::now();
    info!("opening '{}' for processing", input_path);
    let mut writer = Songwriter::builder()
        .seed(seed)
        .with_config(config)
        .build_from_file(Path::new(&input_path), &dict, &dict)
        .unwrap_or_else(|e| {
            eprintln!("Error building rhyme index from '{}': {}", input_path, e);
            process::exit(1);
        });
    info!("rhyme index ready in {} ms", start.elapsed().as_millis());

    let report = writer.write_configured().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    for (n, verse) in report.verses.iter().enumerate() {
        if n > 0 {
            println!();
        }
        println!("{}", verse);
    }

    if !report.failures.is_empty() {
        eprintln!(
            "{} of {} verses could not be assembled",
            report.failures.len(),
            report.requested()
        );
        process::exit(2);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
