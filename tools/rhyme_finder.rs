/// Rhyme Finder: lists perfect rhymes from a pronouncing dictionary.
///
/// Usage: rhyme_finder --dict <cmudict.dict> <word> [<word> ...]
use songwriter::core::rhymes::PronouncingDictionary;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: rhyme_finder --dict <cmudict.dict> <word> [<word> ...]");
        process::exit(0);
    }

    let mut dict_path = None;
    let mut words = Vec::new();

    let mut i = 1;
    while i < args.len() {
        if args[i] == "--dict" && i + 1 < args.len() {
            i += 1;
            dict_path = Some(args[i].clone());
        } else {
            words.push(args[i].clone());
        }
        i += 1;
    }

    let dict_path = dict_path.unwrap_or_else(|| {
        eprintln!("Error: --dict is required");
        process::exit(1);
    });
    if words.is_empty() {
        eprintln!("Error: give at least one word");
        process::exit(1);
    }

    let dict = PronouncingDictionary::load(Path::new(&dict_path)).unwrap_or_else(|e| {
        eprintln!("Error reading dictionary '{}': {}", dict_path, e);
        process::exit(1);
    });

    let mut unknown = 0;
    for word in &words {
        println!("=== {} ===", word);
        match dict.perfect_rhymes_by_syllables(word) {
            None => {
                println!("  (not in dictionary)");
                unknown += 1;
            }
            Some(grouped) if grouped.is_empty() => println!("  (no perfect rhymes)"),
            Some(grouped) => {
                for (syllables, rhymes) in &grouped {
                    println!("  {} syllable(s): {}", syllables, rhymes.join(", "));
                }
            }
        }
    }

    if unknown > 0 {
        process::exit(1);
    }
}
