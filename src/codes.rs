use std::borrow::Cow;
use std::env;
use std::fs;
use std::time::Instant;

use log::{debug, error, info, warn};

use huffman_heap::{Config, HuffmanTree, count_frequencies, entropy};

fn usage(program: &str) {
    error!(
        "Usage: {} <input_file> [--single-bit] [--node-limit=N]",
        program
    );
    eprintln!("  📂 <input_file>:     text file whose characters get codes.");
    eprintln!("  🔢 --single-bit:     give a one-symbol alphabet the code '0'.");
    eprintln!("  🧱 --node-limit=N:   refuse to build trees larger than N nodes.");
}

/// Decodes the input as UTF-8, replacing bad sequences with U+FFFD.
/// The flag is false when any replacement happened.
fn input_text(raw: &[u8]) -> (Cow<'_, str>, bool) {
    let text = String::from_utf8_lossy(raw);
    let valid = matches!(text, Cow::Borrowed(_));
    (text, valid)
}

fn main() {
    env_logger::init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| String::from("codes"));

    let (config, positional) = match Config::from_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("{}", e);
            usage(&program);
            std::process::exit(1);
        }
    };
    let Some(input_filepath) = positional.first() else {
        usage(&program);
        std::process::exit(1);
    };
    if positional.len() > 1 {
        warn!("Ignoring extra arguments: {:?}", &positional[1..]);
    }

    info!("Reading input file: {}", input_filepath);
    let raw_data = match fs::read(input_filepath) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read input file: {}", e);
            std::process::exit(1);
        }
    };
    let (text, valid) = input_text(&raw_data);
    if !valid {
        warn!(
            "{} is not valid UTF-8; invalid sequences are counted as U+FFFD",
            input_filepath
        );
    }
    let (code_points, frequencies) = count_frequencies(&text);
    debug!("Unique symbols: {}", code_points.len());

    let start_time = Instant::now();
    let tree = match HuffmanTree::build_with(&code_points, &frequencies, &config) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Could not build Huffman tree: {}", e);
            std::process::exit(1);
        }
    };
    debug!("Tree built in {:.2?}.", start_time.elapsed());

    for (code_point, code) in tree.codes(config.single_symbol) {
        println!("{}: {}", code_point.escape_default(), code);
    }

    let total_symbols: u64 = frequencies.iter().sum();
    let total_bits = tree.weighted_length(config.single_symbol);
    let file_entropy = entropy(&frequencies);
    let average = if total_symbols > 0 {
        total_bits as f64 / total_symbols as f64
    } else {
        0.0
    };

    println!(
        "\r\n✅ Codes built.\n\
         📂  Input:       {} ({} symbols, {} unique)\n\
         💾  Encoded:     {} bits\n\
         ℹ️  Entropy:     {:.4} bits/symbol\n\
         📏  Average:     {:.4} bits/symbol",
        input_filepath,
        total_symbols,
        code_points.len(),
        total_bits,
        file_entropy,
        average
    );

    let released = tree.destroy_with(drop);
    info!("Released {} tree nodes.", released);
}
