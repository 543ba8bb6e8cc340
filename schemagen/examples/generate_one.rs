//! Generate a single schematic and print it: pass library files and a
//! weight table on the command line.

use schemagen::prelude::*;
use std::path::PathBuf;

fn main() -> Result<(), SchemagenError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --example generate_one <weights.conf> <lib.kicad_sym>...");
        std::process::exit(1);
    }

    let weights = WeightTable::from_file(&PathBuf::from(&args[0]))?;
    let libraries: Vec<PathBuf> = args[1..].iter().map(PathBuf::from).collect();
    let catalogs = import_catalogs(&libraries);

    let mut rng = rand::thread_rng();
    let document = SchemagenCore::generate_document(
        &catalogs,
        &weights,
        20,
        &GenerationOptions::default(),
        &mut rng,
    )?;

    print!("{document}");
    Ok(())
}
