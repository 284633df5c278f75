use std::{env, fs, process::ExitCode};
use zether_client::bench_vectors::deterministic_vectors;

fn main() -> ExitCode {
    let vectors = match deterministic_vectors() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("vector generation failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    match env::args().nth(1) {
        Some(dst) => {
            if let Err(e) = fs::write(&dst, vectors) {
                eprintln!("write {dst}: {e}");
                return ExitCode::FAILURE;
            }
            eprintln!("Wrote {dst}");
        }
        None => println!("{vectors}"),
    }
    ExitCode::SUCCESS
}
