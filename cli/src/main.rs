use std::fs::File;
use std::io::{self, BufWriter};
use std::process;

use anyhow::Result;
use clap::Parser;
use gerp_core::Index;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gerp")]
#[command(about = "Index a directory tree and answer word queries", long_about = None)]
struct Cli {
    /// Directory to index
    input_directory: String,
    /// File that receives query results
    output_file: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let output = match File::create(&cli.output_file) {
        Ok(file) => file,
        Err(_) => {
            println!("Could not open output file");
            process::exit(1);
        }
    };

    let index = match Index::new(&cli.input_directory) {
        Ok(index) => index,
        Err(err) => {
            tracing::error!(%err, "build failed");
            println!("Could not build index, exiting.");
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let code = gerp::run(&index, stdin.lock(), BufWriter::new(output))?;
    process::exit(code);
}
