use clap::{Parser, Subcommand};
use std::io::Cursor;
use std::path::PathBuf;

use cpya::filter::{FileFilter, ProjectArchiveFilter};
use cpya::sheet::decode_sheets;
use cpya::{magic, read_archive, ScientificArray};

#[derive(Parser)]
#[command(name = "cpya", about = "Project-archive inspection and conversion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the magic line and walk the block structure
    Info {
        input: PathBuf,
    },
    /// List sheets and their columns
    List {
        input: PathBuf,
    },
    /// Decode every dataset and print it
    Dump {
        input: PathBuf,
        /// Emit JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },
    /// Save a dataset (JSON-encoded array) through a template archive
    Save {
        /// JSON file holding the array to store
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Dataset name stored in the archive (truncated to 24 chars)
        #[arg(short, long)]
        name: String,
        /// Template archive to patch
        #[arg(short, long, default_value = cpya::filter::DEFAULT_TEMPLATE)]
        template: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    match Cli::parse().command {
        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let bytes = std::fs::read(&input)?;
            let mut stream = Cursor::new(bytes);
            let token = magic::sniff(&mut stream)?;

            println!("── Project archive ─────────────────────────────────────");
            println!("  Path            {}", input.display());
            println!("  Format version  {}", token.version);
            println!("{:>5}  {:>10}  First bytes", "Block", "Size");

            let mut count = 0usize;
            loop {
                match cpya::block::read_block(&mut stream) {
                    Ok(Some(payload)) => {
                        let head = &payload[..payload.len().min(12)];
                        println!("{count:>5}  {:>10}  {}", payload.len(), hex::encode(head));
                        count += 1;
                    }
                    Ok(None) => {
                        println!("{count:>5}  {:>10}  (end of data section)", 0);
                        break;
                    }
                    Err(e) => {
                        println!("  stopped after {count} block(s): {e}");
                        break;
                    }
                }
            }
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input } => {
            let bytes = std::fs::read(&input)?;
            let mut stream = Cursor::new(bytes);
            magic::sniff(&mut stream)?;
            let sheets = decode_sheets(&mut stream)?;

            println!("Archive: {}", input.display());
            for sheet in &sheets.sheets {
                println!("  sheet {:?} ({} column(s))", sheet.name, sheet.columns.len());
                for column in &sheet.columns {
                    println!("    column {:?}  {} cell(s)", column.tag, column.values.len());
                }
            }
        }

        // ── Dump ─────────────────────────────────────────────────────────────
        Commands::Dump { input, json } => {
            let arrays = read_archive(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&arrays)?);
            } else {
                for array in &arrays {
                    println!("{}  shape {:?}", array.name, array.shape);
                    for (dim, axis) in array.axes.iter().enumerate() {
                        println!("  axis {dim}: {} point(s)", axis.len());
                    }
                    println!("  data: {} value(s)", array.elements());
                }
            }
        }

        // ── Save ─────────────────────────────────────────────────────────────
        Commands::Save { input, output, name, template } => {
            let array: ScientificArray = serde_json::from_slice(&std::fs::read(&input)?)?;
            let filter = ProjectArchiveFilter::new(template);
            filter.save(&output, &array, &name)?;
            println!("Saved {:?} → {}", name, output.display());
        }
    }

    Ok(())
}
