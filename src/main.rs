//! Locke CLI
//!
//! Command-line tool for scanning and cracking obfuscated binary blobs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use locke::transforms::{cache, expand_families, select_families, Selection};
use locke::{engine, input, report, search, CrackOptions, Registry, Stage};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Deobfuscate binary blobs by searching byte-wise transform families
/// for interesting payloads.
#[derive(Parser, Debug)]
#[command(name = "locke")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for patterns of interest in the supplied files
    Search {
        /// Also write results as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Files to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Use patterns and transforms of interest to crack the supplied file
    Crack {
        /// Enable transform families up to this level (1-3)
        #[arg(short, long, default_value_t = 3)]
        level: i8,

        /// Only use transform families of this exact level
        #[arg(short, long)]
        only: Option<i8>,

        /// Comma-separated transform family names to use
        #[arg(short, long)]
        name: Option<String>,

        /// How many transforms to keep after stage 1
        #[arg(short, long, default_value_t = 20)]
        keep: usize,

        /// How many transforms to save after stage 2
        #[arg(short, long, default_value_t = 10)]
        save: usize,

        /// Treat the input as a zip archive
        #[arg(short = 'z', long = "zip")]
        zip: bool,

        /// Password for the zip archive (requires -z)
        #[arg(long)]
        password: Option<String>,

        /// Do not write decoded outputs or the cracklog to disk
        #[arg(long)]
        no_save: bool,

        /// Output detail: 0 counts, 1 offsets, 2 offsets with hex previews
        #[arg(short = 'v', long = "verbosity", default_value_t = 0,
              value_parser = clap::value_parser!(u8).range(0..=2))]
        verbosity: u8,

        /// Continue without confirmation when some names are unknown
        #[arg(short = 'y', long)]
        yes: bool,

        /// Substitution-table database path
        #[arg(long, default_value = "transforms.db")]
        db: PathBuf,

        /// File to crack
        filename: PathBuf,
    },

    /// List all patterns known by Locke
    Patterns {
        /// Emit the pattern list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List transforms, test for duplicates, or generate the table cache
    Transforms {
        /// Enable transform families up to this level (1-3)
        #[arg(short, long, default_value_t = 3)]
        level: i8,

        /// Only use transform families of this exact level
        #[arg(short, long)]
        only: Option<i8>,

        /// Comma-separated transform family names to use
        #[arg(short, long)]
        name: Option<String>,

        /// Report transforms that produce identical translation tables
        #[arg(short, long)]
        test: bool,

        /// Generate the substitution-table database
        #[arg(short, long)]
        generate: bool,

        /// Substitution-table database path
        #[arg(long, default_value = "transforms.db")]
        db: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "locke=debug" } else { "locke=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Search { csv, files } => cmd_search(csv, &files),
        Command::Crack {
            level,
            only,
            name,
            keep,
            save,
            zip,
            password,
            no_save,
            verbosity,
            yes,
            db,
            filename,
        } => cmd_crack(CrackArgs {
            level,
            only,
            name,
            keep,
            save,
            zip,
            password,
            no_save,
            verbosity,
            yes,
            db,
            filename,
        }),
        Command::Patterns { json } => cmd_patterns(json),
        Command::Transforms {
            level,
            only,
            name,
            test,
            generate,
            db,
        } => cmd_transforms(level, only, name.as_deref(), test, generate, &db),
    }
}

fn cmd_search(csv: Option<PathBuf>, files: &[PathBuf]) -> anyhow::Result<()> {
    let registry = Registry::builtin()?;

    let mut csv_writer = match csv {
        Some(path) => {
            println!("Writing CSV results to {}", path.display());
            Some(csv::Writer::from_path(path)?)
        }
        None => None,
    };

    for file in files {
        println!("{}", "=".repeat(79));
        println!("File: {}\n", file.display());

        let data = input::read_file(file)
            .with_context(|| format!("reading {}", file.display()))?;
        for hits in engine::scan_stage(&registry, Stage::Two, &data) {
            for m in &hits.matches {
                let mstr = report::preview(&m.data);
                println!("at {:08X}: {} - {}", m.offset, hits.description, mstr);

                if let Some(writer) = &mut csv_writer {
                    writer.serialize(report::CsvRecord {
                        filename: file.display().to_string(),
                        offset: format!("0x{:08X}", m.offset),
                        pattern: hits.description.clone(),
                        matched: mstr,
                        length: m.data.len(),
                    })?;
                }
            }
        }
        println!();
    }

    if let Some(mut writer) = csv_writer {
        writer.flush()?;
    }
    Ok(())
}

struct CrackArgs {
    level: i8,
    only: Option<i8>,
    name: Option<String>,
    keep: usize,
    save: usize,
    zip: bool,
    password: Option<String>,
    no_save: bool,
    verbosity: u8,
    yes: bool,
    db: PathBuf,
    filename: PathBuf,
}

fn cmd_crack(args: CrackArgs) -> anyhow::Result<()> {
    if args.password.is_some() && !args.zip {
        return Err(locke::LockeError::PasswordWithoutZip.into());
    }

    let data = if args.zip {
        input::read_zip_interactive(&args.filename, args.password.as_deref())?
    } else {
        input::read_file(&args.filename)
            .with_context(|| format!("reading {}", args.filename.display()))?
    };

    let registry = Registry::builtin()?;
    let selection = select_families(args.name.as_deref(), args.only, args.level, false)?;
    confirm_unknown(&selection, args.yes)?;

    let work = expand_families(&selection.families, &args.db)?;
    let options = CrackOptions {
        keep: args.keep,
        save: args.save,
    };
    let results = search::run(&registry, work, &data, &options);

    print!("{}", report::format_results(&results, args.verbosity));

    if !args.no_save {
        for outcome in report::write_results(&results, &data, &args.filename)? {
            match outcome.path {
                Some(path) => println!("Wrote {} to file {}", outcome.name, path.display()),
                None => println!("Skipping write of {} as score == 0", outcome.name),
            }
        }
        let log = report::write_cracklog(&results, &args.filename)?;
        println!("Ranked summary written to {}", log.display());
    }
    Ok(())
}

/// Report unknown family names and let the operator confirm or abort.
fn confirm_unknown(selection: &Selection, yes: bool) -> anyhow::Result<()> {
    if selection.unknown.is_empty() {
        return Ok(());
    }
    println!("No transformation found for:\n{:?}", selection.unknown);
    if !yes {
        print!("Do you wish to continue? (y/n) ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        if answer.trim().eq_ignore_ascii_case("n") {
            return Err(locke::LockeError::SelectionAborted.into());
        }
    }
    println!("---------------------------");
    Ok(())
}

fn cmd_patterns(json: bool) -> anyhow::Result<()> {
    let registry = Registry::builtin()?;

    if json {
        #[derive(serde::Serialize)]
        struct PatternInfo {
            stage: u8,
            description: &'static str,
            weight: u64,
        }
        let infos: Vec<PatternInfo> = registry
            .all()
            .iter()
            .map(|p| PatternInfo {
                stage: p.stage.number(),
                description: p.description,
                weight: p.weight,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = registry
        .all()
        .iter()
        .map(|p| {
            vec![
                p.stage.number().to_string(),
                p.description.to_string(),
                p.weight.to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        report::format_table(&["Stage", "Description", "Weight"], &rows)
    );
    Ok(())
}

fn cmd_transforms(
    level: i8,
    only: Option<i8>,
    name: Option<&str>,
    test: bool,
    generate: bool,
    db: &std::path::Path,
) -> anyhow::Result<()> {
    let selection = select_families(name, only, level, true)?;

    if test {
        let groups = cache::duplicate_groups(&selection.families);
        for group in &groups {
            println!("{}", group.join(" == "));
        }
        println!("{} duplicated translation tables", groups.len());
        return Ok(());
    }

    if generate {
        println!("Generating new {}", db.display());
        let count = cache::generate(db, &selection.families)?;
        println!("Found {count} unique translation tables");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = selection
        .families
        .iter()
        .map(|f| {
            vec![
                f.level().to_string(),
                f.ident().to_string(),
                f.description().to_string(),
                f.params_help().to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        report::format_table(&["Level", "Name", "Description", "Params"], &rows)
    );
    Ok(())
}
