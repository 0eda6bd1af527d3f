use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::time::Instant;

use niche_finder::niche::GenerateReply;
use niche_finder::{server, Config, NichePipeline, NicheRecord};

const EMPTY_STATE: &str = "No niches found. Try a different keyword.";

#[derive(Parser)]
#[command(name = "niche-finder", about = "Turn a hobby or skill into 50 niche business ideas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print the generation summary after each request
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /api/generate over HTTP
    Serve,
    /// Generate niche ideas for a single term
    Generate {
        /// Hobby, passion, interest or skill
        term: String,
        /// Print the raw JSON response body
        #[arg(long)]
        raw: bool,
    },
    /// Generate for every term in a file, one per line
    Batch {
        /// Path to a text file of terms
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => {
            let addr = config.bind_addr();
            let pipeline = NichePipeline::from_config(config)?;
            server::serve(pipeline, &addr).await?;
        }
        Commands::Generate { term, raw } => {
            let pipeline = NichePipeline::from_config(config)?;
            let (reply, log) = pipeline.generate_with_log(&term).await;

            if raw {
                println!("{}", serde_json::to_string_pretty(&reply.to_json())?);
            } else {
                print_reply(&reply);
            }
            if cli.verbose {
                if let Some(log) = log {
                    eprintln!("{}", log.summary());
                }
            }
            if let GenerateReply::Failed { status_code, .. } = reply {
                anyhow::bail!("generation failed with status {status_code}");
            }
        }
        Commands::Batch { path } => {
            let pipeline = NichePipeline::from_config(config)?;
            let file =
                std::fs::File::open(&path).context(format!("Failed to open terms file: {}", path))?;
            let reader = std::io::BufReader::new(file);

            let mut terms = 0;
            let mut failures = 0;
            let mut total_niches = 0;
            let mut total_latency_ms: u64 = 0;

            for (i, line) in reader.lines().enumerate() {
                let line = line.context("Failed to read line")?;
                let term = line.trim();
                if term.is_empty() {
                    continue;
                }

                eprintln!("\n[{}/...] {}", i + 1, term);
                terms += 1;

                let start = Instant::now();
                let (reply, log) = pipeline.generate_with_log(term).await;
                total_latency_ms += start.elapsed().as_millis() as u64;

                match &reply {
                    GenerateReply::Niches(niches) => {
                        total_niches += niches.len();
                        println!("  {} niches", niches.len());
                    }
                    GenerateReply::Failed { status_code, body } => {
                        failures += 1;
                        eprintln!(
                            "  ERROR ({}): {}",
                            status_code,
                            body.details.as_deref().unwrap_or(&body.error)
                        );
                    }
                }
                if cli.verbose {
                    if let Some(log) = log {
                        println!("  {}", log.summary());
                    }
                }
            }

            if terms > 0 {
                println!("\n=== Batch Summary ===");
                println!("Terms: {} (failures: {})", terms, failures);
                println!("Total niches: {}", total_niches);
                println!(
                    "Avg latency: {:.1}s",
                    total_latency_ms as f64 / terms as f64 / 1000.0
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn print_reply(reply: &GenerateReply) {
    match reply {
        GenerateReply::Niches(niches) if niches.is_empty() => println!("{EMPTY_STATE}"),
        GenerateReply::Niches(niches) => {
            for (i, niche) in niches.iter().enumerate() {
                print_niche(i + 1, niche);
            }
        }
        GenerateReply::Failed { status_code, body } => {
            eprintln!("{} ({})", body.error, status_code);
            if let Some(details) = &body.details {
                eprintln!("  {}", details);
            }
            if let Some(hint) = &body.hint {
                eprintln!("  hint: {}", hint);
            }
        }
    }
}

fn print_niche(n: usize, niche: &NicheRecord) {
    println!("\n{}. {} [{}]", n, niche.title, niche.potential);
    println!("   {}", niche.description);
    println!("   Unique Selling Point: {}", niche.usp);
    println!("   Ideal Audience: {}", niche.audience);
    println!("   Starter Move: {}", niche.starter_action);
}
