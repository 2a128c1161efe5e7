// ABOUTME: Main entry point for the deckgen program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use deckgen::{
    Config, ContentRequest, GeminiGenerator, NamingPolicy, OutlineParser, Pipeline, RecoveryPolicy,
    Tier,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a PPTX deck from an outline file
    Build(BuildArgs),

    /// Parse an outline file and print the slides as JSON
    Parse(ParseArgs),

    /// Print the plain text extracted from a source document
    Extract(ExtractArgs),

    /// Generate an outline with the language model and build a deck from it
    Generate(GenerateArgs),
}

#[derive(Args)]
struct DeckArgs {
    /// Directory the deck is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Style tier
    #[arg(long, value_enum)]
    tier: Option<Tier>,

    /// How the output file is named
    #[arg(long, value_enum)]
    naming: Option<NamingPolicy>,

    /// Fail on content found before the first slide header
    #[arg(long)]
    reject_malformed: bool,
}

#[derive(Args)]
struct BuildArgs {
    /// Path to the outline file
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    deck: DeckArgs,
}

#[derive(Args)]
struct ParseArgs {
    /// Path to the outline file
    #[arg(short, long)]
    input: PathBuf,

    /// Fail on content found before the first slide header
    #[arg(long)]
    reject_malformed: bool,
}

#[derive(Args)]
struct ExtractArgs {
    /// Path to a txt, md, csv, docx or pdf file
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Args)]
struct GenerateArgs {
    /// Presentation topic
    #[arg(long)]
    topic: String,

    /// Source document to summarise
    #[arg(long)]
    file: Option<PathBuf>,

    /// Number of slides to ask for
    #[arg(long, default_value_t = 5)]
    slides: usize,

    #[arg(long)]
    audience: Option<String>,

    #[arg(long)]
    purpose: Option<String>,

    #[arg(long)]
    style: Option<String>,

    #[arg(long)]
    complexity: Option<String>,

    #[arg(long)]
    language: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    #[command(flatten)]
    deck: DeckArgs,
}

fn load_config(args: &DeckArgs) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(tier) = args.tier {
        config.tier = tier;
    }
    if let Some(naming) = args.naming {
        config.naming = naming;
    }
    if args.reject_malformed {
        config.recovery = RecoveryPolicy::Reject;
    }
    Ok(config)
}

fn recovery(reject: bool) -> RecoveryPolicy {
    if reject {
        RecoveryPolicy::Reject
    } else {
        RecoveryPolicy::Synthesize
    }
}

fn run(command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Build(args) => {
            let config = load_config(&args.deck)?;
            let outline = fs::read_to_string(&args.input)
                .with_context(|| format!("Failed to read outline {:?}", args.input))?;

            let response = deckgen::build_from_outline(&config, &outline)?;
            println!("{}", response.pptx_path.display());
        }
        Commands::Parse(args) => {
            let outline = fs::read_to_string(&args.input)
                .with_context(|| format!("Failed to read outline {:?}", args.input))?;
            let slides = OutlineParser::new(recovery(args.reject_malformed)).parse(&outline)?;
            println!("{}", serde_json::to_string_pretty(&slides)?);
        }
        Commands::Extract(args) => {
            println!("{}", deckgen::extract(&args.input)?);
        }
        Commands::Generate(args) => {
            let config = load_config(&args.deck)?;
            let generator = GeminiGenerator::new(config.get_generator_settings()?)?;

            let defaults = ContentRequest::default();
            let request = ContentRequest {
                topic: args.topic.clone(),
                text: String::new(),
                num_slides: args.slides,
                style: args.style.clone().unwrap_or(defaults.style),
                complexity: args.complexity.clone().unwrap_or(defaults.complexity),
                audience: args.audience.clone().unwrap_or(defaults.audience),
                purpose: args.purpose.clone().unwrap_or(defaults.purpose),
                language: args.language.clone().unwrap_or(defaults.language),
                notes: args.notes.clone().unwrap_or(defaults.notes),
            };

            let response = Pipeline::new(config, &generator).run(request, args.file.as_deref())?;
            if let Some(warning) = &response.warning {
                eprintln!("{}", warning);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match &cli.command {
        Some(command) => run(command),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
