use affixgen::cli::output::{self, OutputFormat};
use affixgen::{rules::loader, AffixProcessor, Config};
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "affixgen")]
#[command(version, about = "Expand and validate dictionary stems with affix rules", long_about = None)]
struct Cli {
    /// Rule table to load (TOML, or JSON by extension)
    #[arg(short, long, env = "AFFIXGEN_RULES")]
    rules: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long)]
    format: Option<OutputFormat>,

    /// Ignore flags beyond this many per stem
    #[arg(long, value_name = "N")]
    max_flags: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if a word is rejected
    #[arg(long)]
    no_fail: bool,

    /// Print rule lookup and cache counters to stderr
    #[arg(long)]
    stats: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// List every form derivable from a stem
    Expand {
        stem: String,
        #[arg(default_value = "")]
        flags: String,
    },
    /// Tell whether a stem is a word without any affix
    Valid {
        stem: String,
        #[arg(default_value = "")]
        flags: String,
    },
    /// Tell whether a word is one of the forms of a stem
    Check {
        word: String,
        stem: String,
        #[arg(default_value = "")]
        flags: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "affixgen", &mut io::stdout());
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("No command specified. Use --help for usage information.");
    };

    let config = Config::load(cli.rules, cli.max_flags, cli.format)?;
    let colored = config.color && !cli.no_color;

    let rules_path = config.rules_path()?;
    let dictionary = loader::load_from_path(rules_path)
        .with_context(|| format!("Failed to load rule table: {}", rules_path.display()))?;
    dictionary
        .ensure_usable()
        .with_context(|| format!("Rule table is unusable: {}", rules_path.display()))?;

    let processor = AffixProcessor::new(dictionary).with_flag_limit(config.max_flag_tokens);

    let accepted = match &command {
        Commands::Expand { stem, flags } => {
            let forms = processor.expand_word(stem, flags);
            output::print_expansion(stem, flags, &forms, colored, &config.format)?;
            true
        }
        Commands::Valid { stem, flags } => {
            let valid = processor.is_valid_with_affixes(stem, flags);
            output::print_validity(stem, flags, valid, colored, &config.format)?;
            valid
        }
        Commands::Check { word, stem, flags } => {
            let found = processor.generates(word, stem, flags);
            output::print_check(word, stem, flags, found, colored, &config.format)?;
            found
        }
    };

    if cli.stats {
        output::print_stats(&processor.stats(), colored);
    }

    if !accepted && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}
