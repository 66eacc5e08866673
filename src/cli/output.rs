use crate::affix::ProcessorStats;
use anyhow::Result;
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonExpansion<'a> {
    stem: &'a str,
    flags: &'a str,
    forms: &'a [String],
}

#[derive(Debug, Serialize)]
struct JsonValidity<'a> {
    stem: &'a str,
    flags: &'a str,
    valid: bool,
}

#[derive(Debug, Serialize)]
struct JsonCheck<'a> {
    word: &'a str,
    stem: &'a str,
    flags: &'a str,
    accepted: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_expansion(
    stem: &str,
    flags: &str,
    forms: &[String],
    colored_output: bool,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&JsonExpansion { stem, flags, forms }),
        OutputFormat::Text => {
            let header = format!("{}/{}", stem, flags);
            if colored_output {
                println!("{}", header.bold().underline());
            } else {
                println!("{}", header);
            }

            for form in forms {
                if form == stem {
                    println!("  {}", form);
                } else if colored_output {
                    println!("  {}", form.green());
                } else {
                    println!("  {}", form);
                }
            }

            let form_word = if forms.len() == 1 { "form" } else { "forms" };
            if colored_output {
                println!("{}", format!("{} {}", forms.len(), form_word).dimmed());
            } else {
                println!("{} {}", forms.len(), form_word);
            }
            Ok(())
        }
    }
}

pub fn print_validity(
    stem: &str,
    flags: &str,
    valid: bool,
    colored_output: bool,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&JsonValidity { stem, flags, valid }),
        OutputFormat::Text => {
            let message = if valid {
                format!("✓ {} is valid on its own", stem)
            } else {
                format!("✗ {} is only valid with an affix", stem)
            };
            println!("{}", paint(message, valid, colored_output));
            Ok(())
        }
    }
}

pub fn print_check(
    word: &str,
    stem: &str,
    flags: &str,
    accepted: bool,
    colored_output: bool,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&JsonCheck {
            word,
            stem,
            flags,
            accepted,
        }),
        OutputFormat::Text => {
            let message = if accepted {
                format!("✓ {} is a form of {}/{}", word, stem, flags)
            } else {
                format!("✗ {} is not a form of {}/{}", word, stem, flags)
            };
            println!("{}", paint(message, accepted, colored_output));
            Ok(())
        }
    }
}

/// Cache and lookup counters, written to stderr so stdout stays parseable.
pub fn print_stats(stats: &ProcessorStats, colored_output: bool) {
    let line = format!(
        "rule lookups: {}, expansions: {}, cache hits: {}",
        stats.rule_lookups, stats.expansions, stats.cache_hits
    );
    if colored_output {
        eprintln!("{}", line.dimmed());
    } else {
        eprintln!("{}", line);
    }
}

fn paint(message: String, ok: bool, colored_output: bool) -> String {
    match (colored_output, ok) {
        (false, _) => message,
        (true, true) => message.green().bold().to_string(),
        (true, false) => message.red().bold().to_string(),
    }
}
