use std::path::PathBuf;

use clap::Parser;
use ringscan_common::{Config, Dedupe, MatchSemantics};

/// Ringscan - search transaction graphs for circular money flows
#[derive(Parser, Debug)]
#[command(name = "ringscan")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV edge list with a `src,dst[,type]` header. Without it a built-in
    /// demo market is scanned.
    #[arg(short = 'f', long)]
    pub edges: Option<PathBuf>,

    /// Pattern to search for: a registered name or `cycle-N`
    #[arg(short = 'P', long, default_value = ringscan_subgraph::CIRCULAR)]
    pub pattern: String,

    /// Inject a directed ring through these accounts before scanning
    #[arg(long, value_delimiter = ',')]
    pub inject: Vec<String>,

    /// Only match transfers whose `type` column is `fraud`
    #[arg(long, default_value_t = false)]
    pub fraud_only: bool,

    /// JSON file with a search configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Set match semantics
    #[arg(long, value_enum)]
    pub semantics: Option<SemanticsArg>,

    /// Set result deduplication
    #[arg(long, value_enum)]
    pub dedupe: Option<DedupeArg>,

    /// Give up after this many search extensions
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Enable parallel execution
    #[arg(short = 'p', long, default_value_t = false)]
    pub parallel: bool,

    /// Write every kept mapping as CSV to this file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let base = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                serde_json::from_str::<Config>(&text)?
            }
            None => Config::default(),
        };

        let mut builder = Config::builder()
            .semantics(base.semantics)
            .dedupe(base.dedupe)
            .allow_empty_pattern(base.allow_empty_pattern)
            .parallel(base.parallel || self.parallel);
        if let Some(steps) = self.max_steps.or(base.max_steps) {
            builder = builder.max_steps(steps);
        }
        if let Some(semantics) = self.semantics.clone() {
            builder = builder.semantics(semantics.into());
        }
        if let Some(dedupe) = self.dedupe.clone() {
            builder = builder.dedupe(dedupe.into());
        }
        Ok(builder.build())
    }
}

/// Command-line argument wrapper for MatchSemantics
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum SemanticsArg {
    /// Extra transfers among matched accounts are allowed
    #[value(name = "monomorphism")]
    Monomorphism,
    /// Matched accounts carry exactly the pattern's transfers
    #[value(name = "induced")]
    Induced,
}

impl From<SemanticsArg> for MatchSemantics {
    fn from(arg: SemanticsArg) -> Self {
        match arg {
            SemanticsArg::Monomorphism => MatchSemantics::Monomorphism,
            SemanticsArg::Induced => MatchSemantics::Induced,
        }
    }
}

/// Command-line argument wrapper for Dedupe
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum DedupeArg {
    /// Report every raw mapping
    #[value(name = "none")]
    None,
    /// One result per group of accounts
    #[value(name = "node-set")]
    NodeSet,
}

impl From<DedupeArg> for Dedupe {
    fn from(arg: DedupeArg) -> Self {
        match arg {
            DedupeArg::None => Dedupe::None,
            DedupeArg::NodeSet => Dedupe::NodeSet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "ringscan",
            "--dedupe",
            "node-set",
            "--semantics",
            "induced",
            "--max-steps",
            "50",
            "--inject",
            "a,b,c",
        ]);
        let config = args.to_config().unwrap();
        assert!(config.dedupe.node_set());
        assert!(config.semantics.is_induced());
        assert_eq!(config.max_steps, Some(50));
        assert_eq!(args.inject, vec!["a", "b", "c"]);
        assert_eq!(args.pattern, "circular");
    }
}
