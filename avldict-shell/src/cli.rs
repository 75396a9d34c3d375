use avldict_trees::{new_blake2b, new_blake3, Hasher};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "avldict", about = "Dictionary using an AVL tree", version)]
pub struct Cli {
    /// Maximum number of entries the dictionary may hold
    #[arg(long, env = "AVLDICT_MAX_ENTRIES")]
    pub max_entries: Option<usize>,

    /// Hash used for fingerprints and graph labels
    #[arg(long, value_enum, env = "AVLDICT_HASH", default_value_t = HashAlgorithm::Blake3)]
    pub hash: HashAlgorithm,

    /// Do not print the menu or prompts, only results
    #[arg(long)]
    pub no_prompt: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashAlgorithm {
    /// BLAKE3, 32 byte digests
    Blake3,
    /// BLAKE2b-512, 64 byte digests
    Blake2b,
}

impl HashAlgorithm {
    pub fn new_hash(self) -> fn() -> Box<dyn Hasher> {
        match self {
            HashAlgorithm::Blake3 => new_blake3,
            HashAlgorithm::Blake2b => new_blake2b,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, HashAlgorithm};

    #[test]
    fn test_defaults() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["avldict"])?;
        assert_eq!(cli.hash, HashAlgorithm::Blake3);
        assert!(!cli.no_prompt);
        assert!(!cli.verbose && !cli.quiet);
        Ok(())
    }

    #[test]
    fn test_flags() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["avldict", "--hash", "blake2b", "--max-entries", "3", "--no-prompt", "-q"])?;
        assert_eq!(cli.hash, HashAlgorithm::Blake2b);
        assert_eq!(cli.max_entries, Some(3));
        assert!(cli.no_prompt);
        assert!(cli.quiet);
        assert_eq!((cli.hash.new_hash())().finalize().len(), 64);
        Ok(())
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["avldict", "-v", "-q"]).is_err());
    }
}
