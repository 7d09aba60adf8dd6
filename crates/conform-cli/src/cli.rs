use clap::{Args, Parser, Subcommand};
use conform_runtime::config::{DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};
use conform_runtime::parse_duration;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "conform", version, about = "Verifiable instruction checks for model responses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List every instruction id with its parameter keys.
    List,

    /// Build one instruction and print its description and realized parameters.
    Describe {
        /// Instruction id, e.g. `keywords:frequency`.
        id: String,

        /// Explicit parameters as a JSON or YAML mapping.
        #[arg(long)]
        kwargs: Option<String>,

        /// Seed for sampling unset parameters.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check one response against an instruction suite (YAML/JSON).
    Verify {
        /// Path to the suite file.
        suite: PathBuf,

        /// File holding the response (else read stdin).
        #[arg(long, short)]
        response: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Grade generated responses against their input records.
    ///
    /// Responses are matched to records by prompt. Writes one report per
    /// record as JSONL.
    Evaluate {
        /// Input records (JSONL with `prompt`, `instruction_id_list`, `kwargs`).
        #[arg(long, short)]
        input: PathBuf,

        /// Responses (JSONL with `prompt`, `response`).
        #[arg(long)]
        responses: PathBuf,

        /// Output file (else stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate one model response per prompt.
    Generate {
        /// Input JSONL (else stdin).
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output JSONL (else stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Translate every string value of every record.
    Translate {
        /// Input JSONL (else stdin).
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output JSONL (else stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_SOURCE_LANGUAGE)]
        source_language: String,

        #[arg(long, default_value = DEFAULT_TARGET_LANGUAGE)]
        target_language: String,

        #[command(flatten)]
        provider: ProviderArgs,
    },
}

/// Completion-service flags shared by `generate` and `translate`.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    /// API key (else `OPENAI_API_KEY`).
    #[arg(long)]
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, default_value = "gpt-4o-mini")]
    pub model: String,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Attempts per record, including the first.
    #[arg(long, default_value_t = 3)]
    pub retries: usize,

    /// Delay before the first retry; doubles on each further retry.
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub retry_delay: Duration,

    /// Per-request timeout.
    #[arg(long, default_value = "60s", value_parser = parse_duration)]
    pub timeout: Duration,
}
