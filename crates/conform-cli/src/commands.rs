use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use conform_core::{
    evaluate_record, verify_suite, InputRecord, Instruction, InstructionKind, InstructionParams,
    InstructionSuite, ResponseRecord, Toolkit,
};
use conform_runtime::{
    generate_responses, translate_records, CompletionConfig, DriverConfig, LlmProvider,
    OpenAiProvider, RetryPolicy, TranslationConfig,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::cli::{Commands, ProviderArgs};

pub async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => list(),
        Commands::Describe { id, kwargs, seed } => describe(&id, kwargs.as_deref(), seed),
        Commands::Verify {
            suite,
            response,
            seed,
        } => verify(&suite, response.as_deref(), seed),
        Commands::Evaluate {
            input,
            responses,
            output,
            seed,
        } => evaluate(&input, &responses, output.as_deref(), seed),
        Commands::Generate {
            input,
            output,
            provider,
        } => {
            let (client, config) = provider_setup(&provider).await?;
            let reader = open_input(input.as_deref()).await?;
            let writer = open_output(output.as_deref()).await?;
            let summary = generate_responses(&client, &config, reader, writer).await?;
            tracing::info!(
                records = summary.records,
                failures = summary.failures,
                "generation finished"
            );
            Ok(())
        }
        Commands::Translate {
            input,
            output,
            source_language,
            target_language,
            provider,
        } => {
            let (client, config) = provider_setup(&provider).await?;
            let translation = TranslationConfig {
                source_language,
                target_language,
            };
            let reader = open_input(input.as_deref()).await?;
            let writer = open_output(output.as_deref()).await?;
            let summary = translate_records(&client, &config, &translation, reader, writer).await?;
            tracing::info!(records = summary.records, "translation finished");
            Ok(())
        }
    }
}

fn rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

fn list() -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for kind in InstructionKind::ALL {
        writeln!(out, "{:<45} {}", kind.id(), kind.args_keys().join(", "))?;
    }
    Ok(())
}

fn describe(id: &str, kwargs: Option<&str>, seed: Option<u64>) -> anyhow::Result<()> {
    let params: InstructionParams = match kwargs {
        Some(text) => serde_yaml::from_str(text).context("invalid --kwargs")?,
        None => InstructionParams::default(),
    };

    let mut instruction = Instruction::from_id(id)?;
    let description = instruction.build_description(&params, &mut rng(seed))?;
    println!("{description}");
    if let Some(args) = instruction.get_instruction_args()? {
        println!("{}", serde_json::to_string(&args)?);
    }
    Ok(())
}

fn verify(suite: &Path, response: Option<&Path>, seed: Option<u64>) -> anyhow::Result<()> {
    let suite = InstructionSuite::from_yaml_file(suite)
        .with_context(|| format!("failed to load suite {}", suite.display()))?;
    let response = match response {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read response {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?,
    };

    let report = verify_suite(&suite, &response, &Toolkit::shared(), &mut rng(seed))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_jsonl<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid record", path.display(), index + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn evaluate(
    input: &Path,
    responses: &Path,
    output: Option<&Path>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let records: Vec<InputRecord> = read_jsonl(input)?;
    let responses: HashMap<String, Option<String>> = read_jsonl::<ResponseRecord>(responses)?
        .into_iter()
        .map(|r| (r.prompt, r.response))
        .collect();

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let toolkit = Toolkit::shared();
    let mut rng = rng(seed);
    let mut missing = 0;
    for record in &records {
        let response = match responses.get(&record.prompt) {
            Some(response) => response.as_deref(),
            None => {
                tracing::warn!(key = ?record.key, "no response for prompt");
                missing += 1;
                None
            }
        };

        let report = evaluate_record(record, response, &toolkit, &mut rng)
            .with_context(|| format!("failed to evaluate record {:?}", record.key))?;
        serde_json::to_writer(&mut writer, &report)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::info!(records = records.len(), missing, "evaluation finished");
    Ok(())
}

async fn provider_setup(args: &ProviderArgs) -> anyhow::Result<(OpenAiProvider, DriverConfig)> {
    let mut provider = OpenAiProvider::from_arg_or_env(args.api_key.clone())
        .context("no API key: pass --api-key or set OPENAI_API_KEY")?;
    if let Some(url) = &args.base_url {
        provider = provider.with_base_url(url.as_str())?;
    }
    anyhow::ensure!(
        provider.health_check().await,
        "{} provider is not usable",
        provider.name()
    );
    tracing::info!(
        provider = provider.name(),
        base_url = provider.base_url(),
        model = %args.model,
        "provider ready"
    );

    let mut completion = CompletionConfig::new(args.model.as_str()).with_timeout(args.timeout);
    completion.max_tokens = args.max_tokens;
    let config = DriverConfig::new(completion, RetryPolicy::new(args.retries, args.retry_delay));
    Ok((provider, config))
}

async fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    Ok(match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(tokio::io::BufReader::new(file))
        }
        None => Box::new(tokio::io::BufReader::new(tokio::io::stdin())),
    })
}

async fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn AsyncWrite + Unpin + Send>> {
    Ok(match path {
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(tokio::io::BufWriter::new(file))
        }
        None => Box::new(tokio::io::stdout()),
    })
}
