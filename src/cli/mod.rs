use crate::config::{Config, LogFormat};
use crate::function::GopassSecretFunction;
use crate::provider::GopassProvider;
use crate::stream::ResourceStream;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "gopass-secret",
    version,
    about = "Resolve gopass placeholders in Kubernetes Secrets (KRM function)"
)]
pub struct Cli {
    /// Configuration file (YAML, JSON or TOML).
    #[arg(short, long, env = "GOPASS_SECRET_CONFIG")]
    pub config: Option<PathBuf>,
    /// Read resources from a file instead of stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Write resources to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub gopass_bin: Option<String>,
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// File and environment configuration with command-line flags on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(binary) = &self.gopass_bin {
            config.gopass.binary = binary.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.gopass.timeout_secs = secs;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

/// Run the function over one input stream.
pub async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let provider = Arc::new(GopassProvider::from_config(&config.gopass));
    info!("Resolving secrets with '{}'", provider.binary());
    let function = GopassSecretFunction::new(provider);

    let input = read_input(cli.input.as_deref())?;
    let output = transform(&function, &input).await?;
    write_output(cli.output.as_deref(), &output)
}

/// Parse `input`, run `function` over it and serialize the result.
pub async fn transform(function: &GopassSecretFunction, input: &str) -> Result<String> {
    let mut stream = ResourceStream::parse(input).context("reading resources")?;
    function.process(&mut stream.items).await?;
    let output = stream.to_yaml().context("writing resources")?;
    Ok(output)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input '{}'", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write output '{}'", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write stdout")
        }
    }
}
