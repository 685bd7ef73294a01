use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use diversitybase::catalog::{CategoryCatalog, Gender};
use diversitybase::config::{self, AppConfig};
use diversitybase::generation::{
    AgeRange, BatchRequest, HttpImageBackend, JobController, JobState, OutputLayout,
    SelectionMode,
};
use diversitybase::profiles::{ProfileAssembler, TraitOverrides};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DIVERSITYBASE_LOG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse()?;
    let config = config::load_or_default()?;

    if args.init_config {
        config::save(&config)?;
        println!("Configuration written to {}", config::config_file_path()?.display());
        return Ok(());
    }

    let output_root = match &args.output {
        Some(path) => path.clone(),
        None => config.generation.resolved_output_dir()?,
    };
    let layout = OutputLayout::new(output_root);

    if args.list {
        for file in layout.list_generated_files()? {
            println!("{}", file.display());
        }
        return Ok(());
    }

    let controller = build_controller(&config, &args, layout)?;
    let request = args.to_request(&config)?;
    controller.start(request)?;

    let mut last_reported = usize::MAX;
    while controller.is_running() {
        let status = controller.status();
        let done = status.completed + status.failed;
        if done != last_reported {
            println!("{}", status.describe());
            last_reported = done;
        }
        thread::sleep(Duration::from_millis(250));
    }

    let status = controller.wait();
    println!("{}", status.describe());
    if let Some(dir) = &status.output_dir {
        println!("Output: {}", dir.display());
    }
    if status.state == JobState::Failed {
        bail!("Generation failed");
    }
    Ok(())
}

fn build_controller(config: &AppConfig, args: &CliArgs, layout: OutputLayout) -> Result<JobController> {
    let catalog = match &config.catalog.overrides_file {
        Some(path) => CategoryCatalog::with_overrides_file(path)?,
        None => CategoryCatalog::builtin(),
    };
    let assembler = ProfileAssembler::new(Arc::new(catalog), config.sampling);
    let base_url = args
        .backend_url
        .clone()
        .unwrap_or_else(|| config.backend.base_url.clone());
    let backend = HttpImageBackend::new(base_url, config.backend.timeout)?;
    Ok(JobController::new(
        assembler,
        Arc::new(backend),
        layout,
        config.generation.max_batch_size,
    ))
}

struct CliArgs {
    nationality: String,
    gender: Option<Gender>,
    count: u32,
    min_age: u32,
    max_age: u32,
    balanced: bool,
    traits: Vec<(String, String)>,
    backend_url: Option<String>,
    output: Option<PathBuf>,
    list: bool,
    init_config: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut parsed = Self {
            nationality: "venezuelan".to_string(),
            gender: None,
            count: 1,
            min_age: 18,
            max_age: 80,
            balanced: false,
            traits: Vec::new(),
            backend_url: None,
            output: None,
            list: false,
            init_config: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--nationality" => {
                    parsed.nationality = args.next().context("Expected a value after --nationality")?;
                }
                "--gender" => {
                    let value = args.next().context("Expected a value after --gender")?;
                    parsed.gender = Some(value.parse()?);
                }
                "--count" | "-n" => {
                    let value = args.next().context("Expected a number after --count")?;
                    parsed.count = value
                        .parse()
                        .with_context(|| format!("Invalid count '{value}'"))?;
                }
                "--min-age" => {
                    let value = args.next().context("Expected a number after --min-age")?;
                    parsed.min_age = value
                        .parse()
                        .with_context(|| format!("Invalid age '{value}'"))?;
                }
                "--max-age" => {
                    let value = args.next().context("Expected a number after --max-age")?;
                    parsed.max_age = value
                        .parse()
                        .with_context(|| format!("Invalid age '{value}'"))?;
                }
                "--balanced" => parsed.balanced = true,
                "--trait" => {
                    let value = args.next().context("Expected category=value after --trait")?;
                    let (category, choice) = value
                        .split_once('=')
                        .with_context(|| format!("Expected category=value, got '{value}'"))?;
                    parsed.traits.push((category.to_string(), choice.to_string()));
                }
                "--backend" => {
                    parsed.backend_url = Some(args.next().context("Expected a URL after --backend")?);
                }
                "--output" => {
                    parsed.output = Some(PathBuf::from(
                        args.next().context("Expected a directory after --output")?,
                    ));
                }
                "--list" => parsed.list = true,
                "--init-config" => parsed.init_config = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(parsed)
    }

    fn to_request(&self, config: &AppConfig) -> Result<BatchRequest> {
        let gender = self
            .gender
            .context("--gender is required (male/hombre or female/mujer)")?;
        let mut overrides = TraitOverrides::new();
        for (category, value) in &self.traits {
            overrides.set_from_str(category, value)?;
        }
        Ok(BatchRequest {
            nationality: self.nationality.clone(),
            gender,
            ages: AgeRange::new(self.min_age, self.max_age)?,
            count: self.count,
            mode: if self.balanced {
                SelectionMode::Balanced
            } else {
                SelectionMode::Independent
            },
            overrides,
            image: config.generation.image.clone(),
        })
    }
}

fn print_usage() {
    println!("DiversityBase batch generator");
    println!("Generates a batch of diverse synthetic profiles and renders them through the image backend.");
    println!("Usage: cargo run --bin generate -- --gender <male|female> [options]");
    println!("Options:");
    println!("  --nationality <name>     Nationality label (default: venezuelan)");
    println!("  --gender <value>         male/man/hombre or female/woman/mujer");
    println!("  --count, -n <number>     Profiles to generate (default: 1)");
    println!("  --min-age <years>        Lower age bound, clamped to 18 (default: 18)");
    println!("  --max-age <years>        Upper age bound, clamped to 80 (default: 80)");
    println!("  --balanced               Spread category values evenly across the batch");
    println!("  --trait <category=value> Fix a category (repeatable); 'random' keeps it random");
    println!("  --backend <url>          Image backend base URL (default from config)");
    println!("  --output <dir>           Output root (default from config)");
    println!("  --list                   List generated images and exit");
    println!("  --init-config            Write the current configuration to config.toml and exit");
    println!("Set {LOG_ENV}=debug for verbose logs.");
}
