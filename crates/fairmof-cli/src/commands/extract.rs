use crate::cli::ExtractArgs;
use crate::config::PartialExtractionConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use fairmof::engine::config::ExtractionConfig;
use fairmof::engine::progress::ProgressReporter;
use fairmof::workflows::batch::{self, BatchInput, BatchReport};
use fairmof::workflows::extract::ExtractionOutcome;
use std::fs;
use std::io::IsTerminal;
use tracing::{info, warn};

pub fn run(args: ExtractArgs) -> Result<()> {
    if args.identifier.is_some() && args.archives.len() > 1 {
        return Err(CliError::Argument(
            "--identifier can only be used with a single archive".to_string(),
        ));
    }

    let partial_config = match &args.config {
        Some(path) => PartialExtractionConfig::from_file(path)?,
        None => PartialExtractionConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;
    prepare_output(&config)?;

    let inputs: Vec<BatchInput> = args
        .archives
        .iter()
        .map(|path| {
            let input = BatchInput::new(path);
            match &args.identifier {
                Some(id) => input.with_identifier(id.clone()),
                None => input,
            }
        })
        .collect();

    let progress_handler = if std::io::stderr().is_terminal() {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Extracting {} archive(s) into {}...",
        inputs.len(),
        config.layout.root.display()
    );
    let report = batch::run(&inputs, &config, &reporter);
    print_summary(&report);

    if report.all_failed() {
        return Err(CliError::BatchFailed(report.items.len()));
    }
    if report.failed() > 0 {
        warn!(
            "{} of {} archive(s) failed.",
            report.failed(),
            report.items.len()
        );
    }
    Ok(())
}

fn prepare_output(config: &ExtractionConfig) -> Result<()> {
    for recognized in [true, false] {
        let dir = config.layout.structure_dir(recognized);
        fs::create_dir_all(&dir)?;
        info!("Output directory ready: {:?}", dir);
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    for item in &report.items {
        match &item.result {
            Ok(ExtractionOutcome::Framework {
                properties,
                sbu_count,
                structure_path,
            }) => println!(
                "  ✓ {}: framework ({} building units, void fraction {:.3}) -> {}",
                item.identifier,
                sbu_count,
                properties.void_fraction,
                structure_path.display()
            ),
            Ok(ExtractionOutcome::NoFramework { structure_path }) => println!(
                "  - {}: no framework -> {}",
                item.identifier,
                structure_path.display()
            ),
            Err(e) => eprintln!("  ✗ {} ({}): {}", item.identifier, item.path.display(), e),
        }
    }
    println!(
        "{} succeeded ({} recognized), {} failed.",
        report.succeeded(),
        report.recognized(),
        report.failed()
    );
}
