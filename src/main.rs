use autotitle::cli::{Args, Command, GuessArgs, RenameArgs};
use autotitle::config::{config_from_env, parse_formats, Config};
use autotitle::error::AppError;
use autotitle::events::{CancelToken, ChannelSink};
use autotitle::media::load_media;
use autotitle::output::{
    display_dry_run, display_dry_run_simple, display_execution_result, display_patterns,
};
use autotitle::pattern::compile;
use autotitle::progress::{should_use_colors, Progress};
use autotitle::rename::{
    rename_targets, OutputSpec, RenameError, RenameJob, RenameOptions, RenameResult, RenameStatus,
    Renamer,
};
use autotitle::scanner::detect_patterns;
use autotitle::logging;
use autotitle::target::{PatternRule, Target};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::thread;
use tracing::{debug, error, info};

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    let config = config_from_env();
    debug!(?config, "Configuration loaded");

    let result = match args.command {
        Command::Rename(rename) => run_rename(rename, &config, args.verbose),
        Command::Guess(guess) => run_guess(guess, &config, args.verbose),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run_rename(args: RenameArgs, config: &Config, verbose: u8) -> Result<(), AppError> {
    let media = load_media(&args.media)?;
    let targets = load_targets(&args)?;

    for target in &targets {
        check_patterns(target)?;
    }

    let options = RenameOptions {
        dry_run: args.dry,
        backup_dir: args
            .backup
            .clone()
            .map(|dir| dir.unwrap_or_else(|| config.backup_dir.clone())),
        formats: args
            .formats
            .as_deref()
            .map(parse_formats)
            .unwrap_or_else(|| config.formats.clone()),
    };

    // Events flow through a bounded queue to a printer thread
    let cancel = CancelToken::new();
    let (sink, events) = ChannelSink::new(config.event_buffer, cancel.clone());
    let colors = should_use_colors();
    let printer = thread::spawn(move || {
        let mut progress = Progress::new_with_ui(verbose > 0, colors);
        for event in events {
            progress.event(&event);
        }
    });

    let renamer = Renamer::new(options).with_events(sink).with_cancel(cancel);

    let jobs: Vec<RenameJob> = targets
        .into_iter()
        .map(|target| RenameJob::new(target, media.clone()))
        .collect();

    let results = match jobs.as_slice() {
        [job] => vec![renamer.execute(&job.target, &job.media)],
        _ => rename_targets(&renamer, &jobs, args.workers.unwrap_or(config.workers))?,
    };

    // Dropping the renamer closes the queue so the printer can finish
    drop(renamer);
    if printer.join().is_err() {
        error!("Event printer panicked");
    }

    report(&args, &jobs, results)
}

/// Print every target's outcome, then turn the worst one into an error
fn report(
    args: &RenameArgs,
    jobs: &[RenameJob],
    results: Vec<Result<RenameResult, RenameError>>,
) -> Result<(), AppError> {
    let mut stdout = std::io::stdout();
    let mut first_error = None;
    let mut failed = 0;
    let mut total = 0;

    for (job, result) in jobs.iter().zip(results) {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                error!(path = ?job.target.path, "{}", e);
                first_error.get_or_insert(AppError::from(e));
                continue;
            }
        };

        failed += result.count(RenameStatus::Failed);
        total += result.len();

        let shown = if args.simple {
            display_dry_run_simple(&result, &mut stdout)
        } else if args.dry {
            display_dry_run(&job.target.path, &result, &mut stdout)
        } else {
            display_execution_result(&job.target.path, &result, &mut stdout)
        };
        shown.map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))?;
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    if failed > 0 {
        return Err(AppError::RenamesFailed { failed, total });
    }

    info!(total, "Rename complete");
    Ok(())
}

fn load_targets(args: &RenameArgs) -> Result<Vec<Target>, AppError> {
    if let Some(path) = &args.targets {
        let file = File::open(path).map_err(|e| {
            AppError::Other(format!("Failed to read targets file {}: {}", path.display(), e))
        })?;
        let targets: Vec<Target> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AppError::Other(format!("Invalid targets file {}: {}", path.display(), e))
        })?;
        return Ok(targets);
    }

    let output = OutputSpec::new(args.fields.iter().cloned(), args.separator.clone())
        .with_offset(args.offset)
        .with_padding(args.padding);
    let rule = PatternRule::new(args.inputs.iter().cloned(), output);

    Ok(args
        .dirs
        .iter()
        .map(|dir| Target::new(dir.clone(), vec![rule.clone()]))
        .collect())
}

/// A target whose templates all fail to compile can never match anything
fn check_patterns(target: &Target) -> Result<(), AppError> {
    let templates: Vec<&String> = target.patterns.iter().flat_map(|r| &r.input).collect();

    let mut first_error = None;
    for template in &templates {
        match compile(template) {
            Ok(_) => return Ok(()),
            Err(source) => {
                first_error.get_or_insert(AppError::InvalidPattern {
                    template: template.to_string(),
                    source,
                });
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn run_guess(args: GuessArgs, config: &Config, verbose: u8) -> Result<(), AppError> {
    let formats = args
        .formats
        .as_deref()
        .map(parse_formats)
        .unwrap_or_else(|| config.formats.clone());

    let scan = detect_patterns(&args.dir, &formats)?;

    if scan.has_media && scan.patterns.is_empty() {
        let mut progress = Progress::new_with_ui(verbose > 0, should_use_colors());
        progress.warn("Could not find an episode number in any file name");
    }

    display_patterns(&args.dir, &scan, &mut std::io::stdout())
        .map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))
}
