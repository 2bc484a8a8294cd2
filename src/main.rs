//! Submitflow CLI Entry Point
//!
//! Inspects a submission against its workflow.
//!
//! # Usage
//!
//! ```bash
//! # Show where a submission stands
//! submitflow submission.json
//!
//! # Check whether a stage can be visited
//! submitflow submission.json --stage add_metadata
//!
//! # Record a visit to a stage
//! submitflow submission.json --stage cross_list --mark-seen
//!
//! # Use a custom workflow definition
//! submitflow submission.json --workflow workflow.yaml
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use colored::Colorize;
use log::{error, info, warn};

use submitflow::flow::{FlowController, Navigation};
use submitflow::workflow::{load_workflow_definition, SeenRecord, WorkflowProcessor};
use submitflow::{load_submission, select_workflow, FlowConfig, WorkflowDefinition, APP_NAME, VERSION};

/// Command-line configuration parsed from arguments.
#[derive(Debug, Default)]
struct Config {
    submission_path: Option<String>,
    stage: Option<String>,
    workflow_path: Option<String>,
    seen_dir: Option<PathBuf>,
    mark_seen: bool,
    verbose: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME.bold(), VERSION);
    println!("Submission Workflow Engine");
    println!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: submitflow [OPTIONS] <SUBMISSION_JSON>");
    println!();
    println!("Arguments:");
    println!("  <SUBMISSION_JSON>   Path to a submission snapshot");
    println!();
    println!("Options:");
    println!("  --stage ENDPOINT    Check whether the submission may visit a stage");
    println!("  --workflow FILE     Use a workflow definition from a YAML file");
    println!("  --seen-dir DIR      Directory holding seen records");
    println!("  --mark-seen         Mark --stage as seen and save the record");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
    println!();
    println!("Examples:");
    println!("  submitflow submission.json");
    println!("  submitflow submission.json --stage add_metadata");
    println!("  submitflow submission.json --stage cross_list --mark-seen");
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--mark-seen" => {
                config.mark_seen = true;
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--stage" => {
                i += 1;
                if i >= args.len() {
                    return Err("--stage requires an endpoint argument".to_string());
                }
                config.stage = Some(args[i].clone());
            }
            "--workflow" => {
                i += 1;
                if i >= args.len() {
                    return Err("--workflow requires a file argument".to_string());
                }
                config.workflow_path = Some(args[i].clone());
            }
            "--seen-dir" => {
                i += 1;
                if i >= args.len() {
                    return Err("--seen-dir requires a path argument".to_string());
                }
                config.seen_dir = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if config.submission_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                config.submission_path = Some(arg.clone());
            }
        }
        i += 1;
    }

    if config.submission_path.is_none() {
        return Err("Missing submission file".to_string());
    }
    if config.mark_seen && config.stage.is_none() {
        return Err("--mark-seen requires --stage".to_string());
    }

    Ok(config)
}

fn flag(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".dimmed()
    }
}

/// Prints one line per stage with its flags and derived state.
fn print_status(processor: &WorkflowProcessor<'_>) {
    let workflow = processor.workflow();
    let current = processor.current_stage();

    println!(
        "{} ({} stages)",
        workflow.name().bold(),
        workflow.len()
    );
    println!(
        "  {:<22} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "stage", "required", "must see", "complete", "seen", "done"
    );

    for stage in workflow {
        let marker = match current {
            Some(cur) if std::ptr::eq(cur, stage) => "▶".yellow().bold(),
            _ => " ".normal(),
        };
        println!(
            "{} {:<22} {:>8} {:>8} {:>8} {:>8} {:>8}",
            marker,
            stage.endpoint(),
            flag(stage.required),
            flag(stage.must_see),
            flag(processor.is_complete(Some(stage))),
            flag(processor.is_seen(Some(stage))),
            flag(processor.is_done(Some(stage))),
        );
    }
    println!();

    match current {
        Some(stage) => println!("Current stage: {}", stage.display().cyan()),
        None => println!("{}", "All stages are done".green()),
    }
    if processor.complete() {
        println!("{}", "Submission is finalized".green());
    }
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    // Setup logging
    setup_logging(config.verbose);

    // Print banner
    print_banner();

    let submission_path = config.submission_path.unwrap_or_default();
    info!("Loading submission: {}", submission_path);
    let submission = load_submission(&submission_path).map_err(|e| {
        error!("Failed to load submission: {}", e);
        format!("Could not load submission from '{}': {}", submission_path, e)
    })?;

    // Select workflow
    let custom;
    let workflow: &WorkflowDefinition = match config.workflow_path {
        Some(ref path) => {
            info!("Loading workflow: {}", path);
            custom = load_workflow_definition(path)?;
            &custom
        }
        None => select_workflow(&submission),
    };
    info!(
        "Submission {} (version {}) uses workflow '{}'",
        submission.submission_id,
        submission.version,
        workflow.name()
    );

    let mut flow_config = FlowConfig::default();
    if let Some(dir) = config.seen_dir {
        flow_config = flow_config.with_seen_dir(dir);
    }
    let flow = FlowController::new(flow_config);
    let seen_dir = flow.config().seen_dir.clone();
    info!("Seen records: {}", seen_dir.display());

    let mut record = SeenRecord::load_or_new(&seen_dir, submission.submission_id, workflow.name())
        .map_err(|e| {
            error!("Failed to read seen record: {}", e);
            format!("Could not read seen record in '{}': {}", seen_dir.display(), e)
        })?;

    let mut marked = false;
    {
        let mut processor = WorkflowProcessor::new(workflow, &submission, &mut record.steps);
        println!();
        print_status(&processor);

        if let Some(ref endpoint) = config.stage {
            let stage = workflow
                .get(endpoint.as_str())
                .ok_or_else(|| format!("Stage '{}' is not in workflow '{}'", endpoint, workflow.name()))?;

            match flow.before(&processor, stage)? {
                None => {
                    println!("Stage {} is {}", stage.endpoint().bold(), "reachable".green());
                }
                Some(navigation) => {
                    println!("Stage {} is {}", stage.endpoint().bold(), "blocked".red());
                    if let Some(target) = navigation.endpoint() {
                        println!("  Redirects to {}", target.cyan());
                    }
                    if let Navigation::Stage {
                        notice: Some(notice),
                        ..
                    } = &navigation
                    {
                        println!("  {}", notice);
                    }
                }
            }

            if config.mark_seen {
                if processor.is_seen(Some(stage)) {
                    warn!("Stage '{}' was already seen", stage.endpoint());
                }
                processor.mark_seen(Some(stage));
                marked = true;
            }
        }
    }

    if marked {
        record.save(&seen_dir)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("submitflow")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_submission_only() {
        let config = parse_arguments(&args(&["sub.json"])).unwrap();
        assert_eq!(config.submission_path.as_deref(), Some("sub.json"));
        assert!(config.stage.is_none());
        assert!(!config.mark_seen);
    }

    #[test]
    fn test_parse_all_options() {
        let config = parse_arguments(&args(&[
            "sub.json",
            "--stage",
            "cross_list",
            "--workflow",
            "flow.yaml",
            "--seen-dir",
            "/tmp/seen",
            "--mark-seen",
            "--verbose",
        ]))
        .unwrap();

        assert_eq!(config.stage.as_deref(), Some("cross_list"));
        assert_eq!(config.workflow_path.as_deref(), Some("flow.yaml"));
        assert_eq!(config.seen_dir, Some(PathBuf::from("/tmp/seen")));
        assert!(config.mark_seen);
        assert!(config.verbose);
    }

    #[test]
    fn test_usage_example_stage_resolves() {
        let workflow = &*submitflow::workflow::SUBMISSION_WORKFLOW;
        assert!(workflow.get("add_metadata").is_some());
        assert!(workflow.get("metadata").is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_arguments(&args(&[])).is_err());
        assert!(parse_arguments(&args(&["sub.json", "--stage"])).is_err());
        assert!(parse_arguments(&args(&["sub.json", "--mark-seen"])).is_err());
        assert!(parse_arguments(&args(&["a.json", "b.json"])).is_err());
        assert!(parse_arguments(&args(&["sub.json", "--bogus"])).is_err());
    }
}
