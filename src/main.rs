use anyhow::{Context, Result};
use clap::Parser;
use eventview::cli::{Cli, OutputFormat};
use eventview::config::EventViewConfig;
use eventview::hit::{EventId, RawHitRecord};
use eventview::{aggregate, batch, csv_output, input, json_output, text_output};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG or warn
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (if any) with command-line overrides applied
fn load_config(args: &Cli) -> Result<EventViewConfig> {
    let mut config = match &args.config {
        Some(path) => EventViewConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EventViewConfig::default(),
    };

    if let Some(coverage) = args.coverage {
        config.coverage_fraction = coverage;
    }
    if let Some(min_modules) = args.min_modules {
        config.min_modules = min_modules;
    }
    if let Some(policy) = args.zero_charge {
        config.zero_charge_policy = policy;
    }
    config.validate()?;
    Ok(config)
}

/// Events requested on the command line, in display order
fn select_events(
    args: &Cli,
    records: &[RawHitRecord],
    config: &EventViewConfig,
) -> Result<Vec<EventId>> {
    let events = match (args.run, args.event) {
        (Some(run), Some(event)) => vec![EventId::new(run, event)],
        (None, None) if args.all => aggregate::first_events(records, usize::MAX),
        (None, None) => match args.events {
            Some(n) => aggregate::first_events(records, n),
            None => aggregate::select_event(records, config.min_modules)
                .into_iter()
                .collect(),
        },
        _ => anyhow::bail!("--run and --event must be given together"),
    };
    Ok(events)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", content),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let records = input::load_pulses(&args.pulses)
        .with_context(|| format!("Failed to load pulses {}", args.pulses.display()))?;

    if args.list_events {
        let events = aggregate::list_events(&records);
        return write_output(args.output.as_deref(), &text_output::format_event_list(&events));
    }

    let Some(geometry_path) = &args.geometry else {
        anyhow::bail!("--geometry is required unless --list-events is given");
    };
    let geometry = input::load_geometry(geometry_path)
        .with_context(|| format!("Failed to load geometry {}", geometry_path.display()))?;

    let events = select_events(&args, &records, &config)?;
    if events.is_empty() {
        tracing::warn!("No events to display");
    }

    let outcomes = batch::process_events(&records, &events, &geometry, &config);

    let content = match args.format {
        OutputFormat::Text => outcomes.iter().map(text_output::format_outcome).collect(),
        OutputFormat::Json => {
            let mut output = json_output::JsonOutput::new();
            for outcome in &outcomes {
                output.add_outcome(outcome);
            }
            let mut json = output.to_json()?;
            json.push('\n');
            json
        }
        OutputFormat::Csv => {
            let mut output = csv_output::CsvOutput::new();
            for scene in outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
                output.add_scene(scene);
            }
            output.to_csv()
        }
    };
    write_output(args.output.as_deref(), &content)?;

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} events failed", failed, outcomes.len());
    }
    Ok(())
}
