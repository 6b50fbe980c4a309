use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;
use tmsim::loader::ProgramLoader;
use tmsim::programs::{ProgramInfo, ProgramManager};
use tmsim::{encode, first_n_accepted, Configuration, TuringMachine};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine description file (.tm) to load
    #[arg(short, long, conflicts_with = "builtin")]
    file: Option<PathBuf>,

    /// Use a bundled machine, by name or index, instead of a file
    #[arg(short, long)]
    builtin: Option<String>,

    /// List the bundled machines, or the machines in --dir
    #[arg(long)]
    list: bool,

    /// Directory of .tm files to list instead of the bundled machines
    #[arg(long, value_name = "DIR", requires = "list")]
    dir: Option<PathBuf>,

    /// The string to run the machine on
    #[arg(short, long)]
    input: Option<String>,

    /// Print each configuration of the execution
    #[arg(short, long)]
    verbose: bool,

    /// Print the first N strings accepted by the machine
    #[arg(short, long, value_name = "N")]
    language: Option<usize>,

    /// Print a summary of the machine
    #[arg(short, long)]
    describe: bool,

    /// Print the machine in the description format
    #[arg(long)]
    source: bool,

    /// Print a single JSON document instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// The text summary goes to stdout only outside JSON mode; the JSON document carries the
    /// encoded machine instead.
    fn prints_summary(&self) -> bool {
        !self.json && (self.describe || self.verbose)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list {
        return list(&cli);
    }

    let machine = load_machine(&cli)?;

    if cli.json {
        let report = json_report(&machine, &cli)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if cli.prints_summary() {
        println!("{machine}");
    }

    if cli.source {
        print!("{}", source(&machine, &cli)?);
    }

    if let Some(input) = &cli.input {
        run(&machine, input, cli.verbose)?;
    }

    if let Some(n) = cli.language {
        debug!(n, "Enumerating accepted strings");
        for word in first_n_accepted(&machine, n) {
            println!("{word}");
        }
    }

    Ok(())
}

fn list(cli: &Cli) -> Result<()> {
    let Some(dir) = &cli.dir else {
        let infos = (0..ProgramManager::get_program_count())
            .map(ProgramManager::get_program_info)
            .collect::<Result<Vec<_>, _>>()?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&infos)?);
        } else {
            for info in &infos {
                println!("{}", format_info(info));
            }
        }
        return Ok(());
    };

    let mut listed = Vec::new();
    for result in ProgramLoader::load_programs(dir) {
        match result {
            Ok((path, machine)) => listed.push((path, machine)),
            Err(e) => warn!(error = %e, "Skipping machine"),
        }
    }

    if cli.json {
        let entries: Vec<Value> = listed
            .iter()
            .map(|(path, machine)| {
                json!({
                    "path": path.display().to_string(),
                    "start": machine.start(),
                    "input_alphabet": machine.input_alphabet().iter().collect::<String>(),
                    "state_count": machine.states().len(),
                    "transition_count": machine.delta().len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (path, machine) in &listed {
            println!(
                "{:20} states={:<3} transitions={:<3} alphabet={}",
                path.display(),
                machine.states().len(),
                machine.delta().len(),
                machine.input_alphabet().iter().collect::<String>()
            );
        }
    }

    Ok(())
}

fn format_info(info: &ProgramInfo) -> String {
    format!(
        "{:>2} {:15} states={:<3} transitions={:<3} alphabet={}",
        info.index, info.name, info.state_count, info.transition_count, info.input_alphabet
    )
}

fn load_machine(cli: &Cli) -> Result<TuringMachine> {
    match (&cli.file, &cli.builtin) {
        (Some(path), _) => ProgramLoader::load_program(path)
            .with_context(|| format!("Failed to load machine from {}", path.display())),
        (None, Some(name)) => {
            let machine = match name.parse::<usize>() {
                Ok(index) => ProgramManager::get_program_by_index(index)?,
                Err(_) => ProgramManager::get_program_by_name(name)?,
            };
            Ok(machine.clone())
        }
        (None, None) => bail!("Either --file or --builtin is required"),
    }
}

/// The description text of the machine: the embedded text for a bundled machine looked up by
/// name, the encoded machine otherwise.
fn source(machine: &TuringMachine, cli: &Cli) -> Result<String> {
    match (&cli.file, &cli.builtin) {
        (None, Some(name)) if name.parse::<usize>().is_err() => {
            Ok(ProgramManager::get_program_text(name)?.to_string())
        }
        _ => Ok(encode(machine)),
    }
}

fn run(machine: &TuringMachine, input: &str, verbose: bool) -> Result<()> {
    if verbose {
        println!("__EXECUTION__");
        println!("{:10} {} {:3}", "State", "Configuration", "Position");
    }

    let report = machine.execute(input, |config: &Configuration| {
        if verbose {
            println!("{config}");
        }
    })?;

    println!("{}", report.verdict);

    Ok(())
}

/// Builds the single JSON document printed in `--json` mode.
fn json_report(machine: &TuringMachine, cli: &Cli) -> Result<Value> {
    let mut output = json!({});

    if cli.describe || cli.source {
        output["machine"] = source(machine, cli)?.into();
    }

    if let Some(input) = &cli.input {
        let mut trace = Vec::new();
        let report = machine.execute(input, |config: &Configuration| {
            if cli.verbose {
                trace.push(json!({
                    "state": config.state(),
                    "tape": config.tape(),
                    "head": config.head(),
                }));
            }
        })?;

        output["input"] = input.as_str().into();
        output["verdict"] = serde_json::to_value(report.verdict)?;
        output["halt"] = serde_json::to_value(&report.halt)?;
        output["steps"] = report.steps.into();
        if cli.verbose {
            output["trace"] = trace.into();
        }
    }

    if let Some(n) = cli.language {
        output["language"] = first_n_accepted(machine, n).into();
    }

    Ok(output)
}
