use clap::Parser;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use tmsim::loader::ProgramLoader;
use tmsim::machine::{Machine, Step};
use tmsim::machines;
use tmsim::types::{MachineError, Symbol};

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Machine description file to run (defaults to the built-in decrement machine)
    #[clap(short, long)]
    program: Option<PathBuf>,

    /// Run a built-in machine by name
    #[clap(short, long, conflicts_with = "program")]
    machine: Option<String>,

    /// List the built-in machines and exit
    #[clap(long)]
    list: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Give up on an input after this many steps
    #[clap(long)]
    max_steps: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        for name in machines::names() {
            println!("{name}");
        }
        return;
    }

    let machine = match load_machine(&cli) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("tmsim: {e}");
            process::exit(1);
        }
    };

    if atty::is(atty::Stream::Stdin) {
        eprintln!("reading inputs from stdin, one 0/1 string per line; an empty line stops");
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.is_empty() {
            break;
        }

        let input: Option<Vec<Symbol>> = line.chars().map(Symbol::from_char).collect();
        let Some(input) = input else {
            eprintln!("skipping '{line}': inputs are strings over 0/1");
            continue;
        };

        let result = if cli.debug {
            run_traced(&machine, &input, cli.max_steps)
        } else {
            match cli.max_steps {
                Some(cap) => machine.run_bounded(&input, cap),
                None => Some(machine.run(&input)),
            }
        };

        match result {
            Some(contents) => println!("{}", rendered(&contents)),
            // None only happens when a step cap was set.
            None => eprintln!(
                "gave up on '{line}' after {} steps",
                cli.max_steps.unwrap_or_default()
            ),
        }
    }
}

fn load_machine(cli: &Cli) -> Result<Machine, MachineError> {
    let program = if let Some(path) = &cli.program {
        ProgramLoader::load_program(path)?
    } else {
        let name = cli.machine.as_deref().unwrap_or(machines::DEFAULT_MACHINE);
        machines::get(name).unwrap_or_else(|| {
            eprintln!("tmsim: unknown built-in machine '{name}' (--list shows the available names)");
            process::exit(1);
        })
    };

    Machine::new(program)
}

/// Runs one input, printing the configuration before every step.
fn run_traced(machine: &Machine, input: &[Symbol], max_steps: Option<usize>) -> Option<Vec<Symbol>> {
    let mut exec = machine.execution(input);

    loop {
        println!(
            "step {:>4}  state {:>3}  head {:>3}  tape {}",
            exec.steps(),
            exec.state(),
            exec.tape().head_offset(),
            exec.tape()
        );

        if exec.step() == Step::Halted {
            println!("halted after {} steps", exec.steps());
            return Some(exec.into_contents());
        }

        if max_steps.is_some_and(|cap| exec.steps() >= cap) && !exec.is_halted() {
            return None;
        }
    }
}

fn rendered(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}
