//! Command-line front end to the LLVM binding.
//!
//! Lists registered targets, prints data layout facts for a triple, links
//! bitcode files and describes the types in a bitcode module.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use inkwell::context::Context;
use llvmc::llvm::{
    create_target_machine, default_triple, describe_type, initialize_all_targets, link_modules,
    parse_bitcode_file, targets, write_bitcode_to_file, ByteOrdering, CodeModel, LinkerMode,
    OptimizationLevel, RelocMode, TargetLayout,
};
use llvmc::BindingResult;

#[derive(Parser, Debug)]
#[command(name = "llvmc", version, about = "Inspect and link LLVM bitcode")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered code generators.
    Targets,

    /// Print pointer size, byte order and data layout for a target.
    Layout {
        /// Target triple; defaults to the host.
        #[arg(long)]
        triple: Option<String>,
        #[arg(long, default_value = "")]
        cpu: String,
        #[arg(long, default_value = "")]
        features: String,
    },

    /// Link bitcode files into one module.
    Link {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Describe the types of functions and globals in a bitcode file.
    Types { input: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> BindingResult<()> {
    match command {
        Command::Targets => {
            initialize_all_targets();
            for target in targets() {
                println!("{:<16} {}", target.name, target.description);
            }
        }
        Command::Layout { triple, cpu, features } => {
            initialize_all_targets();
            let triple = triple.unwrap_or_else(default_triple);
            let machine = create_target_machine(
                &triple,
                &cpu,
                &features,
                OptimizationLevel::None,
                RelocMode::Default,
                CodeModel::Default,
            )?;
            let layout = TargetLayout::from_machine(&machine);
            let order = match layout.byte_order() {
                ByteOrdering::BigEndian => "big-endian",
                ByteOrdering::LittleEndian => "little-endian",
            };
            println!("triple:       {}", triple);
            println!("pointer size: {} bytes", layout.pointer_size());
            println!("byte order:   {}", order);
            println!("data layout:  {}", layout.layout_string());
        }
        Command::Link { output, inputs } => {
            let Some((first, rest)) = inputs.split_first() else {
                return Ok(());
            };
            let context = Context::create();
            let dest = parse_bitcode_file(&context, first)?;
            for input in rest {
                let src = parse_bitcode_file(&context, input)?;
                link_modules(&dest, src, LinkerMode::DestroySource)?;
            }
            write_bitcode_to_file(&dest, &output)?;
            log::info!("linked {} modules into {}", inputs.len(), output.display());
        }
        Command::Types { input } => {
            let context = Context::create();
            let module = parse_bitcode_file(&context, &input)?;
            for function in module.get_functions() {
                println!(
                    "fn {}: {}",
                    function.get_name().to_string_lossy(),
                    describe_type(&function.get_type())
                );
            }
            for global in module.get_globals() {
                println!(
                    "global {}: {}",
                    global.get_name().to_string_lossy(),
                    describe_type(&global.get_value_type())
                );
            }
        }
    }
    Ok(())
}
