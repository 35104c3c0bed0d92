//! tacsim CLI — validate and execute three-address IR programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage or file error
//! - 2: Load fault
//! - 3: Runtime fault

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "trace" => commands::trace(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: tacsim <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <prog.ir>     Load and execute a program");
    eprintln!("  check <prog.ir>   Validate a program without executing it");
    eprintln!("  trace <prog.ir>   Execute one instruction at a time, narrating each");
}
