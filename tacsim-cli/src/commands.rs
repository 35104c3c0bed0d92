//! CLI command implementations.
//!
//! Program I/O (`READ`/`WRITE`) flows through stdin and stdout; all
//! reporting — load errors, fault descriptions, narration, summaries —
//! goes to stderr except `check`'s one-line verdict.

use std::fs;
use std::io;

use tacsim_common::Program;
use tacsim_vm::io::{ReadInput, WriteOutput};
use tacsim_vm::{Machine, Step};

/// Load and execute a .ir program to completion.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: tacsim run <prog.ir>");
        return Err(1);
    }

    let input = &args[0];
    let program = load_file(input)?;

    let stdin = io::stdin();
    let mut source = ReadInput::new(stdin.lock());
    let mut sink = WriteOutput::new(io::stdout());
    let mut machine = Machine::new(&program);

    match machine.run(&mut source, &mut sink) {
        Ok(executed) => {
            eprintln!("OK: {input} ({executed} instructions executed)");
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime fault: {e}");
            Err(3)
        }
    }
}

/// Validate a .ir program without executing it.
pub fn check(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: tacsim check <prog.ir>");
        return Err(1);
    }

    let input = &args[0];
    let program = load_file(input)?;

    println!(
        "OK: {input} ({} instructions, {} functions, {} bytes static)",
        program.len(),
        program.functions.len(),
        program.static_size
    );
    Ok(())
}

/// Execute one instruction at a time, narrating each to stderr.
pub fn trace(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: trace requires an input file");
        eprintln!("Usage: tacsim trace <prog.ir>");
        return Err(1);
    }

    let input = &args[0];
    let program = load_file(input)?;

    let stdin = io::stdin();
    let mut source = ReadInput::new(stdin.lock());
    let mut sink = WriteOutput::new(io::stdout());
    let mut machine = Machine::new(&program);

    loop {
        // While idle the next step executes the entry instruction. An
        // escaped pointer (fall-through or jump past the end) has no
        // instruction to narrate; step reports the fault.
        let pending = machine.ip().unwrap_or(program.entry);
        if program.code.get(pending).is_some() {
            eprintln!(
                "{:>4}  [{}] {}{}",
                program.lines[pending],
                machine.current_function(),
                "  ".repeat(machine.depth()),
                program.text[pending]
            );
        }

        match machine.step(&mut source, &mut sink) {
            Ok(Step::Continue) => {}
            Ok(Step::Exited) => {
                eprintln!(
                    "OK: {input} ({} instructions executed)",
                    machine.executed()
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("runtime fault: {e}");
                return Err(3);
            }
        }
    }
}

// --- Helpers ---

/// Read and load a .ir source file.
fn load_file(path: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    tacsim_loader::load(&text).map_err(|e| {
        eprintln!("error: {e}");
        2
    })
}
