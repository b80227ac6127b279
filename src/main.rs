// LoopLens: event-loop visualizer for a JavaScript subset

mod engine;
mod parser;
mod presets;
mod replay;
mod ui;

use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use engine::generator::StepGenerator;
use replay::store::VisualizerState;
use replay::Replayer;
use ui::App;

fn usage(program_name: &str) {
    eprintln!("Usage: {} <file.js>", program_name);
    eprintln!("       {} --preset <id>", program_name);
    eprintln!("       {} --list-presets", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --trace    replay to stdout instead of opening the TUI");
    eprintln!();
    eprintln!("Try a built-in example:");
    eprintln!("  {} --preset promise-vs-timeout", program_name);
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("looplens");

    let mut trace = false;
    let mut preset_id: Option<&str> = None;
    let mut file: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--list-presets" => {
                for preset in presets::PRESETS {
                    println!("{:<22} {}", preset.id, preset.title);
                }
                return ExitCode::SUCCESS;
            }
            "--preset" => {
                i += 1;
                match args.get(i) {
                    Some(id) => preset_id = Some(id),
                    None => {
                        eprintln!("Error: --preset requires an id");
                        usage(program_name);
                        return ExitCode::FAILURE;
                    }
                }
            }
            "--trace" => trace = true,
            "--help" | "-h" => {
                usage(program_name);
                return ExitCode::SUCCESS;
            }
            other => file = Some(other),
        }
        i += 1;
    }

    // Resolve the source
    let source = match (preset_id, file) {
        (Some(id), _) => match presets::find(id) {
            Some(preset) => preset.code.to_string(),
            None => {
                eprintln!("Error: Unknown preset '{}'", id);
                eprintln!("Use --list-presets to see available ids");
                return ExitCode::FAILURE;
            }
        },
        (None, Some(path)) => {
            if !Path::new(path).exists() {
                eprintln!("Error: File '{}' not found", path);
                usage(program_name);
                return ExitCode::FAILURE;
            }
            match fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("Error: Failed to read '{}': {}", path, e);
                    return ExitCode::FAILURE;
                }
            }
        }
        (None, None) => {
            eprintln!("Error: No input provided");
            eprintln!();
            usage(program_name);
            return ExitCode::FAILURE;
        }
    };

    // Generate the step sequence up front
    let mut generator = StepGenerator::new();
    let steps = match generator.generate(&source) {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    eprintln!("Generated {} micro-steps.", steps.len());

    if trace {
        return run_trace(steps);
    }

    match run_tui(steps, source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Replay the whole sequence at full speed and dump the final state to stdout
fn run_trace(steps: Vec<engine::step::MicroStep>) -> ExitCode {
    let mut replayer = Replayer::new(steps);
    let mut state = VisualizerState::new();
    if let Err(e) = replayer.run(&mut state, 0) {
        eprintln!("Replay error: {}", e);
        return ExitCode::FAILURE;
    }

    for line in &state.console {
        println!("{}", line);
    }
    if !state.web_apis.is_empty() {
        eprintln!();
        for entry in &state.web_apis {
            eprintln!("[still registered] {}", entry.name);
        }
    }
    ExitCode::SUCCESS
}

fn run_tui(steps: Vec<engine::step::MicroStep>, source: String) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(steps, source);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
