//! idle-runner: headless host for the incremental game core.
//!
//! Usage:
//!   idle-runner --ticks 30
//!   idle-runner --config engine.json --ipc-mode
//!
//! In IPC mode every stdin line is a JSON command and every reply is a
//! single JSON line holding the current snapshot (or an error).

use anyhow::Result;
use idle_core::{
    action::Action,
    condition::Condition,
    config::EngineConfig,
    engine::GameEngine,
    flag::{Flag, FlagHooks},
    message::{AlertKind, Toast},
    state::GameState,
    types::{ButtonId, ResourceId},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Press { button: String },
    TogglePause,
    SetTimeFactor { factor: f64 },
    Quit,
}

/// Handles to the demo content the runner installs.
struct Demo {
    alter_time: Flag<bool>,
    wood:       ResourceId,
    wait:       ButtonId,
    gather:     ButtonId,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ticks = parse_arg(&args, "--ticks", 30u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => EngineConfig::load(&w[1])?,
        None => EngineConfig::default(),
    };

    if !ipc_mode {
        println!("idle-runner");
        println!("  ticks:          {ticks}");
        println!("  tick interval:  {} ms", config.tick_interval_ms);
        println!("  conditions:     {:?}", config.conditions);
        println!();
    }

    let mut engine = GameEngine::new(config);
    let demo = install_demo(&mut engine)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        run_scripted(&mut engine, &demo, ticks)?;
        print_summary(&engine, &demo);
    }
    Ok(())
}

/// A handful of buttons, a flag, a resource and a condition. Enough
/// to exercise every part of the core from the command line.
fn install_demo(engine: &mut GameEngine) -> Result<Demo> {
    let wood = engine.state.resources.define("wood", 0.0);

    let alter_time: Flag<bool> = engine.state.flags.define(
        "alter_time",
        FlagHooks::new(
            |engine, on: &bool| {
                let text = if *on { "Time slows to a crawl." } else { "Time resumes its pace." };
                engine.perform_actions([Action::message(text)])
            },
            |_| Ok(()),
        ),
    );

    let buttons = &mut engine.state.buttons;
    let wait = buttons.define("Wait 1 Second", vec![Action::pass_time(1)]);
    let gather = buttons.define("Gather wood", vec![Action::add_resource(wood, 1.0)]);
    let revert = buttons.declare("Reverse time");
    let restore = buttons.declare("Return time to normal");
    buttons.bind(revert, vec![
        alter_time.set(true),
        Action::DisableButton(revert),
        Action::EnableButton(restore),
    ])?;
    buttons.bind(restore, vec![
        alter_time.set(false),
        Action::DisableButton(restore),
        Action::EnableButton(revert),
    ])?;

    let stockpile = Condition::new("wood stockpile", move |state: &GameState| {
        state.resources.get(wood).map(|r| r.amount >= 5.0).unwrap_or(false)
    });
    let arrival = Toast {
        title: "Visitor".into(),
        alert: AlertKind::Primary,
        dismissible: true,
        time_shown_ms: 5000,
        ..Toast::default()
    };

    engine.perform_actions([
        Action::EnableButton(wait),
        Action::EnableButton(gather),
        Action::message("You wake up in a clearing."),
        Action::enqueue(Action::message_with_toast("A stranger walks out of the woods.", arrival), 3),
        Action::add_condition(
            stockpile,
            Action::bulk([
                Action::message("Your pile of wood draws attention."),
                Action::EnableButton(revert),
            ]),
        ),
    ])?;

    Ok(Demo { alter_time, wood, wait, gather })
}

fn run_scripted(engine: &mut GameEngine, demo: &Demo, ticks: u64) -> Result<()> {
    for tick in 0..ticks {
        if tick % 2 == 0 {
            engine.press_button(demo.gather)?;
        }
        engine.press_button(demo.wait)?;
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::Tick { count } => (0..count).try_for_each(|_| engine.tick()),
            IpcCommand::Press { button } => match engine.state.buttons.find(&button) {
                Some(id) => engine.press_button(id),
                None => {
                    log::warn!("Unknown button: {button}");
                    write_error(&mut stdout, &format!("unknown button '{button}'"))?;
                    continue;
                }
            },
            IpcCommand::TogglePause => {
                engine.toggle_pause();
                Ok(())
            }
            IpcCommand::SetTimeFactor { factor } => engine.set_time_factor(factor),
        };

        match outcome {
            Ok(()) => writeln!(stdout, "{}", serde_json::to_string(&engine.snapshot())?)?,
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(engine: &GameEngine, demo: &Demo) {
    let state = &engine.state;
    println!("=== RUN SUMMARY ===");
    println!("  final tick:     {}", state.time());
    println!(
        "  wood:           {}",
        state.resources.get(demo.wood).map(|r| r.amount).unwrap_or_default()
    );
    println!("  alter_time:     {:?}", engine.flag(&demo.alter_time));
    println!("  queued actions: {}", state.queue.len());
    println!("  conditions:     {}", state.conditions.len());

    println!();
    println!("=== BUTTONS ===");
    for (id, button) in state.buttons.active() {
        let marker = if button.visible() { "shown" } else { "hidden" };
        println!("  {id} {:<24} {marker}", button.label());
    }

    println!();
    println!("=== MESSAGES (newest first) ===");
    for message in state.messages.recent(engine.config.message_display_limit) {
        println!("  [{:>4}] {}", message.time(), message.content());
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
