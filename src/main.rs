//! stdcli demo entry point.
//!
//! A small program built on the engine that exercises its features: flags,
//! validation, tables and info blocks, subprocesses, settings and
//! interrupt cleanup.

use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use serde_json::json;
use stdcli::cli::{CommandDefinitions, CommandOptions, Context, Engine};
use stdcli::config::EngineConfig;
use stdcli::flags::Flag;
use stdcli::{exit, validate, CliError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `DEBUG=true` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("stdcli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stdcli=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

struct App {
    id: &'static str,
    name: &'static str,
    status: &'static str,
    instances: u32,
}

const APPS: &[App] = &[
    App {
        id: "a-1",
        name: "web",
        status: "running",
        instances: 3,
    },
    App {
        id: "a-2",
        name: "worker",
        status: "stopped",
        instances: 0,
    },
];

fn echo(ctx: &Context<'_>) -> Result<()> {
    let mut text = ctx.args().join(" ");
    if ctx.bool("upper") {
        text = text.to_uppercase();
    }
    for _ in 0..ctx.int("repeat").max(0) {
        ctx.writeln(&text)?;
    }
    Ok(())
}

fn apps(ctx: &Context<'_>) -> Result<()> {
    let mut table = ctx.table(["ID", "Name", "Status", "Instances"]);
    for app in APPS {
        table.append(vec![
            json!(format!("<id>{}</id>", app.id)),
            json!(app.name),
            json!(app.status),
            json!(app.instances),
        ]);
    }
    table.print()?;
    Ok(())
}

fn apps_info(ctx: &Context<'_>) -> Result<()> {
    let app = APPS
        .iter()
        .find(|a| a.name == ctx.arg(0))
        .ok_or_else(|| anyhow::anyhow!("no such app: {}", ctx.arg(0)))?;

    let mut info = ctx.info();
    info.add("Id", app.id);
    info.add("Name", app.name);
    info.add("Status", app.status);
    info.add("Instances", app.instances);
    info.print()?;
    Ok(())
}

fn exit_with(ctx: &Context<'_>) -> Result<()> {
    let code: i32 = ctx
        .arg(0)
        .parse()
        .with_context(|| format!("invalid exit code: {}", ctx.arg(0)))?;
    Err(exit(code))
}

fn sleep(ctx: &Context<'_>) -> Result<()> {
    let duration = ctx.duration("for");
    let linger = ctx.duration("linger");
    let (done, cleaned) = mpsc::channel();
    ctx.cleanup(move || {
        eprintln!("interrupted, cleaning up");
        thread::sleep(linger);
        done.send(()).ok();
    });

    let started = Instant::now();
    while started.elapsed() < duration {
        if ctx.is_cancelled() {
            // A second interrupt while this blocks terminates the process.
            cleaned.recv().ok();
            return Err(exit(130));
        }
        thread::sleep(Duration::from_millis(20));
    }
    ctx.writeln("<ok>done</ok>")
}

fn exec(ctx: &Context<'_>) -> Result<()> {
    let rest: Vec<&str> = ctx.args()[1..].iter().map(String::as_str).collect();
    ctx.run(ctx.arg(0), &rest)
}

fn config_get(ctx: &Context<'_>) -> Result<()> {
    match ctx.setting_read(ctx.arg(0))? {
        Some(value) => ctx.writeln(&value),
        None => Err(CliError::Other(anyhow::anyhow!(
            "setting not found: {}",
            ctx.arg(0)
        ))),
    }
}

fn config_set(ctx: &Context<'_>) -> Result<()> {
    ctx.setting_write(ctx.arg(0), ctx.arg(1))?;
    ctx.writeln(&format!("<ok>OK</ok> {}", ctx.arg(0)))
}

fn config_unset(ctx: &Context<'_>) -> Result<()> {
    ctx.setting_delete(ctx.arg(0))?;
    ctx.writeln(&format!("<ok>OK</ok> {}", ctx.arg(0)))
}

fn tags(ctx: &Context<'_>) -> Result<()> {
    for name in ctx.writer().tags().names() {
        ctx.writeln(&format!("{:<8}<{}>sample</{}>", name, name, name))?;
    }
    Ok(())
}

fn commands() -> CommandDefinitions {
    let mut defs = CommandDefinitions::new();

    defs.register(
        "echo",
        "print arguments",
        echo,
        CommandOptions::new()
            .usage("<text>...")
            .flag(Flag::bool("upper", "uppercase the output").short('u'))
            .flag(
                Flag::int("repeat", "print this many times")
                    .short('n')
                    .default_value(1i64),
            )
            .validate(validate::args_min(1)),
    );
    defs.register("apps", "list apps", apps, CommandOptions::new());
    defs.register(
        "apps info",
        "show an app",
        apps_info,
        CommandOptions::new()
            .usage("<name>")
            .validate(validate::args(1)),
    );
    defs.register(
        "exit",
        "exit with a code",
        exit_with,
        CommandOptions::new()
            .usage("<code>")
            .validate(validate::args(1)),
    );
    defs.register(
        "sleep",
        "wait, cleaning up when interrupted",
        sleep,
        CommandOptions::new()
            .flag(
                Flag::duration("for", "how long to wait")
                    .short('f')
                    .default_value(Duration::from_secs(1)),
            )
            .flag(Flag::duration("linger", "how long cleanup takes"))
            .validate(validate::args(0)),
    );
    defs.register(
        "exec",
        "run a program",
        exec,
        CommandOptions::new()
            .usage("<program> [args]...")
            .validate(validate::args_min(1)),
    );
    defs.register(
        "config get",
        "read a setting",
        config_get,
        CommandOptions::new()
            .usage("<name>")
            .validate(validate::args(1)),
    );
    defs.register(
        "config set",
        "write a setting",
        config_set,
        CommandOptions::new()
            .usage("<name> <value>")
            .validate(validate::args(2)),
    );
    defs.register(
        "config unset",
        "delete a setting",
        config_unset,
        CommandOptions::new()
            .usage("<name>")
            .validate(validate::args(1)),
    );
    defs.register("tags", "show markup", tags, CommandOptions::new().invisible());

    defs
}

fn main() -> ExitCode {
    let config = EngineConfig::from_env("stdcli", env!("CARGO_PKG_VERSION"));
    init_tracing(config.debug);

    tracing::debug!("stdcli starting with config: {:?}", config);

    let mut engine = Engine::new(config);
    engine.global_flag(Flag::string("output", "output format (text, json)").short('o'));
    commands().apply(&mut engine);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = engine.execute(&args);
    ExitCode::from(code as u8)
}
