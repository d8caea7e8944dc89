//! Help output: the command listing and per-command pages.

use std::io;

use console::measure_text_width;

use crate::error::Result;
use crate::flags::Flag;
use crate::layout::columns::pad;

use super::command::Command;
use super::context::Context;
use super::engine::Engine;

/// Handler of the built-in `help` command.
pub(crate) fn run(ctx: &Context<'_>) -> Result<()> {
    let engine = ctx.engine();
    match engine.find(ctx.args()) {
        Some((command, _)) => command_help(engine, command)?,
        None => global_help(engine)?,
    }
    Ok(())
}

/// List every visible command with its description, sorted by full command.
pub fn global_help(engine: &Engine) -> io::Result<()> {
    let mut rows: Vec<(String, &str)> = engine
        .commands()
        .iter()
        .filter(|c| !c.is_invisible())
        .map(|c| (c.full_command(engine.name()), c.description()))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let width = rows
        .iter()
        .map(|(full, _)| measure_text_width(full))
        .max()
        .unwrap_or(0);

    let writer = engine.writer();
    for (full, description) in rows {
        writer.write(&format!(
            "<h1>{}</h1>  <value>{}</value>\n",
            pad(full, width),
            description
        ))?;
    }
    Ok(())
}

/// The help page of one command.
pub fn command_help(engine: &Engine, command: &Command) -> io::Result<()> {
    let writer = engine.writer();

    let mut usage = command.full_command(engine.name());
    if !command.usage().is_empty() {
        usage.push(' ');
        usage.push_str(command.usage());
    }
    writer.write(&format!("<h1>USAGE</h1>\n  <value>{}</value>\n", usage))?;

    if !command.description().is_empty() {
        writer.write(&format!(
            "\n<h1>DESCRIPTION</h1>\n  <value>{}</value>\n",
            command.description()
        ))?;
    }

    let globals = engine.global_flags();
    let width = command
        .flags()
        .iter()
        .chain(globals)
        .map(|f| measure_text_width(&f.usage()))
        .max()
        .unwrap_or(0);

    if !command.flags().is_empty() {
        writer.write("\n<h1>OPTIONS</h1>\n")?;
        write_flags(engine, command.flags(), width)?;
    }
    if !globals.is_empty() {
        writer.write("\n<h1>GLOBAL OPTIONS</h1>\n")?;
        write_flags(engine, globals, width)?;
    }
    Ok(())
}

fn write_flags(engine: &Engine, flags: &[Flag], width: usize) -> io::Result<()> {
    for flag in flags {
        let usage = flag.usage();
        let padding = " ".repeat(width.saturating_sub(measure_text_width(&usage)));
        engine.writer().write(&format!(
            "  {}{}  <info>{}</info>\n",
            usage,
            padding,
            flag.description()
        ))?;
    }
    Ok(())
}
