//! Sensor command handlers.

use std::io::{self, Write};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use futures_util::StreamExt;
use tabled::Tabled;

use sensordesk_core::{Outcome, Sensor, SensorDraft};

use crate::cli::{OutputFormat, SensorsArgs, SensorsCommand};
use crate::error::CliError;
use crate::output;

use super::Context;
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Visibility")]
    visibility: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Sensor> for SensorRow {
    fn from(s: &Sensor) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            category: s.category.to_string(),
            color: s.color.map(|c| c.to_string()).unwrap_or_default(),
            visibility: s.visibility.to_string(),
            description: s.description.clone(),
        }
    }
}

fn detail(s: &Sensor) -> String {
    output::detail_lines(&[
        ("ID", s.id.to_string()),
        ("Name", s.name.clone()),
        ("Category", s.category.to_string()),
        ("Color", s.color.map(|c| c.to_string()).unwrap_or_else(|| "-".into())),
        ("Visibility", s.visibility.to_string()),
        ("Description", s.description.clone()),
    ])
}

fn print_list(ctx: &Context<'_>, sensors: &[Sensor]) -> Result<(), CliError> {
    let out = output::render_list(
        &ctx.global.output,
        sensors,
        |s| SensorRow::from(s),
        |s| s.id.to_string(),
    )?;
    ctx.output(&out);
    Ok(())
}

fn print_one(ctx: &Context<'_>, sensor: &Sensor) -> Result<(), CliError> {
    let out = output::render_single(&ctx.global.output, sensor, detail, |s| s.id.to_string())?;
    ctx.output(&out);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &mut Context<'_>, args: SensorsArgs) -> Result<(), CliError> {
    let sensors = ctx.backend.sensors();

    match args.command {
        SensorsCommand::List { page, size, sort } => {
            let outcome = sensors.list(Some(page), size, Some(&sort)).await;
            let found = ctx.settle("sensors list", outcome)?.unwrap_or_default();
            print_list(ctx, &found)
        }

        SensorsCommand::Get { id } => {
            let outcome = sensors.get_by_id(id).await;
            match ctx.settle("sensors get", outcome)? {
                Some(sensor) => print_one(ctx, &sensor),
                None => Err(util::not_found("sensor", id, "sensors list")),
            }
        }

        SensorsCommand::Search { term: _, live: true } => live_search(ctx).await,

        SensorsCommand::Search { term, live: false } => {
            let outcome = sensors.search(term.as_deref().unwrap_or_default()).await;
            let found = ctx.settle("sensors search", outcome)?.unwrap_or_default();
            print_list(ctx, &found)
        }

        SensorsCommand::Add {
            name,
            category,
            color,
            description,
            visibility,
        } => {
            let draft = SensorDraft {
                name,
                category,
                color,
                description,
                visibility,
            };
            let outcome = sensors.create(&draft).await;
            if let Some(created) = ctx.settle("sensors add", outcome)? {
                ctx.status(&format!("✓ Sensor {} created", created.id));
                print_one(ctx, &created)?;
            }
            Ok(())
        }

        SensorsCommand::Edit {
            id,
            name,
            category,
            color,
            description,
            visibility,
        } => {
            let outcome = sensors.get_by_id(id).await;
            let Some(mut sensor) = ctx.settle("sensors edit", outcome)? else {
                return Err(util::not_found("sensor", id, "sensors list"));
            };

            if let Some(name) = name {
                sensor.name = name;
            }
            if let Some(category) = category {
                sensor.category = category;
            }
            if color.is_some() {
                sensor.color = color;
            }
            if let Some(description) = description {
                sensor.description = description;
            }
            if let Some(visibility) = visibility {
                sensor.visibility = visibility;
            }

            let outcome = sensors.update(&sensor).await;
            if let Some(updated) = ctx.settle("sensors edit", outcome)? {
                ctx.status(&format!("✓ Sensor {} updated", updated.id));
                print_one(ctx, &updated)?;
            }
            Ok(())
        }
    }
}

// ── Live search ─────────────────────────────────────────────────────

/// Restores the terminal on every exit path.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self, CliError> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

enum LiveExit {
    Accept,
    Abort,
}

/// Redraw the prompt line and the latest results below it.
fn redraw(query: &str, status: &str, rows: &[String]) -> io::Result<()> {
    let mut out = io::stderr().lock();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::FromCursorDown)
    )?;
    write!(out, "search> {query}")?;
    write!(out, "\r\n  {status}")?;
    for row in rows {
        write!(out, "\r\n  {row}")?;
    }
    let lines_below = u16::try_from(rows.len() + 1).unwrap_or(u16::MAX);
    execute!(
        out,
        cursor::MoveUp(lines_below),
        cursor::MoveToColumn(u16::try_from(8 + query.chars().count()).unwrap_or(u16::MAX))
    )?;
    out.flush()
}

fn summarize(outcome: &Outcome<Vec<Sensor>>) -> (String, Vec<String>) {
    match outcome {
        Outcome::Ok(found) => (
            format!("{} match(es)", found.len()),
            found
                .iter()
                .map(|s| format!("{:>5}  {}  [{}]", s.id, s.name, s.category))
                .collect(),
        ),
        Outcome::Empty => ("no matches".into(), Vec::new()),
        Outcome::Failed(failure) => (format!("✗ {failure}"), Vec::new()),
    }
}

async fn live_search(ctx: &mut Context<'_>) -> Result<(), CliError> {
    let search = ctx.backend.sensor_search();
    let mut results = Box::pin(search.subscribe());
    let mut events = EventStream::new();

    let mut query = String::new();
    let mut last: Vec<Sensor> = Vec::new();

    let exit = {
        let _raw = RawMode::enable()?;
        redraw(&query, "type to search, enter to accept, esc to quit", &[])?;

        loop {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else { break LiveExit::Abort };
                    let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event? else {
                        continue;
                    };
                    if kind == KeyEventKind::Release {
                        continue;
                    }
                    match code {
                        KeyCode::Enter => break LiveExit::Accept,
                        KeyCode::Esc => break LiveExit::Abort,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            break LiveExit::Abort;
                        }
                        KeyCode::Char(c) => query.push(c),
                        KeyCode::Backspace => {
                            query.pop();
                        }
                        _ => continue,
                    }
                    search.push(query.clone());
                    redraw(&query, "…", &[])?;
                }

                Some(result) = results.next() => {
                    let (status, rows) = summarize(&result.value);
                    redraw(&query, &status, &rows)?;
                    last = result.value.unwrap_or_default();
                }
            }
        }
    };

    let mut stderr = io::stderr().lock();
    execute!(
        stderr,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::FromCursorDown)
    )?;
    drop(stderr);
    ctx.flush_notices();

    match exit {
        LiveExit::Accept if matches!(ctx.global.output, OutputFormat::Table) && last.is_empty() => {
            ctx.status("no matches");
            Ok(())
        }
        LiveExit::Accept => print_list(ctx, &last),
        LiveExit::Abort => Ok(()),
    }
}
