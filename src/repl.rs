// Interactive session: reads commands line by line and redraws after each change

use crate::error::TaskError;
use crate::filter::Filter;
use crate::store::{Stats, TaskStore};
use crate::task::Task;
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// One line of session input
#[derive(Parser, Debug)]
#[command(name = "todostore", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task
    #[command(disable_help_flag = true)]
    Add {
        /// Task text, taken verbatim from the input line
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        #[allow(dead_code)]
        text: Vec<String>,
    },

    /// Mark a task done, or not done again
    Toggle { id: u64 },

    /// Replace a task's text
    #[command(disable_help_flag = true)]
    Edit {
        id: u64,
        /// Task text, taken verbatim from the input line
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        #[allow(dead_code)]
        text: Vec<String>,
    },

    /// Delete a task
    #[command(visible_aliases = ["rm", "delete"])]
    Remove {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show all, completed or pending tasks
    Filter { filter: Filter },

    /// Show the tasks matching the current filter
    List,

    /// Show total, completed and pending counts
    Stats,

    /// Delete every completed task
    ClearCompleted,

    /// End the session
    #[command(visible_alias = "exit")]
    Quit,
}

/// Front end behavior switches
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Emit views as JSON lines instead of text
    pub json: bool,
    /// Ask before removing; never asked in JSON mode
    pub confirm_delete: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            json: false,
            confirm_delete: true,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Serialize)]
struct View<'a> {
    filter: Filter,
    tasks: &'a [Task],
    stats: Stats,
}

/// Presentation layer over a `TaskStore`
///
/// Generic over its streams so tests can drive it with in-memory buffers.
pub struct Session<R, W> {
    store: TaskStore,
    input: R,
    output: W,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(store: TaskStore, input: R, output: W, options: SessionOptions) -> Self {
        Self {
            store,
            input,
            output,
            options,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        info!("Session started");
        if !self.options.json {
            writeln!(self.output, "Type `help` for a list of commands.")?;
        }
        self.render()?;

        let mut line = String::new();
        loop {
            self.prompt("> ")?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            if line.trim().is_empty() {
                continue;
            }

            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }

        info!(tasks = self.store.len(), "Session ended");
        Ok(())
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let command = match Line::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                let rendered = e.render().to_string();
                if self.options.json {
                    // Help output is not an error
                    let value = if e.use_stderr() {
                        serde_json::json!({ "error": rendered.trim_end() })
                    } else {
                        serde_json::json!({ "message": rendered.trim_end() })
                    };
                    writeln!(self.output, "{}", value)?;
                } else {
                    write!(self.output, "{}", rendered)?;
                }
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "execute");

        match command {
            // Text is taken from the raw line so inner spacing survives
            Command::Add { .. } => {
                let result = self.store.add(text_after(line, 1));
                self.report(result, "Added")?;
            }
            Command::Toggle { id } => {
                let result = self.store.toggle(id);
                self.report(result, "Toggled")?;
            }
            Command::Edit { id, .. } => {
                let result = self.store.edit(id, text_after(line, 2));
                self.report(result, "Updated")?;
            }
            Command::Remove { id, yes } => self.remove(id, yes)?,
            Command::Filter { filter } => {
                self.store.set_filter(filter);
                self.render()?;
            }
            Command::List => self.render_list()?,
            Command::Stats => self.render_stats()?,
            Command::ClearCompleted => {
                let removed = self.store.clear_completed();
                self.message(&format!("Cleared {} completed task(s)", removed))?;
                self.render()?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn remove(&mut self, id: u64, yes: bool) -> Result<()> {
        if self.store.get(id).is_none() {
            self.message(&format!("Task {} is already gone", id))?;
            return Ok(());
        }

        let ask = self.options.confirm_delete && !self.options.json && !yes;
        if ask && !self.confirm("Are you sure you want to delete this task?")? {
            self.message("Cancelled")?;
            return Ok(());
        }

        if let Some(task) = self.store.remove(id) {
            self.message(&format!("Removed task {}: {}", task.id, task.text))?;
        }
        self.render()
    }

    /// Print the outcome of a mutation; redraw only if something changed
    fn report(&mut self, result: Result<Task, TaskError>, verb: &str) -> Result<()> {
        match result {
            Ok(task) => {
                self.message(&format!("{} task {}: {}", verb, task.id, task.text))?;
                self.render()
            }
            Err(e) => {
                let hint = match e {
                    TaskError::EmptyText => " (please enter a task)",
                    TaskError::TooLong { .. } => " (shorten the text)",
                    _ => "",
                };
                if self.options.json {
                    writeln!(self.output, "{}", serde_json::json!({ "error": e.to_string() }))?;
                } else {
                    writeln!(self.output, "{} {}{}", "error:".red().bold(), e, hint)?;
                }
                Ok(())
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.prompt(&format!("{} [y/N] ", question))?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        if !self.options.json {
            write!(self.output, "{}", text)?;
            self.output.flush()?;
        }
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<()> {
        if self.options.json {
            writeln!(self.output, "{}", serde_json::json!({ "message": text }))?;
        } else {
            writeln!(self.output, "{}", text)?;
        }
        Ok(())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Full redraw: filtered list followed by the counts
    fn render(&mut self) -> Result<()> {
        if self.options.json {
            let tasks = self.store.list();
            let view = View {
                filter: self.store.filter(),
                tasks: &tasks,
                stats: self.store.stats(),
            };
            writeln!(self.output, "{}", serde_json::to_string(&view)?)?;
            return Ok(());
        }

        self.render_list()?;
        self.render_stats()
    }

    fn render_list(&mut self) -> Result<()> {
        let tasks = self.store.list();
        if self.options.json {
            writeln!(self.output, "{}", serde_json::to_string(&tasks)?)?;
            return Ok(());
        }

        writeln!(self.output, "{}", format!("Tasks ({})", self.store.filter()).bold())?;
        if self.store.is_view_empty() {
            writeln!(self.output, "  {}", "No tasks to show.".dimmed())?;
            return Ok(());
        }

        for task in &tasks {
            writeln!(self.output, "{}", format_task(task))?;
        }
        Ok(())
    }

    fn render_stats(&mut self) -> Result<()> {
        let stats = self.store.stats();
        if self.options.json {
            writeln!(self.output, "{}", serde_json::to_string(&stats)?)?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Total: {} | Completed: {} | Pending: {}",
            stats.total,
            stats.completed.to_string().green(),
            stats.pending.to_string().yellow()
        )?;
        Ok(())
    }
}

/// The raw remainder of `line` after its first `skip` words
fn text_after(line: &str, skip: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..skip {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest
}

fn format_task(task: &Task) -> String {
    let created = task
        .created_at_utc()
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    if task.completed {
        format!(
            "  {} {:>3}  {}  {}",
            "[x]".green(),
            task.id,
            task.text.strikethrough().dimmed(),
            created.dimmed()
        )
    } else {
        format!("  [ ] {:>3}  {}  {}", task.id, task.text, created.dimmed())
    }
}
