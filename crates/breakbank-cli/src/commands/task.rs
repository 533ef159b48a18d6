use breakbank_core::ValidationError;
use clap::Subcommand;

use crate::session::{print_outcome, CliResult, Session};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task (newest tasks are listed first)
    Add {
        /// Task name
        name: String,
    },
    /// Attribute work time to a task from now on
    Select {
        /// Task name
        name: String,
    },
    /// List tasks; the selected one is marked with '*'
    List {
        /// Only show tasks containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Show at most this many tasks
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Reject blank names before they reach the engine.
fn task_name(raw: &str) -> Result<&str, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyTaskName);
    }
    Ok(name)
}

pub fn run(action: TaskAction, now: Option<i64>) -> CliResult {
    let mut session = Session::open(now)?;

    match action {
        TaskAction::Add { name } => {
            let name = task_name(&name)?;
            match session.engine.add_task(name) {
                Some(event) => print_outcome(Some(event), &session.engine)?,
                None => eprintln!("task already exists: {name}"),
            }
        }
        TaskAction::Select { name } => {
            let name = task_name(&name)?;
            if !session.engine.tasks().contains(name) {
                return Err(ValidationError::InvalidValue {
                    field: "task".into(),
                    message: format!("unknown task '{name}' (add it first)"),
                }
                .into());
            }
            let event = session.engine.set_selected_task(name);
            print_outcome(event, &session.engine)?;
        }
        TaskAction::List {
            search,
            limit,
            json,
        } => {
            let needle = search.unwrap_or_default();
            let tasks: Vec<_> = session
                .engine
                .tasks()
                .search(&needle)
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                let selected = session.engine.selected_task();
                for task in tasks {
                    let marker = if task.name == selected { "*" } else { " " };
                    println!("{marker} {}", task.name);
                }
            }
        }
    }

    session.save()?;
    Ok(())
}
