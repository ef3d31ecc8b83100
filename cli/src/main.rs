mod logging;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use async_std::task;
use clap::Parser;
use core_types::{DeletionTarget, Target, events::DeletionEvent};
use deletion_service::{
    batch_deletion::{BatchDeletionOrchestrator, BatchOutcome, ConfirmationView},
    relation_lookup::RowState,
    texts::DeletionTexts,
};

use crate::store::{Fixture, InMemoryStore};

#[derive(Parser, Debug)]
#[command(name = "bulk-delete")]
struct Cli {
    /// Fixture file with the objects, their relations and simulated failures
    fixture: PathBuf,

    /// JSON file overriding the confirmation texts
    #[arg(long)]
    texts: Option<PathBuf>,

    /// Only delete the objects with these ids (default: all objects)
    #[arg(long = "id")]
    ids: Vec<String>,

    /// Do not look up what else is affected
    #[arg(long)]
    no_relations: bool,

    /// Confirm the deletion instead of only showing it
    #[arg(long)]
    yes: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();
    let args = Cli::parse();
    task::block_on(run(args))
}

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::load(&args.fixture)?;
    tracing::info!(
        "Loaded {} object(s) from {}",
        fixture.objects.len(),
        args.fixture.display()
    );
    let store = Arc::new(InMemoryStore::new(fixture));
    let texts = match &args.texts {
        Some(path) => DeletionTexts::from_json(&std::fs::read_to_string(path)?)?,
        None => DeletionTexts::default(),
    };

    let objects: Vec<Arc<Target>> = store
        .list()
        .into_iter()
        .filter(|target| {
            args.ids.is_empty() || target.id().is_some_and(|id| args.ids.contains(&id))
        })
        .collect();

    let (tx, rx) = flume::unbounded();
    let mut orchestrator = BatchDeletionOrchestrator::new(objects, store.clone())
        .with_texts(texts)
        .with_event_sender(tx);
    if !args.no_relations {
        orchestrator = orchestrator.with_used_by(store.clone());
    }

    if orchestrator.table().is_expandable() {
        orchestrator.table().expand_all().await;
    }
    print_view(&orchestrator.render());

    if !args.yes {
        println!("\nRun again with --yes to delete.");
        return Ok(());
    }

    let outcome = orchestrator.confirm().await?;
    for event in rx.try_iter() {
        match event {
            DeletionEvent::Message(message) => {
                println!("\n[{}] {}", message.level, message.message);
                if let Some(description) = message.description {
                    println!("  {}", description);
                }
            }
            DeletionEvent::Refresh => {
                println!("{} object(s) left in the store.", store.len());
            }
        }
    }

    match outcome {
        BatchOutcome::Succeeded { count } => {
            tracing::info!("Deleted {}, {} left in the store", count, store.len());
            Ok(())
        }
        BatchOutcome::Failed { count, failed, .. } => {
            tracing::warn!("{} of {} deletions failed", failed, count);
            Err(format!("{} of {} deletions failed", failed, count).into())
        }
    }
}

fn print_view(view: &ConfirmationView) {
    println!("{}", view.title);
    println!("{}\n", view.subtext);

    let widths: Vec<usize> = view
        .table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            view.table
                .rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell.value.len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = view
        .table
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column, width = width))
        .collect();
    println!("  {}", header.join("  "));

    for row in &view.table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell.value, width = width))
            .collect();
        println!("  {}", cells.join("  "));

        match &row.detail {
            RowState::Collapsed => {}
            RowState::Loading => println!("      Loading..."),
            RowState::Loaded(summary) => {
                for line in summary.lines() {
                    println!("      - {}", line);
                }
            }
            RowState::Failed(detail) => println!("      Failed to load relations: {}", detail),
        }
    }

    println!("\n[{}] [{}]", view.confirm_label, view.cancel_label);
}
