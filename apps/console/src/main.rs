use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use composer_core::{
    ComposerSession, HttpProjectRepository, MissingProjectRepository, Navigator, ProjectDraft,
    ProjectRepository,
};
use shared::{
    domain::{ProjectId, RecordKind, UserId},
    protocol::{ColumnKind, ProjectSummary, PROJECT_TABLE_COLUMNS},
};
use tracing::info;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the project service. Falls back to composer.toml / env.
    #[arg(long)]
    service_url: Option<String>,
    /// Acting user, recorded as the default project owner.
    #[arg(long)]
    owner: Option<String>,
    /// Name for the composed project.
    #[arg(long, default_value = "Console demo project")]
    name: String,
    /// Compose and print the payload without submitting.
    #[arg(long)]
    dry_run: bool,
}

struct PrintingNavigator;

#[async_trait]
impl Navigator for PrintingNavigator {
    async fn go_to_record(&self, record_id: ProjectId, kind: RecordKind) -> Result<()> {
        println!("(navigate) open {kind:?} record {record_id}");
        Ok(())
    }
}

fn print_draft(draft: &ProjectDraft) {
    println!("Draft '{}' owned by {}:", draft.name, draft.owner_id);
    for milestone in &draft.milestones {
        println!("  {}: {}", milestone.label, milestone.name);
        for todo in &milestone.todos {
            let mark = if todo.is_complete { "x" } else { " " };
            println!("    [{mark}] {}: {}", todo.label, todo.name);
        }
    }
}

fn print_listing(rows: &[ProjectSummary]) {
    let header: Vec<&str> = PROJECT_TABLE_COLUMNS
        .iter()
        .map(|column| column.label)
        .collect();
    println!("{}", header.join(" | "));

    for row in rows {
        let cells: Vec<String> = PROJECT_TABLE_COLUMNS
            .iter()
            .map(|column| match column.kind {
                ColumnKind::Percent => format!("{:.0}%", row.percent_complete),
                ColumnKind::Action => format!("view {}", row.id),
                ColumnKind::Text => match column.field {
                    "name" => row.name.clone(),
                    "status" => row.status.clone(),
                    "owner_name" => row.owner_name.clone().unwrap_or_else(|| "-".to_string()),
                    other => other.to_string(),
                },
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = config::load_settings();

    let owner = UserId::from(args.owner.clone().unwrap_or(settings.owner_id));
    let service_url = args.service_url.clone().or(settings.service_url);

    let repository: Arc<dyn ProjectRepository> = match &service_url {
        Some(url) => {
            let url = config::normalize_service_url(url);
            info!("using project service at {url}");
            Arc::new(HttpProjectRepository::new(url))
        }
        None => Arc::new(MissingProjectRepository),
    };
    let session =
        ComposerSession::new_with_dependencies(owner, repository, Arc::new(PrintingNavigator));

    // Initial listing load. A failure keeps the empty cache and is logged.
    if service_url.is_some() {
        let _ = session.refresh_listing().await;
        print_listing(&session.listing().await);
    }

    // Compose a small tree the way a host form would.
    session.rename_project(args.name.clone()).await;
    session.rename_milestone(0, "Design").await?;
    session.rename_todo(0, 0, "Draft the outline").await?;
    session.set_todo_complete(0, 0, true).await?;
    session.add_milestone().await;
    session.rename_milestone(1, "Build").await?;
    session.add_todo(1).await?;
    session.rename_todo(1, 0, "Scaffold the repo").await?;
    session.rename_todo(1, 1, "Wire the service").await?;

    let draft = session.draft().await;
    print_draft(&draft);
    println!(
        "Payload: {}",
        serde_json::to_string_pretty(&composer_core::build_payload(&draft))?
    );

    if args.dry_run || service_url.is_none() {
        println!("No submission (dry run or no service configured).");
        return Ok(());
    }

    session.submit().await?;
    println!("Project created.");

    let rows = session.listing().await;
    print_listing(&rows);
    if let Some(first) = rows.first() {
        session.view_project(first.id.clone()).await?;
    }

    Ok(())
}
