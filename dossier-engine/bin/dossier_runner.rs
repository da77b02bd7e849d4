use anyhow::Context;
use clap::Parser;
use dossier_engine::config::{self, EngineConfig};
use dossier_engine::{ChoiceSettings, DossierEngine, Generator, InMemoryProjectStore, ModuleCatalog};
use dossier_types::Project;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project record (JSON) to load
    #[arg(short, long)]
    project: PathBuf,

    /// Module whose prompt is assembled
    #[arg(short, long, default_value = "contexte")]
    module: String,

    /// Send the assembled prompt for generation
    #[arg(short, long)]
    generate: bool,

    /// Path to config file with LLM and engine settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let catalog = match &config.engine.catalog_path {
        Some(path) => ModuleCatalog::load(path)?,
        None => ModuleCatalog::builtin(),
    };

    let content = std::fs::read_to_string(&args.project)
        .with_context(|| format!("Failed to read project {}", args.project.display()))?;
    let project: Project = serde_json::from_str(&content).context("Invalid project record")?;
    let owner = project.owner_id.clone();

    let generator = Generator::from_settings(&config.llm)?;
    let engine = DossierEngine::new(
        Arc::new(InMemoryProjectStore::new()),
        Arc::new(catalog),
        generator,
    )
    .with_choice_settings(ChoiceSettings::from(&config.engine));

    let project = engine.create_project(project).await?;
    engine.init_wizard(&project.id, &owner).await?;

    println!("Project: {} ({})", project.title, project.id);
    let overall = engine.get_overall_progress(&project.id, &owner).await?;
    for module in &overall.modules {
        println!(
            "  {:<20} {:>3}%  {}/{}  {:?}",
            module.module_id, module.progress, module.answered, module.total, module.status
        );
    }
    println!("Overall progress: {}%\n", overall.progress);

    let prompt = engine
        .assemble_prompt(&project.id, &owner, &args.module)
        .await?;
    println!("--- Prompt ({}) ---\n{}\n", args.module, prompt);

    if args.generate {
        let content = engine
            .generate_module_content(&project.id, &owner, &args.module)
            .await?;
        println!("--- Generated content ---\n{}", content);
    }

    Ok(())
}
