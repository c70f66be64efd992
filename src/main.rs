//! # Blog Store demo
//!
//! Starts the store, loads the demo fixtures and walks through the core
//! behaviours: duplicate emails, view counting and the user delete cascade.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo run -- --config blog-store.toml --no-seed
//! ```

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn, Instrument};

use blog_store::config::{ConfigError, StoreConfig};
use blog_store::framework::{PageRequest, SortDirection};
use blog_store::lifecycle::{setup_tracing, BlogSystem, ShutdownError};
use blog_store::model::UserCreate;
use blog_store::seed::load_demo_data;
use blog_store::services::ServiceError;

#[derive(Debug, Parser)]
#[command(name = "blog-store", version, about = "In-memory users, posts and comments")]
struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip the demo fixtures.
    #[arg(long)]
    no_seed: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    setup_tracing(&config.log_filter);

    info!(capacity = config.channel_capacity, "Starting blog store");
    let system = BlogSystem::new(&config);

    if cli.no_seed || !config.seed_demo_data {
        info!("Skipping demo data");
    } else {
        load_demo_data(&system)
            .instrument(tracing::info_span!("seed"))
            .await?;
    }

    let outcome = run_scenario(&system, config.default_page_size)
        .instrument(tracing::info_span!("scenario"))
        .await;
    if let Err(e) = &outcome {
        error!(error = %e, "Scenario failed");
    }

    system.shutdown().await?;
    info!("Application completed successfully");
    outcome
}

async fn run_scenario(system: &BlogSystem, page_size: u32) -> Result<(), AppError> {
    let author = system
        .users
        .create_user(UserCreate::new("demo_author", "a@x.com", 30))
        .await?;

    match system
        .users
        .create_user(UserCreate::new("impostor", "a@x.com", 30))
        .await
    {
        Err(ServiceError::DuplicateEmail(email)) => info!(%email, "Second account refused"),
        Err(e) => return Err(e.into()),
        Ok(user) => warn!(%user.id, "Duplicate email was accepted"),
    }

    let post = system
        .posts
        .create_post(author.id, "T".to_string(), Some("C".to_string()))
        .await?;
    for _ in 0..3 {
        system.posts.get_post(post.id).await?;
    }
    let post = system.posts.publish_post(post.id).await?;
    info!(%post.id, views = post.view_count, published = post.published, "Post read three times");

    system
        .comments
        .create_comment(post.id, author.id, "First!".to_string())
        .await?;
    let loaded = system.posts.get_post_with_comments(post.id).await?;
    println!("{}", serde_json::to_string_pretty(&loaded)?);

    system.users.delete_user(author.id).await?;
    match system.posts.get_post(post.id).await {
        Err(ServiceError::NotFound { .. }) => info!(%post.id, "Post went with its author"),
        Err(e) => return Err(e.into()),
        Ok(_) => warn!(%post.id, "Post outlived its author"),
    }

    let front_page = system
        .posts
        .get_published_posts_paged(PageRequest::new(0, page_size, "createdAt", SortDirection::Desc))
        .await?;
    for post in &front_page.content {
        info!(%post.id, title = %post.title, views = post.view_count, "Front page");
    }
    info!(total = front_page.total_elements, pages = front_page.total_pages, "Published posts");

    let by_status = system.users.count_users_by_status().await?;
    info!(?by_status, "Users by status");
    Ok(())
}
