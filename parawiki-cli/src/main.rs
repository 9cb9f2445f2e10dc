//! # parawiki CLI
//!
//! Command-line interface for the parawiki content wiki.

mod commands;
mod context;
mod payload;

use clap::{Parser, Subcommand};
use parawiki_core::{CategoryFilter, NewCategory};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parawiki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, env = "PARAWIKI_CONFIG", default_value = "parawiki.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new wiki
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Print the slug generated for a title
    Slug {
        title: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List categories with their article counts
    Categories {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a category
    AddCategory {
        #[arg(long)]
        name: String,

        /// Badge color, e.g. "#10b981"
        #[arg(long, default_value = "#6b7280")]
        color: String,

        #[arg(long)]
        description: Option<String>,

        /// Position in category listings (ascending)
        #[arg(long, default_value_t = 0)]
        order: i64,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List articles, newest first
    Articles {
        /// Case-insensitive text matched against title and summary
        #[arg(long, default_value = "")]
        search: String,

        /// Category id, or "all"
        #[arg(long, default_value = "all")]
        category: CategoryFilter,

        /// Include unpublished drafts
        #[arg(long)]
        include_drafts: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a category page
    Category {
        /// Category id
        id: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single article
    Show {
        /// Article id
        id: String,

        /// Count this as a read of the article
        #[arg(long)]
        count_view: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create an article
    New {
        #[arg(long, default_value = "")]
        title: String,

        /// Override the slug generated from the title
        #[arg(long)]
        slug: Option<String>,

        /// Category id
        #[arg(long, default_value = "")]
        category: String,

        /// Article body (HTML)
        #[arg(long, default_value = "")]
        content: String,

        #[arg(long)]
        summary: Option<String>,

        /// Cover image to upload
        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long)]
        featured: bool,

        /// Save as an unpublished draft
        #[arg(long)]
        draft: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Edit an existing article
    Edit {
        /// Article id
        id: String,

        /// New title (regenerates the slug unless --slug is given)
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        summary: Option<String>,

        /// Cover image to upload
        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long)]
        featured: Option<bool>,

        #[arg(long)]
        published: Option<bool>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Delete an article
    Delete {
        /// Article id
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_wiki(path.as_deref()),
        Commands::Slug { title, json } => commands::show_slug(&title, json),
        Commands::Categories { json } => commands::list_categories(&cli.config, json),
        Commands::AddCategory {
            name,
            color,
            description,
            order,
            json,
        } => commands::add_category(
            &cli.config,
            NewCategory {
                name,
                color,
                description,
                order,
            },
            json,
        ),
        Commands::Articles {
            search,
            category,
            include_drafts,
            json,
        } => {
            let opts = commands::BrowseOptions {
                search,
                category,
                include_drafts,
                json,
            };
            commands::browse_articles(&cli.config, opts)
        }
        Commands::Category { id, json } => commands::show_category(&cli.config, &id, json),
        Commands::Show {
            id,
            count_view,
            json,
        } => commands::show_article(&cli.config, &id, count_view, json),
        Commands::New {
            title,
            slug,
            category,
            content,
            summary,
            image,
            featured,
            draft,
            json,
        } => {
            let fields = commands::ArticleFields {
                title: Some(title),
                slug,
                category: Some(category),
                content: Some(content),
                summary,
                image,
                featured: Some(featured),
                published: Some(!draft),
            };
            commands::new_article(&cli.config, fields, json)
        }
        Commands::Edit {
            id,
            title,
            slug,
            category,
            content,
            summary,
            image,
            featured,
            published,
            json,
        } => {
            let fields = commands::ArticleFields {
                title,
                slug,
                category,
                content,
                summary,
                image,
                featured,
                published,
            };
            commands::edit_article(&cli.config, &id, fields, json)
        }
        Commands::Delete { id } => commands::delete_article(&cli.config, &id),
    }
}
