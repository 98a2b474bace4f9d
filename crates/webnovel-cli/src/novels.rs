use clap::Subcommand;
use webnovel_client::ClientContext;
use webnovel_lib::prelude::{Novel, NovelCreate, NovelFilter, NovelType, NovelUpdate};

use crate::output::Output;

#[derive(Subcommand)]
pub enum NovelsCommand {
    /// List the library
    List {
        /// all, novel or manhwa
        #[arg(long = "type", default_value = "all")]
        filter: NovelFilter,
    },
    Show { novel_id: String },
    /// Add a novel by its source URL, metadata is scraped when no title is given
    Add {
        source_url: String,
        #[arg(long)]
        source_name: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type", default_value = "novel")]
        kind: NovelType,
    },
    Edit {
        novel_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        cover_image_url: Option<String>,
        /// Comma separated
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long = "type")]
        kind: Option<NovelType>,
    },
    Delete { novel_id: String },
}

fn print_summary(novel: &Novel) {
    let chapters = novel
        .total_chapters
        .or_else(|| novel.chapters.as_ref().map(|c| c.len() as u32))
        .map(|n| format!("{n} chapters"))
        .unwrap_or_else(|| "no chapters".to_string());
    println!("{:<26} {:<8} {} ({chapters})", novel.id, novel.kind.as_str(), novel.title);
}

fn print_detail(novel: &Novel) {
    println!("{}", novel.title);
    println!("  id:       {}", novel.id);
    println!("  type:     {}", novel.kind);
    if let Some(author) = &novel.author {
        println!("  author:   {author}");
    }
    if let Some(status) = &novel.status {
        println!("  status:   {status}");
    }
    println!("  source:   {} ({})", novel.source_url, novel.source_name);
    if !novel.tags.is_empty() {
        println!("  tags:     {}", novel.tags.join(", "));
    }
    if let Some(progress) = novel.reading_progress {
        println!("  progress: {progress:.1}%");
    }
    if let Some(updated) = novel.last_updated_chapters.or(novel.last_updated_api) {
        println!("  updated:  {}", updated.format("%Y-%m-%d %H:%M"));
    }
    if let Some(description) = &novel.description {
        println!();
        println!("{description}");
    }
}

pub async fn run(
    ctx: &ClientContext,
    out: &Output,
    cmd: NovelsCommand,
) -> Result<(), anyhow::Error> {
    let library = &ctx.library;

    match cmd {
        NovelsCommand::List { filter } => {
            library.refresh().await?;
            library.store().filter_by_type(filter);
            let novels = library.store().filtered_novels();
            out.emit(&novels, |novels| {
                if novels.is_empty() {
                    println!("library is empty");
                }
                novels.iter().for_each(print_summary);
            })
        }
        NovelsCommand::Show { novel_id } => {
            let novel = library.open(&novel_id).await?;
            out.emit(&novel, print_detail)
        }
        NovelsCommand::Add {
            source_url,
            source_name,
            title,
            kind,
        } => {
            let novel = library
                .create(&NovelCreate {
                    title: title.unwrap_or_default(),
                    source_url,
                    source_name,
                    kind,
                    ..Default::default()
                })
                .await?;
            out.emit(&novel, |novel| {
                print!("added ");
                print_summary(novel);
            })
        }
        NovelsCommand::Edit {
            novel_id,
            title,
            author,
            description,
            status,
            cover_image_url,
            tags,
            kind,
        } => {
            let update = NovelUpdate {
                title,
                author,
                description,
                status,
                cover_image_url,
                tags,
                kind,
                ..Default::default()
            };
            let novel = library.update(&novel_id, &update).await?;
            out.emit(&novel, print_detail)
        }
        NovelsCommand::Delete { novel_id } => {
            library.delete(&novel_id).await?;
            out.message(&format!("deleted {novel_id}"))
        }
    }
}
