use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use webnovel_client::{ApiClient, ChapterController, ChapterResponse, ClientContext, EpubFile};
use webnovel_lib::prelude::{
    Chapter, ChapterContent, ContentFormat, DownloadRange, Language, SortOrder,
};

use crate::{output::Output, prompt::Prompt};

#[derive(Args)]
pub struct ReadArgs {
    novel_id: String,
    chapter: u32,
    /// raw or epub
    #[arg(long, default_value = "raw")]
    format: ContentFormat,
    /// en or es
    #[arg(long, default_value = "en")]
    language: Language,
    /// Where EPUB files are written
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

/// Downloads the whole novel unless a chapter selection is given
#[derive(Args)]
pub struct DownloadArgs {
    novel_id: String,
    #[arg(long, conflicts_with_all = ["start", "end", "chapters"])]
    single: Option<u32>,
    #[arg(long)]
    start: Option<u32>,
    #[arg(long)]
    end: Option<u32>,
    /// Comma separated chapter numbers
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["start", "end"])]
    chapters: Option<Vec<u32>>,
    #[arg(long, default_value = "en")]
    language: Language,
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Serialize)]
struct ChapterList<'a> {
    novel_id: &'a str,
    sort_order: SortOrder,
    current_page: u32,
    total_pages: u32,
    has_more: bool,
    chapters: Vec<Chapter>,
}

impl<'a> ChapterList<'a> {
    fn of(novel_id: &'a str, controller: &ChapterController<ApiClient>) -> Self {
        Self {
            novel_id,
            sort_order: controller.sort_order(),
            current_page: controller.current_page(),
            total_pages: controller.total_pages(),
            has_more: controller.has_more(),
            chapters: controller.chapters(),
        }
    }
}

#[derive(Serialize)]
struct SavedFile {
    filename: String,
    path: PathBuf,
    bytes: usize,
}

fn print_chapter(chapter: &Chapter) {
    let mut flags = String::new();
    if chapter.read {
        flags.push_str(" [read]");
    }
    if chapter.downloaded {
        flags.push_str(" [downloaded]");
    }
    println!("{:>6}  {}{flags}", chapter.chapter_number, chapter.display_title());
}

fn print_list(list: &ChapterList) {
    list.chapters.iter().for_each(print_chapter);
    println!(
        "-- page {}/{} ({}, {} chapters{})",
        list.current_page,
        list.total_pages,
        list.sort_order,
        list.chapters.len(),
        if list.has_more { ", more available" } else { "" }
    );
}

async fn save(file: &EpubFile, dir: &Path) -> Result<SavedFile, anyhow::Error> {
    let path = file.save_to(dir).await?;
    info!("saved {path:?}");
    Ok(SavedFile {
        filename: file.filename.clone(),
        path,
        bytes: file.bytes.len(),
    })
}

fn print_saved(saved: &SavedFile) {
    println!("saved {} ({} bytes)", saved.path.display(), saved.bytes);
}

pub async fn list(
    ctx: &ClientContext,
    out: &Output,
    novel_id: &str,
    sort: SortOrder,
    pages: u32,
) -> Result<(), anyhow::Error> {
    let controller = ctx.chapter_controller();
    controller.load_initial(novel_id, sort).await?;
    while controller.has_more() && (pages == 0 || controller.current_page() < pages) {
        controller.load_next_page().await?;
    }

    out.emit(&ChapterList::of(novel_id, &controller), print_list)
}

pub async fn browse(
    ctx: &ClientContext,
    out: &Output,
    novel_id: &str,
    sort: SortOrder,
) -> Result<(), anyhow::Error> {
    let controller = ctx.chapter_controller();
    controller.load_initial(novel_id, sort).await?;
    out.emit(&ChapterList::of(novel_id, &controller), print_list)?;

    let mut prompt = Prompt::new();
    loop {
        let label = if controller.has_more() {
            "[n]ext page, [s]ort, [q]uit: "
        } else {
            "[s]ort, [q]uit: "
        };
        let Some(answer) = prompt.ask(label).await? else {
            break;
        };

        // after a next page only the merged chapters are printed
        let shown_from = match answer.as_str() {
            "n" | "next" | "" if !controller.has_more() => {
                println!("no more chapters");
                continue;
            }
            "n" | "next" | "" => {
                let before = controller.len();
                if let Err(e) = controller.load_next_page().await {
                    eprintln!("{e}");
                    continue;
                }
                before
            }
            "s" | "sort" => {
                controller.toggle_sort_order().await?;
                0
            }
            "q" | "quit" => break,
            other => {
                println!("unknown choice {other:?}");
                continue;
            }
        };

        out.emit(&ChapterList::of(novel_id, &controller), |list| {
            let from = shown_from.min(list.chapters.len());
            list.chapters[from..].iter().for_each(print_chapter);
            println!(
                "-- page {}/{} ({}, {} chapters)",
                list.current_page,
                list.total_pages,
                list.sort_order,
                list.chapters.len()
            );
        })?;
    }

    Ok(())
}

pub async fn fetch(ctx: &ClientContext, out: &Output, novel_id: &str) -> Result<(), anyhow::Error> {
    let page = ctx.library.refresh_chapters(novel_id).await?;
    out.emit(&page, |page| {
        println!("{novel_id} now lists {} chapters", page.chapters.len());
    })
}

pub async fn read(ctx: &ClientContext, out: &Output, args: ReadArgs) -> Result<(), anyhow::Error> {
    let res = ctx
        .library
        .read_chapter(&args.novel_id, args.chapter, args.format, args.language)
        .await?;

    match res {
        ChapterResponse::Content(content) => out.emit(&content, |content| match content {
            ChapterContent::Text(text) => {
                let title = text.chapter_title.as_deref().unwrap_or(&text.title);
                println!("{} - {title}", text.chapter_number);
                println!();
                println!("{}", text.content);
            }
            ChapterContent::Images(content) => {
                for image in &content.images {
                    println!("{}", image.url);
                }
            }
        }),
        ChapterResponse::Epub(file) => {
            let saved = save(&file, &args.out).await?;
            out.emit(&saved, print_saved)
        }
    }
}

pub async fn progress(
    ctx: &ClientContext,
    out: &Output,
    novel_id: &str,
    chapter: u32,
) -> Result<(), anyhow::Error> {
    let novel = ctx.library.update_reading_progress(novel_id, chapter).await?;
    out.emit(&novel, |novel| match novel.reading_progress {
        Some(progress) => println!("{} at chapter {chapter} ({progress:.1}%)", novel.title),
        None => println!("{} at chapter {chapter}", novel.title),
    })
}

pub async fn download(
    ctx: &ClientContext,
    out: &Output,
    args: DownloadArgs,
) -> Result<(), anyhow::Error> {
    let file = match (args.chapters, args.single, args.start, args.end) {
        (Some(chapters), ..) => {
            ctx.library
                .download_chapters(&args.novel_id, &chapters, args.language)
                .await?
        }
        (None, Some(single), ..) => {
            ctx.library
                .download(&args.novel_id, DownloadRange::Single(single))
                .await?
        }
        (None, None, None, None) => ctx.library.download(&args.novel_id, DownloadRange::All).await?,
        (None, None, start, end) => {
            ctx.library
                .download(&args.novel_id, DownloadRange::Range { start, end })
                .await?
        }
    };

    let saved = save(&file, &args.out).await?;
    out.emit(&saved, print_saved)
}
