#[macro_use]
extern crate log;

mod auth;
mod chapters;
mod novels;
mod output;
mod prompt;
mod settings;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use webnovel_client::{
    ClientConfig, ClientContext,
    config::api_url,
    storage::FileStorage,
};
use webnovel_lib::prelude::SortOrder;

use output::Output;

#[derive(Parser)]
#[command(version, about = "Manage a webnovel and manhwa library")]
struct Opts {
    /// Path to config file
    #[arg(long)]
    config: Option<String>,
    /// Content service origin, overrides the config file
    #[arg(long)]
    base_url: Option<String>,
    /// Print `{success, data, error}` JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    Login {
        email: String,
        /// Read from stdin when left out
        #[arg(long)]
        password: Option<String>,
    },
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    #[command(subcommand)]
    Novels(novels::NovelsCommand),
    /// Print the chapter list, one server page at a time
    Chapters {
        novel_id: String,
        #[arg(long, default_value = "desc")]
        sort: SortOrder,
        /// How many pages to load, 0 loads all of them
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Page through the chapter list interactively
    Browse {
        novel_id: String,
        #[arg(long, default_value = "desc")]
        sort: SortOrder,
    },
    /// Scrape the chapter list from the source again
    Fetch { novel_id: String },
    Read(chapters::ReadArgs),
    /// Record the chapter you are on
    Progress { novel_id: String, chapter: u32 },
    Download(chapters::DownloadArgs),
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        if let Ok(level) = std::env::var("WEBNOVEL_LOG") {
            builder.parse_filters(&format!("webnovel={level},webnovel_client={level}"));
        }
    }
    builder.init();
}

#[tokio::main]
async fn main() {
    init_logger();

    let opts: Opts = Opts::parse();
    let out = Output::new(opts.json);

    if let Err(e) = run(opts, &out).await {
        error!("{e:?}");
        out.fail(&e);
        std::process::exit(1);
    }
}

async fn run(opts: Opts, out: &Output) -> Result<(), anyhow::Error> {
    let mut config = ClientConfig::open(opts.config)?;
    if let Some(base_url) = opts.base_url {
        config.base_url = api_url(&base_url);
    }
    config.validate()?;
    debug!("config: {:?}", config);

    let storage = Arc::new(FileStorage::open(&config.storage_path)?);
    let ctx = ClientContext::new(config, storage)?;

    match opts.cmd {
        Command::Login { email, password } => auth::login(&ctx, out, &email, password).await,
        Command::Register {
            username,
            email,
            password,
        } => auth::register(&ctx, out, &username, &email, password).await,
        Command::Logout => auth::logout(&ctx, out).await,
        Command::Whoami => auth::whoami(&ctx, out).await,
        Command::Novels(cmd) => novels::run(&ctx, out, cmd).await,
        Command::Chapters {
            novel_id,
            sort,
            pages,
        } => chapters::list(&ctx, out, &novel_id, sort, pages).await,
        Command::Browse { novel_id, sort } => chapters::browse(&ctx, out, &novel_id, sort).await,
        Command::Fetch { novel_id } => chapters::fetch(&ctx, out, &novel_id).await,
        Command::Read(args) => chapters::read(&ctx, out, args).await,
        Command::Progress { novel_id, chapter } => {
            chapters::progress(&ctx, out, &novel_id, chapter).await
        }
        Command::Download(args) => chapters::download(&ctx, out, args).await,
        Command::Settings(cmd) => settings::run(&ctx, out, cmd).await,
    }
}
