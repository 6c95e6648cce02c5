use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use rukopis::api::RukopisApi;
use rukopis::catalog::Catalog;
use rukopis::commands::{CmdMessage, CmdResult, MessageLevel};
use rukopis::config::RukopisConfig;
use rukopis::error::{Result, RukopisError};
use rukopis::llm::{self, LlmClient};
use rukopis::model::{ArchiveRef, Page, SearchFilter};
use rukopis::speech::SpeechClient;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, ExportTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub(crate) fn version_string() -> String {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    if GIT_HASH.is_empty() {
        VERSION.to_string()
    } else {
        format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_dir = config_dir();
    let mut config = match RukopisConfig::load(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Warning: Failed to load config, using defaults: {}", err);
            RukopisConfig::default()
        }
    };
    if let Some(data) = &cli.data {
        config.dataset_dir = data.clone();
    }

    match cli.command {
        Commands::Config { key, value } => return handle_config(&config_dir, config, key, value),
        command => {
            let mut api = build_api(&config)?;
            dispatch(&mut api, command)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "rukopis=debug" } else { "rukopis=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "rukopis", "rukopis")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".rukopis"))
}

fn build_api(config: &RukopisConfig) -> Result<RukopisApi> {
    let catalog = Catalog::new(&config.dataset_dir);
    let speech = SpeechClient::new(config.speech.clone());
    let mut api = RukopisApi::new(catalog, speech);

    if let Ok(api_key) = std::env::var("GOOGLE_API_KEY") {
        api = api.with_llm(LlmClient::new(config.llm.clone(), api_key));
    }
    if let Some(path) = &config.vocabulary_path {
        match llm::load_vocabulary(path) {
            Ok(vocabulary) => api = api.with_vocabulary(vocabulary),
            Err(e) => eprintln!("Warning: Failed to load vocabulary: {}", e),
        }
    }
    Ok(api)
}

fn dispatch(api: &mut RukopisApi, command: Commands) -> Result<()> {
    match command {
        Commands::Authors => print_result(&api.authors()?, None),
        Commands::Types { author } => print_result(&api.archive_types(&author)?, None),
        Commands::Archives {
            author,
            archive_type,
        } => print_result(&api.archives(&author, &archive_type)?, None),
        Commands::Pages {
            author,
            archive_type,
            archive,
        } => {
            let aref = ArchiveRef::new(author, archive_type, archive);
            print_result(&api.pages(&aref)?, None)
        }
        Commands::Meta {
            author,
            archive_type,
            archive,
        } => {
            let aref = ArchiveRef::new(author, archive_type, archive);
            print_result(&api.metadata(&aref)?, None)
        }
        Commands::Search { query } => print_result(&api.search(&query)?, None),
        Commands::Find {
            author,
            archive_type,
            text,
        } => {
            let filter = SearchFilter {
                author,
                archive_type,
                free_text: text,
            };
            print_result(&api.search_filtered(&filter)?, None)
        }
        Commands::Export { what } => {
            let (result, output) = match what {
                ExportTarget::Pdf {
                    author,
                    archive_type,
                    archive,
                    output,
                } => {
                    let aref = ArchiveRef::new(author, archive_type, archive);
                    (api.export_document(&aref)?, output)
                }
                ExportTarget::Bundle {
                    author,
                    archive_type,
                    archive,
                    output,
                } => {
                    let aref = ArchiveRef::new(author, archive_type, archive);
                    (api.export_bundle(&aref)?, output)
                }
                ExportTarget::Meta {
                    author,
                    archive_type,
                    archive,
                    output,
                } => {
                    let aref = ArchiveRef::new(author, archive_type, archive);
                    (api.export_metadata(&aref)?, output)
                }
            };
            print_result(&result, output.as_deref())
        }
        Commands::Transcribe {
            author,
            archive_type,
            archive,
            page,
        } => {
            let aref = ArchiveRef::new(author, archive_type, archive);
            print_result(&api.transcribe_page(&aref, page)?, None)
        }
        Commands::Adapt {
            author,
            archive_type,
            archive,
            page,
        } => {
            let aref = ArchiveRef::new(author, archive_type, archive);
            print_result(&api.adapt_page(&aref, page)?, None)
        }
        Commands::Tei {
            author,
            archive_type,
            archive,
            page,
        } => {
            let aref = ArchiveRef::new(author, archive_type, archive);
            print_result(&api.tei_page(&aref, page)?, None)
        }
        Commands::Describe {
            author,
            archive_type,
            archive,
            page,
        } => {
            let aref = ArchiveRef::new(author, archive_type, archive);
            print_result(&api.describe_page(&aref, page)?, None)
        }
        Commands::Narrate {
            author,
            archive_type,
            archive,
            page,
            output,
        } => {
            let aref = ArchiveRef::new(author, archive_type, archive);
            let result = api.narrate_page(&aref, page)?;
            print_result(&result, output.as_deref())
        }
        Commands::Config { .. } => unreachable!("handled before the api is built"),
    }
}

fn handle_config(
    config_dir: &std::path::Path,
    mut config: RukopisConfig,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    match (key, value) {
        (Some(key), Some(value)) => {
            if config.set(&key, &value) {
                config.save(config_dir)?;
                println!("{} = {}", key, value);
            } else {
                println!("Unknown config key or invalid value: {}", key);
            }
        }
        (Some(key), None) => match config.get(&key) {
            Some(value) => println!("{} = {}", key, value),
            None => println!("Unknown config key: {}", key),
        },
        (None, _) => {
            for key in ["dataset-dir", "model", "speaker", "seed", "vocabulary"] {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
    }
    Ok(())
}

fn print_result(result: &CmdResult, output: Option<&std::path::Path>) -> Result<()> {
    print_messages(&result.messages);

    for name in &result.listed {
        println!("{}", name);
    }
    if !result.pages.is_empty() {
        print_pages(&result.pages);
    }
    if !result.results.is_empty() {
        print_search_results(&result.results);
    }
    if let Some(table) = &result.table {
        print_table(&table.rows);
    }
    if let Some(text) = &result.text {
        println!("{}", text);
    }
    if let Some(artifact) = &result.artifact {
        let path = output
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
        std::fs::write(&path, &artifact.bytes).map_err(RukopisError::Io)?;
        println!(
            "{}",
            format!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len()).green()
        );
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_pages(pages: &[Page]) {
    for page in pages {
        println!(
            "{} {}",
            format!("{:>3}", page.ordinal).yellow(),
            page.file_name()
        );
    }
}

/// Column-aligned `author / type / archive` listing. Display width, not
/// char count: the catalog is mostly Cyrillic.
fn print_search_results(results: &[ArchiveRef]) {
    let author_width = results.iter().map(|r| r.author.width()).max().unwrap_or(0);
    let type_width = results
        .iter()
        .map(|r| r.archive_type.width())
        .max()
        .unwrap_or(0);
    for r in results {
        println!(
            "{} {} {} {} {}",
            pad(&r.author, author_width).bold(),
            "/".dimmed(),
            pad(&r.archive_type, type_width),
            "/".dimmed(),
            r.archive
        );
    }
}

fn print_table(rows: &[Vec<String>]) {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}
