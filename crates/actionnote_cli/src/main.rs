//! `actionnote` command-line entry point.
//!
//! # Responsibility
//! - Expose text extraction and the notes store as subcommands.
//! - Print every result as JSON on stdout; errors go to stderr.

use actionnote_core::db::open_db;
use actionnote_core::{
    extract_action_items, extract_hashtags, extract_line_matches, init_logging,
    init_stderr_logging, try_extract_action_items_llm,
    ActionItemListQuery, ActionItemService, AppConfig, ExtractionMode, ExtractionService,
    NoteSearchQuery, NoteService, NotesSort, OllamaClient, SortOrder, SqliteActionItemRepository,
    SqliteNoteRepository, ACTION_ITEM_SORT_FIELDS,
};
use clap::{Parser, Subcommand};
use log::error;
use serde::Serialize;
use serde_json::json;
use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Extract action items and hashtags from free-form notes
#[derive(Parser, Debug)]
#[command(name = "actionnote", version)]
struct Cli {
    /// SQLite database file (overrides ACTIONNOTE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Dotenv file to load instead of `./.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract action items from a file or stdin
    Extract {
        #[arg(long)]
        file: Option<PathBuf>,
        /// Ask the configured chat model, falling back to the heuristic
        #[arg(long)]
        llm: bool,
        /// Report the matching rule and priority of each line
        #[arg(long, conflicts_with = "llm")]
        rules: bool,
    },
    /// Extract hashtags from a file or stdin
    Hashtags {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Manage stored notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Manage action items
    #[command(subcommand)]
    Items(ItemsCommand),
}

#[derive(Subcommand, Debug)]
enum NoteCommand {
    /// Store a note; content is read from --file or stdin when omitted
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, conflicts_with = "content")]
        file: Option<PathBuf>,
    },
    Get {
        id: i64,
    },
    Search {
        #[arg(long)]
        q: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        /// `created_desc` or `title_asc`
        #[arg(long, default_value = "created_desc")]
        sort: String,
    },
    Delete {
        id: i64,
    },
    /// Run extraction over a stored note
    Extract {
        id: i64,
        /// Persist extracted tags and action items
        #[arg(long)]
        apply: bool,
        #[arg(long)]
        llm: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ItemsCommand {
    List {
        #[arg(long)]
        completed: Option<bool>,
        #[arg(long)]
        note: Option<i64>,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
        /// Column name, `-` prefix for descending
        #[arg(long, default_value = "-created_at")]
        sort: String,
    },
    Add {
        description: String,
        #[arg(long)]
        note: Option<i64>,
    },
    Complete {
        id: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(cli.env_file.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    match &config.log_dir {
        Some(log_dir) => init_logging(&config.log_level, log_dir)?,
        None => init_stderr_logging(&config.log_level)?,
    }

    match cli.command {
        Command::Extract { file, llm, rules } => {
            let text = read_input(file.as_deref())?;
            if rules {
                print_json(&json!({ "matches": extract_line_matches(&text) }))
            } else if llm {
                let client = OllamaClient::from_config(&config.llm)?;
                let outcome = try_extract_action_items_llm(&text, &client);
                let used_fallback = outcome.is_fallback();
                print_json(&json!({
                    "action_items": outcome.resolve(&text),
                    "used_fallback": used_fallback,
                }))
            } else {
                print_json(&json!({ "action_items": extract_action_items(&text) }))
            }
        }
        Command::Hashtags { file } => {
            let text = read_input(file.as_deref())?;
            print_json(&json!({ "tags": extract_hashtags(&text) }))
        }
        Command::Note(command) => run_note(&config, command),
        Command::Items(command) => run_items(&config, command),
    }
}

fn run_note(config: &AppConfig, command: NoteCommand) -> Result<(), Box<dyn Error>> {
    let mut conn = open_db(&config.db_path)?;

    match command {
        NoteCommand::Add {
            title,
            content,
            file,
        } => {
            let content = match content {
                Some(content) => content,
                None => read_input(file.as_deref())?,
            };
            let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
            print_json(&service.create_note(&title, &content)?)
        }
        NoteCommand::Get { id } => {
            let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
            print_json(&service.get_note(id)?)
        }
        NoteCommand::Search {
            q,
            page,
            page_size,
            sort,
        } => {
            let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
            print_json(&service.search_notes(&NoteSearchQuery {
                q,
                page,
                page_size,
                sort: NotesSort::parse(&sort),
            })?)
        }
        NoteCommand::Delete { id } => {
            let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
            service.delete_note(id)?;
            print_json(&json!({ "deleted": id }))
        }
        NoteCommand::Extract { id, apply, llm } => {
            let client;
            let mode = if llm {
                client = OllamaClient::from_config(&config.llm)?;
                ExtractionMode::Llm(&client)
            } else {
                ExtractionMode::Heuristic
            };
            let result = ExtractionService::new(&mut conn).extract_note(id, apply, mode)?;
            print_json(&result)
        }
    }
}

fn run_items(config: &AppConfig, command: ItemsCommand) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&config.db_path)?;
    let service = ActionItemService::new(SqliteActionItemRepository::try_new(&conn)?);

    match command {
        ItemsCommand::List {
            completed,
            note,
            skip,
            limit,
            sort,
        } => print_json(&service.list_action_items(&ActionItemListQuery {
            completed,
            note_id: note,
            skip,
            limit,
            sort: SortOrder::parse(&sort, ACTION_ITEM_SORT_FIELDS),
        })?),
        ItemsCommand::Add { description, note } => {
            print_json(&service.create_action_item(&description, note)?)
        }
        ItemsCommand::Complete { id } => print_json(&service.complete_action_item(id)?),
    }
}

/// Loads `env_file` (or `./.env` when present) into the process
/// environment, then reads [`AppConfig`] from it.
///
/// Variables already set in the environment take precedence.
fn load_config(env_file: Option<&Path>) -> Result<AppConfig, Box<dyn Error>> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(AppConfig::from_env()?)
}

/// Reads `path`, or all of stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<String, Box<dyn Error>> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_config, Cli};
    use clap::{CommandFactory, Parser};
    use std::path::Path;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rules_flag_conflicts_with_llm() {
        assert!(Cli::try_parse_from(["actionnote", "extract", "--rules"]).is_ok());
        assert!(Cli::try_parse_from(["actionnote", "extract", "--rules", "--llm"]).is_err());
    }

    #[test]
    fn env_file_values_reach_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actionnote.env");
        std::fs::write(
            &path,
            "ACTIONNOTE_LLM_MODEL=from-env-file\nACTIONNOTE_LLM_TIMEOUT_SECS=7\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "from-env-file");
        assert_eq!(config.llm.timeout_secs, 7);
    }

    #[test]
    fn missing_env_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/actionnote.env"))).is_err());
    }
}
