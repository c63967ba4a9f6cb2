use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::backend::{
    DirectoryBackend, SessionBackend, SessionSummary, SessionViewer, derive_session_info,
    discover_sessions, summarize_sessions,
};
use crate::changes::calculate_change_statistics;
use crate::clipboard::copy_document;
use crate::config::ViewerConfig;
use crate::content::{preview, render_raw};
use crate::export::{ExportFormat, code_blocks_for};
use crate::models::{SortOrder, ViewLevel};
use crate::preference_storage::FilePreferences;
use crate::tree::ConversationTree;
use crate::utils::{format_path_with_tilde, single_line, strip_ansi_codes};
use crate::view::{FilteredView, ThinkingClass, classify_thinking};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "ai-session-viewer")]
#[command(version)]
#[command(about = "Browse, filter and export AI conversation sessions", long_about = None)]
pub struct Cli {
    /// Directory holding `<session>.jsonl` files
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// View-level preferences file
    #[arg(long, global = true, value_name = "FILE")]
    pub prefs_file: Option<PathBuf>,

    /// Diff sides longer than this are truncated
    #[arg(long, global = true, value_name = "N")]
    pub max_lines: Option<usize>,

    /// Lines kept at each end of a truncated diff side
    #[arg(long, global = true, value_name = "N")]
    pub keep_lines: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the conversation tree with message previews
    Tree {
        /// Session id or path to a session file
        session: String,
    },
    /// Print the messages visible at a view level
    View {
        session: String,

        /// full, clean_flow or qa_pairs (defaults to the saved preference)
        #[arg(short, long)]
        level: Option<ViewLevel>,

        /// asc or desc, by timestamp (tree order when omitted)
        #[arg(short, long)]
        sort: Option<SortOrder>,

        /// Show complete messages instead of previews
        #[arg(long)]
        full: bool,

        /// Show the raw content as received
        #[arg(long)]
        raw: bool,
    },
    /// List code changes found in tool invocations
    Changes {
        session: String,

        /// Print each change's diff block
        #[arg(long)]
        diff: bool,
    },
    /// Export a view as JSON, CSV or Markdown
    Export {
        session: String,

        #[arg(short, long)]
        level: Option<ViewLevel>,

        /// json, csv or markdown
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        #[arg(long)]
        no_timestamps: bool,

        #[arg(long)]
        code_blocks: bool,

        #[arg(long)]
        metadata: bool,

        #[arg(long)]
        stats: bool,

        /// File or directory to write to (prints to stdout otherwise)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Copy the document to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Show statistics for one session, or for every session in the directory
    Stats {
        session: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read or save the preferred view level of a session
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
pub enum PrefsAction {
    Get { session: String },
    Set { session: String, level: ViewLevel },
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = ViewerConfig::load()?;
    if let Some(dir) = &cli.dir {
        config.sessions_dir = dir.clone();
    }
    if let Some(path) = &cli.prefs_file {
        config.preferences_path = path.clone();
    }
    if cli.max_lines.is_some() || cli.keep_lines.is_some() {
        config.set_truncation(cli.max_lines, cli.keep_lines);
    }

    match cli.command {
        Some(Commands::Tree { session }) => show_tree(&config, &session),
        Some(Commands::View { session, level, sort, full, raw }) => {
            show_view(&config, &session, level, sort, full, raw)
        }
        Some(Commands::Changes { session, diff }) => show_changes(&config, &session, diff),
        Some(Commands::Export {
            session,
            level,
            format,
            no_timestamps,
            code_blocks,
            metadata,
            stats,
            output,
            copy,
        }) => {
            let (viewer, id) = open_session(&config, &session)?;
            let backend = viewer.backend();
            let level = match level {
                Some(level) => level,
                None => backend.get_view_level_preference(&id)?,
            };

            let mut options = backend.export_options(format);
            options.include_timestamps = !no_timestamps;
            options.include_code_blocks = code_blocks;
            options.include_metadata = metadata;
            options.include_stats = stats;

            let document = backend.export_session_at(&id, level, &options, Utc::now())?;

            if let Some(output) = output {
                let target = if output.is_dir() { output.join(&document.filename) } else { output };
                fs::write(&target, &document.content)
                    .with_context(|| format!("Failed to write export: {}", target.display()))?;
                eprintln!("Wrote {}", format_path_with_tilde(&target));
            } else if !copy {
                print!("{}", document.content);
            }

            if copy {
                copy_document(&document)?;
                eprintln!("Copied {} to clipboard", document.filename);
            }
            Ok(())
        }
        Some(Commands::Stats { session: Some(session), json }) => {
            let (mut viewer, id) = open_session(&config, &session)?;
            let path = viewer.backend().session_path(&id)?;
            let tree = viewer.tree(&id)?;
            let summary = SessionSummary::from_tree(derive_session_info(&id, Some(&path), tree), tree);
            print_summaries(&[summary], json)
        }
        Some(Commands::Stats { session: None, json }) => {
            let paths = discover_sessions(&config.sessions_dir)?;
            if paths.is_empty() && !json {
                println!("No sessions found in {}", format_path_with_tilde(&config.sessions_dir));
                return Ok(());
            }
            print_summaries(&summarize_sessions(&paths), json)
        }
        Some(Commands::Prefs { action: PrefsAction::Get { session } }) => {
            let (viewer, id) = open_session(&config, &session)?;
            println!("{}", viewer.view_level(&id)?);
            Ok(())
        }
        Some(Commands::Prefs { action: PrefsAction::Set { session, level } }) => {
            let (mut viewer, id) = open_session(&config, &session)?;
            viewer.set_view_level(&id, level)?;
            println!("{}: {}", id, level);
            Ok(())
        }
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

/// Accept either a path to a `.jsonl` file or a session id inside the sessions directory
fn resolve_session(config: &ViewerConfig, arg: &str) -> Result<(PathBuf, String)> {
    let path = Path::new(arg);
    if path.is_file() {
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            bail!("Session files must have a .jsonl extension: {}", path.display());
        }
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .with_context(|| format!("Invalid session file name: {}", path.display()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        return Ok((dir, id));
    }

    Ok((config.sessions_dir.clone(), arg.to_string()))
}

fn open_session(config: &ViewerConfig, arg: &str) -> Result<(SessionViewer<DirectoryBackend>, String)> {
    let (dir, id) = resolve_session(config, arg)?;
    let preferences = FilePreferences::open(&config.preferences_path)?;
    let backend = DirectoryBackend::new(dir, preferences)
        .with_truncation(config.truncation)
        .with_csv_cell_limit(config.csv_cell_limit);
    Ok((SessionViewer::new(backend), id))
}

fn show_tree(config: &ViewerConfig, session: &str) -> Result<()> {
    let (mut viewer, id) = open_session(config, session)?;
    let tree = viewer.tree(&id)?;

    println!(
        "{}: {} messages, {} roots, max depth {}, {} threads",
        id,
        tree.total_count(),
        tree.root_ids().len(),
        tree.max_depth(),
        tree.thread_count()
    );

    for node_id in tree.depth_first() {
        let node = tree.node(node_id);
        let text = preview(node.extracted_full_text(), 1, config.preview_chars.min(120));
        println!("{}{}: {}", "  ".repeat(node.depth()), node.role(), single_line(&text));
    }
    Ok(())
}

fn show_view(
    config: &ViewerConfig,
    session: &str,
    level: Option<ViewLevel>,
    order: Option<SortOrder>,
    full: bool,
    raw: bool,
) -> Result<()> {
    let (mut viewer, id) = open_session(config, session)?;
    let view = viewer.view(&id, level, order)?;
    print_view(&view, config, full, raw);
    Ok(())
}

fn print_view(view: &FilteredView<'_>, config: &ViewerConfig, full: bool, raw: bool) {
    println!("{} view, {} entries", view.level().label(), view.len());

    for (node, qa_index) in view.indexed_messages() {
        let mut header = format!(
            "[{}] {}",
            node.record().timestamp.format(TIMESTAMP_FORMAT),
            node.role().label()
        );
        if let Some(index) = qa_index {
            header.push_str(&format!(" (Q&A {})", index + 1));
        }
        match classify_thinking(node) {
            Some(ThinkingClass::Marked(true)) => header.push_str(" (thinking)"),
            Some(ThinkingClass::Heuristic(true)) => header.push_str(" (thinking, unmarked)"),
            _ => {}
        }
        println!();
        println!("{}", header);

        let body = if raw {
            render_raw(node.raw_content())
        } else if full {
            node.extracted_full_text().to_string()
        } else {
            preview(node.extracted_full_text(), config.preview_lines, config.preview_chars)
        };
        println!("{}", strip_ansi_codes(&body));
    }
}

fn show_changes(config: &ViewerConfig, session: &str, diff: bool) -> Result<()> {
    let (mut viewer, id) = open_session(config, session)?;
    let tree = viewer.tree(&id)?;

    for node_id in tree.depth_first() {
        let node = tree.node(node_id);
        for block in code_blocks_for(node, &config.truncation) {
            println!("{} {}", node.record().timestamp.format(TIMESTAMP_FORMAT), block.summary());
            if diff {
                println!("{}", strip_ansi_codes(&block.content));
                if block.truncated {
                    println!("(truncated)");
                }
                println!();
            }
        }
    }

    print_change_totals(tree);
    Ok(())
}

fn print_change_totals(tree: &ConversationTree) {
    let stats = calculate_change_statistics(tree);
    println!(
        "{} changes across {} files ({} created, {} updated, {} deleted), +{} -{}",
        stats.total_changes(),
        stats.files_changed,
        stats.creates,
        stats.updates,
        stats.deletes,
        stats.lines_added,
        stats.lines_removed
    );
}

fn print_summaries(summaries: &[SessionSummary], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summaries).context("Failed to serialize stats")?);
        return Ok(());
    }

    for summary in summaries {
        let info = &summary.info;
        println!("{}", single_line(info.display_title()));
        println!("  Session: {}", info.id);
        if let Some(path) = &info.path {
            println!("  File: {}", format_path_with_tilde(path));
        }
        if let (Some(first), Some(last)) = (info.created_at, info.updated_at) {
            println!("  Span: {} .. {}", first.format(TIMESTAMP_FORMAT), last.format(TIMESTAMP_FORMAT));
        }
        println!(
            "  Messages: {} ({} in clean flow), roots: {}, max depth: {}, threads: {}",
            summary.messages,
            summary.clean_flow_messages,
            summary.roots,
            summary.max_depth,
            summary.threads
        );
        println!("  Q&A pairs: {} ({} answered)", summary.qa_pairs, summary.answered_pairs);
        let changes = &summary.code_changes;
        println!(
            "  Code changes: {} across {} files, +{} -{}",
            changes.total_changes(),
            changes.files_changed,
            changes.lines_added,
            changes.lines_removed
        );
    }
    Ok(())
}
