use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::core::{MatchEngine, SearchRequest};
use crate::error::{MatchError, MatchResult};
use crate::excel::{ResultExporter, WorkbookReader};
use crate::report::{Outcome, SearchResponse, NO_MATCH_MESSAGE};
use crate::types::{ColumnLayout, Record, SearchMode, NOT_AVAILABLE};

/// Build an engine from an optional YAML config plus CLI overrides
pub fn load_engine(config: Option<&Path>, threshold: Option<u8>) -> MatchResult<MatchEngine> {
    let mut engine_config = match config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(threshold) = threshold {
        engine_config = engine_config.with_threshold(threshold)?;
    }
    MatchEngine::new(engine_config)
}

fn print_json(response: &SearchResponse) -> MatchResult<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| MatchError::Export(format!("Failed to serialize response: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn print_record(index: usize, record: &Record) {
    println!("   {}", format!("#{}", index + 1).bright_blue().bold());
    for (field, value) in record.fields() {
        let shown = if value.is_blank() {
            NOT_AVAILABLE.dimmed().to_string()
        } else {
            value.to_string()
        };
        println!("      {}: {}", field.cyan(), shown);
    }
}

fn print_outcome(outcome: &Outcome) {
    if outcome.is_empty() {
        println!("{}", format!("📭 {}", NO_MATCH_MESSAGE).yellow());
        return;
    }

    match outcome {
        Outcome::Projects(records) => {
            println!("{}", format!("✅ {} project(s):", records.len()).bold().green());
            for (idx, record) in records.iter().enumerate() {
                print_record(idx, record);
            }
        }
        Outcome::Items { items, layout } => {
            println!("{}", format!("✅ {} item(s):", items.len()).bold().green());
            if *layout == ColumnLayout::Positional {
                println!(
                    "{}",
                    "⚠️  No usable header row; columns were read by position".yellow()
                );
            }
            for (idx, record) in items.iter().enumerate() {
                print_record(idx, record);
            }
        }
        Outcome::Matches(matches) => {
            println!("{}", format!("✅ {} match(es):", matches.len()).bold().green());
            for hit in matches {
                println!(
                    "   {} row {} · {} = {} ({})",
                    hit.sheet.bright_blue().bold(),
                    hit.row_index,
                    hit.column.cyan(),
                    hit.value,
                    format!("score {}", hit.score).dimmed()
                );
            }
        }
    }
}

fn finish(
    result: MatchResult<Outcome>,
    json: bool,
    output: Option<PathBuf>,
) -> MatchResult<()> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            if json {
                print_json(&SearchResponse::error(e.to_string()))?;
            }
            return Err(e);
        }
    };

    if let Some(path) = output {
        ResultExporter::new(&outcome).export(&path)?;
        if !json {
            println!("{}", format!("💾 Results written to {}", path.display()).green());
        }
    }

    if json {
        print_json(&SearchResponse::from_outcome(outcome))
    } else {
        print_outcome(&outcome);
        Ok(())
    }
}

/// Execute the list command
pub fn list(file: PathBuf, config: Option<PathBuf>, json: bool) -> MatchResult<()> {
    let engine = load_engine(config.as_deref(), None)?;
    if !json {
        println!("{}", "🔎 Estimate Search - Listing projects".bold().green());
        println!("   File: {}\n", file.display());
    }

    let result = WorkbookReader::new(&file)
        .read()
        .and_then(|workbook| engine.run(&workbook, &SearchRequest::list()));
    finish(result, json, None)
}

/// Options for the search command
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub mode: SearchMode,
    pub config: Option<PathBuf>,
    pub threshold: Option<u8>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

/// Execute the search command
pub fn search(file: PathBuf, term: String, options: SearchOptions) -> MatchResult<()> {
    let engine = load_engine(options.config.as_deref(), options.threshold)?;
    let request = SearchRequest::new(Some(options.mode), Some(term))?;

    if !options.json {
        println!("{}", "🔎 Estimate Search - Searching".bold().green());
        println!("   File: {}", file.display());
        println!(
            "   Term: {}  Mode: {}  Threshold: {}\n",
            request.term.as_deref().unwrap_or_default().bright_yellow().bold(),
            request.mode,
            engine.config().threshold
        );
    }

    let result = WorkbookReader::new(&file)
        .read()
        .and_then(|workbook| engine.run(&workbook, &request));
    finish(result, options.json, options.output)
}

/// Execute the inspect command: show how the item sheet would be read
pub fn inspect(file: PathBuf, config: Option<PathBuf>) -> MatchResult<()> {
    let engine = load_engine(config.as_deref(), None)?;
    let workbook = WorkbookReader::new(&file).read()?;

    println!("{}", "🔍 Estimate Search - Inspecting workbook".bold().green());
    println!("   File: {}\n", file.display());

    println!("{}", "📄 Sheets:".bold());
    for raw in &workbook.sheets {
        println!(
            "   {} ({} rows, {} columns)",
            raw.name.bright_blue().bold(),
            raw.rows.len(),
            raw.width()
        );
    }
    println!();

    let resolved = engine.resolve_item_sheet(&workbook)?;
    println!(
        "{} {}",
        "🧭 Item sheet:".bold(),
        resolved.sheet.name.bright_blue().bold()
    );
    match resolved.sheet.header_offset {
        Some(offset) => println!("   Header row offset: {}", offset),
        None => println!(
            "   {}",
            "No usable header row; positional columns in use".yellow()
        ),
    }
    println!("   Data rows: {}", resolved.sheet.rows.len());
    println!("\n{}", "🗺️  Column mapping:".bold());
    for field in &engine.config().item_fields {
        match resolved.mapping.get(field) {
            Some(label) => println!("   {} → {}", field.cyan(), label),
            None => println!("   {} → {}", field.cyan(), "N/A".dimmed()),
        }
    }
    Ok(())
}
