use std::io::{self, BufRead, Write};

use serde::Serialize;

use sugg_core::{MatchType, SuggestionDetail, SuggestionEngine};

use crate::input::{build_engine, EngineOptions};

#[derive(Serialize)]
struct QueryOutput<'a> {
    input: &'a str,
    match_type: MatchType,
    suggestions: &'a [String],
}

pub fn format_suggestions(suggestions: &[String]) -> String {
    let mut out = String::new();
    for (i, s) in suggestions.iter().enumerate() {
        out.push_str(&format!("#{:>2}: {}\n", i + 1, s));
    }
    out
}

pub fn format_details(details: &[SuggestionDetail]) -> String {
    let mut out = String::new();
    for (i, d) in details.iter().enumerate() {
        out.push_str(&format!(
            "#{:>2}: {:<24} confidence={:.3} distance={} match={}\n",
            i + 1,
            d.suggestion,
            d.confidence,
            d.edit_distance,
            d.match_type
        ));
    }
    out
}

pub fn query_cmd(
    opts: &EngineOptions<'_>,
    input: &str,
    match_type: MatchType,
    details: bool,
    json: bool,
) {
    let engine = die!(build_engine(opts), "Error: {}");

    if details {
        let details = die!(engine.suggestion_details(input, match_type), "Error: {}");
        if json {
            let text = die!(serde_json::to_string_pretty(&details), "Error: {}");
            println!("{text}");
        } else if details.is_empty() {
            println!("(no suggestions)");
        } else {
            print!("{}", format_details(&details));
        }
        return;
    }

    let suggestions = die!(engine.suggest(input, match_type), "Error: {}");
    if json {
        let output = QueryOutput {
            input,
            match_type,
            suggestions: &suggestions,
        };
        let text = die!(serde_json::to_string_pretty(&output), "Error: {}");
        println!("{text}");
    } else if suggestions.is_empty() {
        println!("(no suggestions)");
    } else {
        print!("{}", format_suggestions(&suggestions));
    }
}

/// Answer queries read line by line.
///
/// Lines starting with `:` are commands: `:prefix`, `:substring`, `:fuzzy`,
/// `:regex` switch the match type, `:stats` prints statistics, `:clear`
/// drops the cache. Statistics are printed once more at end of input.
pub fn run_interactive<R: BufRead, W: Write>(
    engine: &SuggestionEngine,
    reader: R,
    mut out: W,
    mut match_type: MatchType,
) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let query = line.trim_end_matches(['\r', '\n']);
        if query.trim().is_empty() {
            continue;
        }
        if let Some(command) = query.strip_prefix(':') {
            match command.trim() {
                "stats" => write!(out, "{}", engine.statistics_text())?,
                "clear" => {
                    engine.clear_cache();
                    writeln!(out, "cache cleared")?;
                }
                other => match other.parse::<MatchType>() {
                    Ok(mt) => {
                        match_type = mt;
                        writeln!(out, "match type: {mt}")?;
                    }
                    Err(e) => writeln!(out, "{e}")?,
                },
            }
            continue;
        }
        match engine.suggest(query, match_type) {
            Ok(suggestions) if suggestions.is_empty() => writeln!(out, "(no suggestions)")?,
            Ok(suggestions) => writeln!(out, "{}", suggestions.join("  "))?,
            Err(e) => writeln!(out, "{e}")?,
        }
    }
    write!(out, "{}", engine.statistics_text())?;
    Ok(())
}

pub fn interactive_cmd(opts: &EngineOptions<'_>, match_type: MatchType) {
    let engine = die!(build_engine(opts), "Error: {}");
    let stdin = io::stdin();
    let stdout = io::stdout();
    die!(
        run_interactive(&engine, stdin.lock(), stdout.lock(), match_type),
        "Error: {}"
    );
}
