use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::rc::Rc;

use page_grep::dom::parser::parse_html;
use page_grep::net::fetch::fetch_url;
use page_grep::render::Viewport;
use page_grep::search::linearize::linearize;
use page_grep::search::matcher;
use page_grep::search::{MatchSpan, PageSearcher};

const USAGE: &str = "usage: page-grep <url-or-file> <pattern> [flags]\n\
       flags default to `gi` (global, case-insensitive)";

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (source, pattern) = match (args.first(), args.get(1)) {
        (Some(source), Some(pattern)) => (source.clone(), pattern.clone()),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };
    let flags = args.get(2).cloned().unwrap_or_else(|| "gi".to_string());

    let re = match matcher::compile(&pattern, &flags) {
        Ok(re) => re,
        Err(err) => {
            eprintln!("page-grep: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let (html, url) = match load(&source) {
        Ok(loaded) => loaded,
        Err(message) => {
            eprintln!("page-grep: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let tree = parse_html(&html, &url);
    if !tree.title.is_empty() {
        println!("{} — {}", url, tree.title);
    }

    // Context snippets come from the untouched tree; the searcher
    // rewrites matched nodes afterwards.
    let index = linearize(&tree.root);
    let spans = matcher::find_spans(&re, &index.text);
    for (i, span) in spans.iter().enumerate() {
        println!("{:>4}: {}", i, snippet(&index.text, span));
    }

    let mut searcher = PageSearcher::new(tree, Viewport::new(1280.0, 800.0));
    let total = Rc::new(RefCell::new(0usize));

    let total_in = total.clone();
    let _on_searched = searcher.on_searched(move |t| {
        *total_in.borrow_mut() = t;
        println!("{} match(es)", t);
    });
    let total_in = total.clone();
    let _on_changed = searcher.on_selection_changed(move |current| {
        println!("match {}/{}", current + 1, total_in.borrow());
    });

    searcher.search(&pattern, &flags);
    if searcher.match_count() == 0 {
        return ExitCode::SUCCESS;
    }

    println!("scrolled to y={}", searcher.viewport().scroll_y);
    println!("[n]ext, [p]revious, [q]uit");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "n" => searcher.next_result(),
            "p" => searcher.previous_result(),
            "q" => break,
            "" => continue,
            other => {
                println!("unknown command {:?}", other);
                continue;
            }
        }
        println!("scrolled to y={}", searcher.viewport().scroll_y);
        let _ = io::stdout().flush();
    }

    ExitCode::SUCCESS
}

/// Read a local file, or fetch over HTTP when the argument does not
/// name one.
fn load(source: &str) -> Result<(String, String), String> {
    let path = std::path::Path::new(source);
    if path.is_file() {
        let html = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        return Ok((html, format!("file://{}", path.display())));
    }
    let fetched = fetch_url(source).map_err(|e| e.to_string())?;
    Ok((fetched.html, fetched.url))
}

/// One-line context around a match, clipped to char boundaries.
fn snippet(text: &str, span: &MatchSpan) -> String {
    const CONTEXT: usize = 40;
    let start = floor_boundary(text, span.start.saturating_sub(CONTEXT));
    let end = ceil_boundary(text, (span.end + CONTEXT).min(text.len()));
    let mut out = String::new();
    if start > 0 {
        out.push('…');
    }
    out.push_str(&text[start..end].replace(['\n', '\t'], " "));
    if end < text.len() {
        out.push('…');
    }
    out
}

fn floor_boundary(text: &str, mut at: usize) -> usize {
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn ceil_boundary(text: &str, mut at: usize) -> usize {
    while at < text.len() && !text.is_char_boundary(at) {
        at += 1;
    }
    at
}
