use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Instant;

use tfidf_library::config::{Config, Mode};
use tfidf_library::{DocumentCollection, SearchSession, TermNormalizer, WhitespaceNormalizer};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };
    if config.mode == Mode::Help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let mut session = SearchSession::new(WhitespaceNormalizer);
    let setup_start = Instant::now();
    if config.rebuild || !session.load_library(&config.snapshot_path) {
        log::info!("building library from {}", config.processed_dir.display());
        if let Err(e) = session.rebuild_library(&config.processed_dir) {
            log::error!("failed to build library: {}", e);
            return ExitCode::FAILURE;
        }
        if let Err(e) = session.save_library(&config.snapshot_path) {
            log::warn!("failed to save snapshot: {}", e);
        }
    }
    let Some(library) = session.library() else {
        log::error!("no library available");
        return ExitCode::FAILURE;
    };
    log::info!(
        "library ready: {} documents, {} unique words ({:.2}ms)",
        library.len(),
        library.vocabulary().len(),
        setup_start.elapsed().as_secs_f64() * 1000.0
    );

    match &config.mode {
        Mode::Query(text) => run_single_query(&session, text, config.top),
        Mode::Similar(name) => print_similar(library, name),
        Mode::Cloud(name) => print_cloud(library, name),
        Mode::Interactive => run_interactive(&session, config.top),
        Mode::Help => ExitCode::SUCCESS,
    }
}

fn print_usage() {
    eprintln!("Usage: tfidf-library [--processed DIR] [--snapshot PATH] [--rebuild] [--top N]");
    eprintln!("                     [--query \"TEXT\" | --similar NAME | --cloud NAME]");
    eprintln!("Without a query an interactive prompt is started.");
    eprintln!("Environment: TFIDF_LIBRARY_PROCESSED, TFIDF_LIBRARY_SNAPSHOT, RUST_LOG");
}

fn run_single_query<T: TermNormalizer>(session: &SearchSession<T>, text: &str, top: usize) -> ExitCode {
    let text = text.trim();
    if text.is_empty() {
        log::error!("empty query");
        return ExitCode::FAILURE;
    }
    print_matches(session, text, top);
    ExitCode::SUCCESS
}

fn run_interactive<T: TermNormalizer>(session: &SearchSession<T>, top: usize) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("Query> ");
        let _ = stdout.flush();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("read error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        print_matches(session, trimmed, top);
    }
    log::info!("bye");
    ExitCode::SUCCESS
}

fn print_matches<T: TermNormalizer>(session: &SearchSession<T>, text: &str, top: usize) {
    let start = Instant::now();
    let matches = session.lookup(text, top);
    log::debug!("search took {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);
    if matches.is_empty() {
        println!("Search words not found - try a different search");
        return;
    }
    for m in matches {
        println!(
            "{} - {}%\tPage {}",
            m.name,
            (m.relative * 100.0).round() as u32,
            m.best_page + 1
        );
    }
}

fn print_similar(library: &DocumentCollection, name: &str) -> ExitCode {
    let Some(id) = library.find_by_name(name) else {
        log::error!("no document named {:?}", name);
        return ExitCode::FAILURE;
    };
    match library.similar_documents(id) {
        Ok(hits) => {
            for (other, score) in hits.list {
                println!("{:.4}\t{}", score, library.documents()[other].name());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_cloud(library: &DocumentCollection, name: &str) -> ExitCode {
    match library.find_by_name(name).and_then(|id| library.document(id)) {
        Some(doc) => {
            println!("{}", doc.term_frequency_string());
            ExitCode::SUCCESS
        }
        None => {
            log::error!("no document named {:?}", name);
            ExitCode::FAILURE
        }
    }
}
