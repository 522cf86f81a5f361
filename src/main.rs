//! QueryForge demo binary.
//!
//! Two subcommands, no CLI framework — argument parsing is simple enough
//! that pulling in a parser crate would be pure overhead:
//!
//!   queryforge correct <query>       run the composite corrector over one query
//!   queryforge mine <corpus.json>    mine synonym candidates from a JSON corpus
//!
//! Both commands load `queryforge.toml` from the current directory if present.

use std::path::Path;
use std::sync::Arc;

use queryforge::config::CoreConfig;
use queryforge::mining;
use queryforge::spelling::{
    CancelToken, CompositeCorrector, Corrector, EditDistanceCorrector, KeyboardLayoutCorrector,
    PhoneticCorrector,
};
use queryforge::synonyms::SynonymProvider;

fn usage() -> ! {
    eprintln!("usage:");
    eprintln!("  queryforge correct <query>");
    eprintln!("  queryforge mine <corpus.json> [output.json]");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let command = match args.next() {
        Some(c) => c,
        None => usage(),
    };

    let config = CoreConfig::load(Path::new("queryforge.toml")).unwrap_or_else(|e| {
        log::warn!("failed to load queryforge.toml: {e}, using defaults");
        CoreConfig::default()
    });

    match command.as_str() {
        "correct" => {
            let query: Vec<String> = args.collect();
            if query.is_empty() {
                usage();
            }
            run_correct(&config, &query.join(" ")).await;
        }
        "mine" => {
            let corpus_path = match args.next() {
                Some(p) => p,
                None => usage(),
            };
            let output_path = args.next();
            run_mine(&config, Path::new(&corpus_path), output_path.as_deref());
        }
        _ => usage(),
    }
}

/// Builds a composite corrector with every rule-based stage wired in. A real
/// deployment would seed the edit-distance/phonetic vocabularies from the
/// index's own term dictionary; this demo seeds them empty, so only the
/// stages that need no vocabulary (keyboard layout) will ever fire.
async fn run_correct(config: &CoreConfig, query: &str) {
    let corrector_stages: Vec<Arc<dyn Corrector>> = vec![
        Arc::new(EditDistanceCorrector::new(Default::default(), Default::default())),
        Arc::new(KeyboardLayoutCorrector::new(Default::default())),
        Arc::new(PhoneticCorrector::new(Default::default())),
    ];
    let composite = CompositeCorrector::with_config(
        corrector_stages,
        config.composite.max_cache_size,
        config.composite.cache_ttl(),
    );

    let synonyms = SynonymProvider::new();
    if let Err(e) = synonyms.load(&config.dictionary_path()) {
        log::warn!("failed to load synonym dictionary: {e}");
    }
    synonyms.set_min_confidence(config.synonyms.min_confidence);

    let cancel = CancelToken::new();
    let result = composite.try_correct(query, &cancel).await;

    let expanded = synonyms.expand_query(&result.corrected, None);

    println!("original:  {}", result.original);
    println!("corrected: {}", result.corrected);
    println!("expanded:  {expanded}");
    println!("confidence: {:.3}", result.confidence);
    for step in &result.steps {
        println!("  [{}] {} -> {} ({})", step.method, step.before, step.after, step.reason);
    }
}

fn run_mine(config: &CoreConfig, corpus_path: &Path, output_path: Option<&str>) {
    let articles = match mining::load_corpus(corpus_path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("failed to load corpus: {e}");
            std::process::exit(1);
        }
    };

    log::info!("mining {} articles", articles.len());
    let result = mining::mine(&articles, &config.mining);
    log::info!(
        "found {} synonym groups covering {} words",
        result.statistics.total_pairs,
        result.statistics.total_words
    );

    let destination = output_path
        .map(Path::new)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.dictionary_path());

    let synonyms = SynonymProvider::new();
    synonyms.load_from_data(result.into_synonym_file());
    if let Err(e) = synonyms.save(&destination) {
        eprintln!("failed to save synonym dictionary: {e}");
        std::process::exit(1);
    }
    println!("wrote {}", destination.display());
}
