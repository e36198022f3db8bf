use std::{env, fs, path::Path, process, time::{Instant, SystemTime}};

use tf_idf_recommender::{
    Corpus, Item, MemoryItemRepository, MemoryLedger, Page, Recommender, RecommenderConfig,
    WhitespaceTokenizer,
};
use tracing::{error, info};

fn usage() -> ! {
    eprintln!("usage: tf-idf-recommender <dir> <item-file-stem> [max]");
    process::exit(2);
}

// ディレクトリ内の .txt をアイテムとして読み込む (stem = name, 本文 = description)
fn load_items(dir: &Path) -> std::io::Result<MemoryItemRepository<String>> {
    let mut repo = MemoryItemRepository::new();
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "txt"))
        .collect();
    // 読み込み順を安定させる
    paths.sort();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(&path)?;
        repo.upsert(Item::new(stem.to_string(), stem, text));
    }
    Ok(repo)
}

fn run(dir: &str, stem: &str, max: usize) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let items = load_items(Path::new(dir))?;
    info!(items = items.len(), elapsed = ?start.elapsed(), "items loaded");

    let mut recommender = Recommender::new(
        items,
        MemoryLedger::<String>::new(),
        Corpus::<String>::new(),
        WhitespaceTokenizer,
        RecommenderConfig::default(),
    )?;

    let start = Instant::now();
    recommender.force_recalculate()?;
    info!(elapsed = ?start.elapsed(), "corpus ready");

    let start = Instant::now();
    let hits = recommender.recommend_similar(&stem.to_string(), Page::first(max), SystemTime::now())?;
    info!(elapsed = ?start.elapsed(), total = hits.total, "ranking done");

    println!("{:#?}", hits);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt().init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
    }
    let max = match args.get(3) {
        Some(raw) => raw.parse().unwrap_or_else(|_| usage()),
        None => 10,
    };

    if let Err(e) = run(&args[1], &args[2], max) {
        error!("{e}");
        process::exit(1);
    }
}
