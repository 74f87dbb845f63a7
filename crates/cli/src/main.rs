use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use catalog::{CatalogMovie, MovieCatalog, MovieId};
use interactions::{
    append_to_journal, load_journal, InMemoryInteractionStore, InteractionKind, InteractionSeeder,
    DUMMY_MOVIE_NAMES, DUMMY_USER_ID,
};
use serde::Serialize;
use server::{
    CancellationToken, EngineConfig, LogRequest, MovieOrchestrator, SearchOutcome, SearchRequest,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// ReelSearch - Movie search and recommendations from user interactions
#[derive(Parser)]
#[command(name = "reel-search")]
#[command(about = "Rank movies by views and clicks, and search them by keyword", long_about = None)]
struct Cli {
    /// Path to a MovieLens movies.dat file (overrides REEL_MOVIES_FILE)
    #[arg(short, long)]
    movies_file: Option<PathBuf>,

    /// JSON-lines interaction journal to load and append to
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Do not add dummy interactions for kinds with no events
    #[arg(long)]
    no_seed: bool,

    /// Print results as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Home-page recommendations for a user
    Recommend {
        /// User to recommend movies for
        #[arg(long, default_value = DUMMY_USER_ID)]
        user_id: String,
    },

    /// Search movies by keyword, or get keyword suggestions with no query
    Search {
        #[arg(long, default_value = DUMMY_USER_ID)]
        user_id: String,

        /// Search keyword (leave empty for suggestions)
        #[arg(long, default_value = "")]
        query: String,

        /// How many of the user's recent searches to show
        #[arg(long, default_value = "5", allow_negative_numbers = true)]
        max_old: i32,

        /// Total suggestions to return, recent searches included
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        max_suggested: i32,
    },

    /// Record a view, click or search
    Log {
        #[arg(long, default_value = DUMMY_USER_ID)]
        user_id: String,

        /// view, click or search
        #[arg(long)]
        kind: InteractionKind,

        #[arg(long)]
        movie_id: Option<MovieId>,

        #[arg(long)]
        movie_name: Option<String>,

        #[arg(long)]
        keyword: Option<String>,
    },

    /// Show one movie by id
    Movie {
        #[arg(long)]
        id: MovieId,
    },

    /// Plain keyword search over the catalog, ignoring interactions
    Find {
        #[arg(long)]
        query: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(path) = &cli.movies_file {
        config.movies_file = path.clone();
    }

    // Load the catalog (this may take a moment)
    let start = Instant::now();
    let catalog = MovieCatalog::load_from_file(&config.movies_file)
        .with_context(|| format!("Failed to load catalog from {}", config.movies_file.display()))?
        .with_max_records(config.index_max_records);
    if !cli.json {
        println!(
            "{} Loaded {} movies in {:?}",
            "✓".green(),
            catalog.len(),
            start.elapsed()
        );
    }

    let events = match &cli.events {
        Some(path) => {
            let events = load_journal(path).context("Failed to load interaction journal")?;
            tracing::debug!("Loaded {} events from {}", events.len(), path.display());
            events
        }
        None => Vec::new(),
    };
    let store = Arc::new(InMemoryInteractionStore::from_events(events));
    if !cli.no_seed {
        InteractionSeeder::new(store.clone())
            .seed()
            .await
            .context("Failed to seed interactions")?;
    }

    let orchestrator = MovieOrchestrator::new(store, Arc::new(catalog), &config);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { ref user_id } => handle_recommend(&orchestrator, user_id, cli.json).await?,
        Commands::Search {
            ref user_id,
            ref query,
            max_old,
            max_suggested,
        } => {
            let request = SearchRequest::new(query.clone(), max_old, max_suggested);
            handle_search(&orchestrator, user_id, request, cli.json).await?
        }
        Commands::Log {
            ref user_id,
            kind,
            movie_id,
            ref movie_name,
            ref keyword,
        } => {
            let request = LogRequest {
                kind,
                movie_id,
                movie_name: movie_name.clone(),
                keyword: keyword.clone(),
            };
            handle_log(&orchestrator, user_id, request, cli.events.as_ref(), cli.json).await?
        }
        Commands::Movie { id } => handle_movie(&orchestrator, id, cli.json).await?,
        Commands::Find { ref query } => handle_find(&orchestrator, query, cli.json).await?,
        Commands::Benchmark { requests } => handle_benchmark(&orchestrator, requests).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(orchestrator: &MovieOrchestrator, user_id: &str, json: bool) -> Result<()> {
    let movies = orchestrator
        .get_recommendations(user_id, &CancellationToken::new())
        .await
        .with_context(|| format!("Failed to get recommendations for {}", user_id))?;

    if json {
        return print_json(&movies);
    }
    print_movies(&format!("Recommendations for {}:", user_id), &movies);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    orchestrator: &MovieOrchestrator,
    user_id: &str,
    request: SearchRequest,
    json: bool,
) -> Result<()> {
    let query = request.query.clone();
    let outcome = orchestrator
        .search(user_id, request, &CancellationToken::new())
        .await
        .context("Search failed")?;

    if json {
        return print_json(&outcome);
    }
    print_search_outcome(&query, &outcome);
    Ok(())
}

/// Handle the 'log' command
async fn handle_log(
    orchestrator: &MovieOrchestrator,
    user_id: &str,
    request: LogRequest,
    journal: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let event = orchestrator
        .log_action(request, user_id, &CancellationToken::new())
        .await
        .context("Failed to log interaction")?;

    if let Some(path) = journal {
        append_to_journal(path, &event)
            .with_context(|| format!("Failed to append to {}", path.display()))?;
        tracing::debug!("Appended {} event to {}", event.kind, path.display());
    }

    if json {
        return print_json(&event);
    }
    println!("{} Logged {} for {}", "✓".green(), event.kind, event.user_id);
    if journal.is_none() {
        println!("{}", "  (no --events journal given, the event is not persisted)".dimmed());
    }
    Ok(())
}

/// Handle the 'movie' command
async fn handle_movie(orchestrator: &MovieOrchestrator, id: MovieId, json: bool) -> Result<()> {
    let movie = orchestrator
        .movie_by_id(id, &CancellationToken::new())
        .await?
        .ok_or_else(|| anyhow!("Movie {} not found", id))?;

    if json {
        return print_json(&movie);
    }
    println!("{}", format!("{} ({})", movie.title, movie.year).bold().blue());
    println!("{}Id: {}", "• ".green(), movie.id);
    println!("{}Genres: {}", "• ".green(), movie.genres.join(", "));
    Ok(())
}

/// Handle the 'find' command
async fn handle_find(orchestrator: &MovieOrchestrator, query: &str, json: bool) -> Result<()> {
    let movies = orchestrator
        .find_movies(query, &CancellationToken::new())
        .await?;

    if json {
        return print_json(&movies);
    }
    print_movies(&format!("Search results for '{}':", query), &movies);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(orchestrator: &MovieOrchestrator, requests: usize) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    // Alternate home and search requests, searching for random dummy titles
    let mut handles = vec![];
    let wall_clock = Instant::now();
    for i in 0..requests {
        let orchestrator = orchestrator.clone();
        let keyword_index = rand::random::<u32>() as usize % DUMMY_MOVIE_NAMES.len();
        let handle = tokio::spawn(async move {
            let cancel = CancellationToken::new();
            let start = Instant::now();
            if i % 2 == 0 {
                orchestrator.get_recommendations(DUMMY_USER_ID, &cancel).await?;
            } else {
                let request = SearchRequest::new(DUMMY_MOVIE_NAMES[keyword_index], 5, 10);
                orchestrator.search(DUMMY_USER_ID, request, &cancel).await?;
            }
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let summed: Duration = timings.iter().sum();
    let avg_latency = summed / (timings.len() as u32);
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_movies(header: &str, movies: &[CatalogMovie]) {
    println!("{}", header.bold().blue());
    if movies.is_empty() {
        println!("  {}", "nothing to show".dimmed());
    }
    for (i, movie) in movies.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] #{}",
            (i + 1).to_string().green(),
            movie.title,
            movie.year,
            movie.genres.join(", "),
            movie.id
        );
    }
}

fn print_search_outcome(query: &str, outcome: &SearchOutcome) {
    println!("{}", "Recent searches:".bold().blue());
    for keyword in &outcome.last_searched_keywords {
        println!("  {} {}", "↺".cyan(), keyword);
    }

    if query.trim().is_empty() {
        println!("{}", "Suggested keywords:".bold().blue());
        for keyword in &outcome.recommended_keywords {
            println!("  {} {}", "•".green(), keyword);
        }
    } else {
        print_movies(&format!("Movies for '{}':", query.trim()), &outcome.searched_movies);
    }
}
