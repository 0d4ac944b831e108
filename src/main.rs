//! End-to-end demo against a running vector-search service
//!
//! Walks one collection through its whole lifecycle: create (dropping any
//! leftover from a previous run), bulk-load films from CSV, flush and count,
//! build an IVF_FLAT index, dump stats, run a filtered top-K search, print
//! the hits correlated back to titles, then drop the index and collection.

use anyhow::Result;
use clap::Parser;
use filmvec::dataset::{format_embedding, load_films};
use filmvec::{
    Client, Collection, Expr, FilmSchema, IndexParams, IndexType, InsertBatch, MetricType,
    TitleCatalog, EMBEDDING_DIM,
};
use rand::Rng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filmvec")]
#[command(about = "Film similarity-search demo against a vector-search service", long_about = None)]
struct Cli {
    /// Base URL of the vector-search service
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Path to the films CSV file
    #[arg(long, default_value = "data/films.csv")]
    csv: PathBuf,

    /// Number of nearest neighbors to return
    #[arg(long, default_value_t = 3)]
    top_k: usize,
}

fn random_vector(dim: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen::<f32>()).collect()
}

async fn run_search(
    films: &Collection<'_>,
    schema: &FilmSchema,
    catalog: &TitleCatalog,
    top_k: usize,
) -> Result<()> {
    let query_vector = random_vector(EMBEDDING_DIM);
    println!("\nQuery embedding: {}", format_embedding(&query_vector));

    let query = Expr::must([
        schema.release_year.in_([1995, 2002]),
        schema
            .embedding
            .query(vec![query_vector])?
            .metric(MetricType::L2)
            .top_k(top_k)
            .param("nprobe", 8)
            .into(),
    ]);

    let response = films.search(&query, &["release_year", "embedding"]).await?;

    println!("\n--------Search Result--------");
    println!("- ids: {:?}", response.ids);
    println!("- distances: {:?}", response.distances);

    for hit in response.hits(0) {
        println!("==");
        match catalog.get(hit.id) {
            Some(title) => println!("- title: {}", title),
            None => println!("- title: <unknown id {}>", hit.id),
        }
        if let Some(fields) = hit.fields {
            if let Some(year) = fields.get("release_year") {
                println!("- release_year: {}", year);
            }
            if let Some(embedding) = fields.get("embedding") {
                println!("- embedding: {}", embedding);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let client = Client::with_base_url(&cli.url);
    let schema = FilmSchema::new();
    let films = Collection::new(&client, "demo_index", schema.schema());

    // Drops any same-named leftover, so reruns need no manual cleanup.
    films.create().await?;

    let columns = load_films(&cli.csv)?;
    let catalog = columns.title_catalog();

    let batch = InsertBatch::new(columns.ids.clone())
        .int32_column(&schema.release_year, columns.years.clone())?
        .vector_column(&schema.embedding, columns.embeddings.clone())?;
    films.insert(&batch).await?;
    films.flush().await?;
    println!("There are {} films in the collection.", films.count().await?);

    films
        .create_index(
            &schema.embedding,
            &IndexParams::new(IndexType::IvfFlat, MetricType::L2).param("nlist", 100),
        )
        .await?;

    println!("\n--------Collection Stats--------");
    println!("{}", serde_json::to_string_pretty(&films.stats().await?)?);

    // Tear down even when the search step fails.
    let outcome = run_search(&films, &schema, &catalog, cli.top_k).await;

    films.drop_index(&schema.embedding).await?;
    films.drop().await?;

    outcome
}
