use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());

    println!("Loading movie analytics tables from {}...\n", data_dir);

    let start = Instant::now();
    let index = DataIndex::load_from_dir(Path::new(&data_dir)).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (movies, year_stats, overall_stats) = index.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movie table: {}", index.movie_source().unwrap_or("-"));
    println!("Movies: {}", movies);
    println!("Genre-year rows: {}", year_stats);
    println!("Genre rows: {}", overall_stats);
    if let Some((min, max)) = index.year_range() {
        println!("Years: {}-{}", min, max);
    }
    println!(
        "\nPerformance: {:.0} movies/second",
        movies as f64 / elapsed.as_secs_f64()
    );
}
