use chapter_lookup::chapters::markup::{parse_chapter_rows, parse_search_results};
use chapter_lookup::MovieResult;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SEARCH_PAGE: &str = include_str!("../tests/fixtures/search_two_results.html");
const BROWSE_PAGE: &str = include_str!("../tests/fixtures/browse_2002.html");

/// Benchmark parsing of the search result grid
fn bench_search_grid(c: &mut Criterion) {
    c.bench_function("parse_search_results", |b| {
        b.iter(|| parse_search_results(black_box(SEARCH_PAGE)))
    });
}

/// Benchmark parsing of a chapter table
fn bench_chapter_table(c: &mut Criterion) {
    c.bench_function("parse_chapter_rows", |b| {
        b.iter(|| parse_chapter_rows(black_box(BROWSE_PAGE)))
    });
}

/// Benchmark chapter file generation for a large chapter list
fn bench_chapter_file(c: &mut Criterion) {
    let mut movie = MovieResult::new();
    for i in 0..200 {
        movie.add_chapter(format!("Chapter {}", i + 1), format!("00:{:02}:{:02}.5", i / 60, i % 60), None);
    }

    c.bench_function("chapter_file_contents", |b| {
        b.iter(|| black_box(movie.clone()).chapter_file_contents())
    });
}

criterion_group!(benches, bench_search_grid, bench_chapter_table, bench_chapter_file);
criterion_main!(benches);
