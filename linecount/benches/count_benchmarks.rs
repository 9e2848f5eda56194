use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linecount::{count, CountConfig};
use std::{fs, fs::File, io::Write, num::NonZeroUsize};
use tempfile::tempdir;

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<()> {
    for i in 0..file_count {
        let ext = ["go", "html", "css", "js", "txt"][i % 5];
        let sub_dir = dir.path().join(format!("pkg_{}", i % 16));
        fs::create_dir_all(&sub_dir)?;
        let mut file = File::create(sub_dir.join(format!("file_{}.{}", i, ext)))?;
        for j in 0..lines_per_file {
            writeln!(file, "Line {} of file {}: some representative source text", j, i)?;
        }
    }
    Ok(())
}

fn create_config(dir: &tempfile::TempDir, max: usize) -> CountConfig {
    CountConfig {
        max_concurrency: NonZeroUsize::new(max).unwrap(),
        ..CountConfig::with_root(dir.path())
    }
}

fn bench_concurrency_scaling(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 500, 200).unwrap();

    let mut group = c.benchmark_group("Concurrency Scaling");
    for max in [1, 2, 4, 10, 32] {
        let config = create_config(&dir, max);
        group.bench_with_input(BenchmarkId::from_parameter(max), &config, |b, config| {
            b.iter(|| black_box(count(config).unwrap()));
        });
    }
    group.finish();
}

fn bench_file_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("File Scaling");
    for file_count in [10, 100, 1000] {
        let dir = tempdir().unwrap();
        create_test_files(&dir, file_count, 50).unwrap();
        let config = create_config(&dir, 10);

        group.bench_with_input(
            BenchmarkId::from_parameter(file_count),
            &config,
            |b, config| {
                b.iter(|| black_box(count(config).unwrap()));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_concurrency_scaling, bench_file_scaling);
criterion_main!(benches);
