use std::{fs, path::PathBuf};

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sweep_convert::{HapmapConfig, XpclrConfig, convert_hapmap, convert_xpclr};
use tempfile::tempdir;

const CALLS: [&str; 4] = ["0/0", "0/1", "1/1", "./."];

fn create_vcf(dir: &tempfile::TempDir, sites: usize, samples: usize) -> PathBuf {
    let path = dir.path().join("input.vcf");
    let mut content = String::from("##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT");
    for s in 0..samples {
        content.push_str(&format!("\ts{s}"));
    }
    content.push('\n');
    for i in 1..=sites {
        let alt = if i % 50 == 0 { "C,G" } else { "C" };
        content.push_str(&format!("chr1\t{i}\t.\tA\t{alt}\t.\tPASS\t.\tGT:DP"));
        for s in 0..samples {
            content.push_str(&format!("\t{}:10", CALLS[(i + s) % CALLS.len()]));
        }
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

fn bench_hapmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("hapmap");
    for &sites in &[1_000usize, 10_000] {
        let dir = tempdir().unwrap();
        let input = create_vcf(&dir, sites, 50);
        group.bench_with_input(BenchmarkId::from_parameter(sites), &input, |b, input| {
            b.iter_batched(
                || {
                    let mut config = HapmapConfig::new(input, dir.path().join("out"), "POP");
                    config.progress_interval = 0;
                    config
                },
                |config| black_box(convert_hapmap(&config).unwrap()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_xpclr(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let input = create_vcf(&dir, 10_000, 50);
    let samples = dir.path().join("samples.txt");
    let names: Vec<String> = (0..50).rev().step_by(2).map(|s| format!("s{s}")).collect();
    fs::write(&samples, names.join("\n")).unwrap();

    c.bench_function("xpclr/10000", |b| {
        b.iter(|| {
            let mut config = XpclrConfig::new(&input, dir.path().join("out"), &samples);
            config.progress_interval = 0;
            black_box(convert_xpclr(&config).unwrap())
        });
    });
}

criterion_group!(benches, bench_hapmap, bench_xpclr);
criterion_main!(benches);
