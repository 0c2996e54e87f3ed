use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use sheetlint_linter::{CancelFlag, Engine, RuleRegistry, RuleSet};
use sheetlint_syntax::Dialect;
use std::fmt::Write;
use std::hint::black_box;
use std::path::{Path, PathBuf};

// One component's worth of SCSS touching every rule
const COMPONENT: &str = r"
// .legacy { color: red; }
.card-{i} {
  margin: 0px 4px 0 4px;
  padding-top: 1px;
  padding-right: 2px;
  padding-bottom: 1px;
  padding-left: 2px;

  &:hover { color: $accent; }
  .theme-dark & { background: #000; }

  .card__title {
    font-size: 1.2em;
    ul li a { text-decoration: none; }
  }
}

#sidebar-{i} div.card { border: 0 solid transparent; }
";

/// A stylesheet of `components` repetitions of [`COMPONENT`].
fn stylesheet(components: usize) -> String {
    let mut source = String::with_capacity(COMPONENT.len() * components);
    for i in 0..components {
        let _ = write!(source, "{}", COMPONENT.replace("{i}", &i.to_string()));
    }
    source
}

fn parse_benchmarks(c: &mut Criterion) {
    let source = stylesheet(200);
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("scss_200_components", |b| {
        b.iter(|| black_box(sheetlint_syntax::parse(black_box(&source), Dialect::Scss)));
    });
    group.finish();
}

fn lint_benchmarks(c: &mut Criterion) {
    let registry = RuleRegistry::new();
    let Ok(rules) = RuleSet::defaults(&registry) else {
        return;
    };
    let engine = Engine::new(&registry, rules);
    let source = stylesheet(200);

    let mut group = c.benchmark_group("lint");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("source_200_components", |b| {
        b.iter(|| black_box(engine.lint_source(Path::new("bench.scss"), black_box(&source))));
    });
    group.finish();
}

fn parallel_benchmarks(c: &mut Criterion) {
    let registry = RuleRegistry::new();
    let Ok(rules) = RuleSet::defaults(&registry) else {
        return;
    };
    let engine = Engine::new(&registry, rules);

    let Ok(dir) = tempfile::tempdir() else {
        return;
    };
    let source = stylesheet(20);
    let files: Vec<PathBuf> = (0..64)
        .map(|i| dir.path().join(format!("component-{i}.scss")))
        .filter(|path| std::fs::write(path, &source).is_ok())
        .collect();

    c.bench_function("lint_files_64", |b| {
        b.iter_batched(
            CancelFlag::new,
            |cancel| black_box(engine.lint_files(&files, &cancel)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    parse_benchmarks,
    lint_benchmarks,
    parallel_benchmarks
);
criterion_main!(benches);
