// Criterion benchmarks for malaprop-channel.
//
// Run:
//   cargo bench -p malaprop-channel

use criterion::{Criterion, criterion_group, criterion_main};
use malaprop_channel::{ErrorDistribution, NoiseChannel, RngSource};
use malaprop_core::SymbolSet;

const TEXT: &str = "the quick brown fox jumps over the lazy dog while the cat sat on the mat";

fn bench_identity(c: &mut Criterion) {
    let mut channel = NoiseChannel::new(
        RngSource::seeded(0),
        ErrorDistribution::identity(),
        SymbolSet::lowercase_ascii(),
    )
    .expect("identity channel");

    c.bench_function("accept_sequence_identity", |b| {
        b.iter(|| std::hint::black_box(channel.accept_sequence(TEXT)));
    });
}

fn bench_noisy(c: &mut Criterion) {
    let distribution = ErrorDistribution::uniform_errors(0.1).expect("distribution");
    let mut channel =
        NoiseChannel::new(RngSource::seeded(0), distribution, SymbolSet::lowercase_ascii())
            .expect("noisy channel");

    c.bench_function("accept_sequence_ten_percent", |b| {
        b.iter(|| std::hint::black_box(channel.accept_sequence(TEXT)));
    });
}

criterion_group!(benches, bench_identity, bench_noisy);
criterion_main!(benches);
