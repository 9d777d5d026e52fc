use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::stream::{self, StreamExt};
use streamsplit::{generate_sentences, generate_sentences_async, SplitterConfig, Tokenizer};

const PARAGRAPH: &str = "Dr. Smith went to the market yesterday morning. He bought apples, pears and a small melon. \
\"I am fine,\" she said. Then she walked away without another word. \
The meeting was moved to 3 p.m. on Friday... Nobody was happy about it! ";

fn token_fragments(text: &str) -> Vec<String> {
    // WHY: word-sized fragments approximate LLM token output
    text.split_inclusive(' ').map(str::to_string).collect()
}

fn bench_sync_splitting(c: &mut Criterion) {
    let text = PARAGRAPH.repeat(20);
    let fragments = token_fragments(&text);

    let mut group = c.benchmark_group("sync_splitting");
    group.throughput(Throughput::Bytes(text.len() as u64));

    for (name, config) in [
        ("defaults", SplitterConfig::default()),
        (
            "quick_yield_all",
            SplitterConfig {
                quick_yield_for_all_sentences: true,
                ..SplitterConfig::default()
            },
        ),
        (
            "cleanup",
            SplitterConfig {
                cleanup_text_links: true,
                cleanup_text_emojis: true,
                ..SplitterConfig::default()
            },
        ),
    ] {
        group.bench_with_input(BenchmarkId::new("rules", name), &config, |b, config| {
            b.iter(|| {
                let count = generate_sentences(fragments.iter().cloned(), config.clone())
                    .unwrap()
                    .filter(Result::is_ok)
                    .count();
                black_box(count)
            })
        });
    }
    group.finish();
}

fn bench_fragment_size(c: &mut Criterion) {
    // WHY: per-character processing cost must not depend on how the producer chunks text
    let text = PARAGRAPH.repeat(10);
    let chars: Vec<char> = text.chars().collect();

    let mut group = c.benchmark_group("fragment_size");
    group.throughput(Throughput::Bytes(text.len() as u64));
    for size in [1usize, 8, 64] {
        let fragments: Vec<String> = chars.chunks(size).map(|chunk| chunk.iter().collect()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &fragments, |b, fragments| {
            b.iter(|| {
                let count = generate_sentences(fragments.iter().cloned(), SplitterConfig::default())
                    .unwrap()
                    .count();
                black_box(count)
            })
        });
    }
    group.finish();
}

fn bench_async_splitting(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let text = PARAGRAPH.repeat(20);
    let fragments = token_fragments(&text);

    let mut group = c.benchmark_group("async_splitting");
    group.sample_size(20); // WHY: runtime overhead dominates small inputs
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("rules", |b| {
        b.to_async(&rt).iter(|| async {
            let sentences = generate_sentences_async(stream::iter(fragments.clone()), SplitterConfig::default())
                .await
                .unwrap();
            black_box(sentences.count().await)
        })
    });
    group.finish();
}

fn bench_tokenizer_call(c: &mut Criterion) {
    // WHY: the splitter re-tokenizes the whole buffer per character once past the context window
    let tokenizer = Tokenizer::rules("en").unwrap();
    let buffer = &PARAGRAPH[..120];
    c.bench_function("rules_tokenize_buffer", |b| b.iter(|| black_box(tokenizer.tokenize(black_box(buffer)).unwrap())));
}

criterion_group!(
    benches,
    bench_sync_splitting,
    bench_fragment_size,
    bench_async_splitting,
    bench_tokenizer_call
);
criterion_main!(benches);
