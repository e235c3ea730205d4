// Integration tests: corrupt with the noise channel, restore with the decoder.

use malaprop_channel::{ErrorDistribution, ErrorKind, NoiseChannel, RngSource, SeededSource};
use malaprop_core::SymbolSet;
use malaprop_correct::{
    ConfusionTable, Decoder, DecoderConfig, NgramTable, SequenceDecoder, Strategy, decode_batch,
};

const ARPA: &str = "\
\\data\\
ngram 1=6
ngram 2=4
ngram 3=2

\\1-grams:
-99\t<s>\t-0.5
-1.0\tthe\t-0.4
-1.5\tcat\t-0.3
-1.5\tsat\t-0.3
-1.2\t</s>
-3.0\t<unk>

\\2-grams:
-0.2\t<s> the\t-0.2
-0.5\tthe cat\t-0.1
-0.6\tcat sat\t-0.1
-0.3\tsat </s>

\\3-grams:
-0.1\t<s> the cat
-0.2\tthe cat sat

\\end\\
";

const CLEAN: &str = "the cat sat";

fn configs() -> [DecoderConfig; 2] {
    [
        DecoderConfig {
            error_rate: 0.1,
            strategy: Strategy::Bigram {
                surprise_margin: Some(10.0),
            },
        },
        DecoderConfig {
            error_rate: 0.1,
            strategy: Strategy::Trigram {
                beam_width: Some(8),
            },
        },
    ]
}

fn channel(distribution: ErrorDistribution, seed: u64) -> NoiseChannel<SeededSource> {
    NoiseChannel::new(
        RngSource::seeded(seed),
        distribution,
        SymbolSet::lowercase_ascii(),
    )
    .unwrap()
}

fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

#[test]
fn identity_channel_and_exact_decoder_preserve_text() {
    let lm = NgramTable::from_arpa_str(ARPA).unwrap();
    let confusions = ConfusionTable::from_json_str(r#"{"cat": ["cot"], "the": ["thee"]}"#).unwrap();
    let mut noise = channel(ErrorDistribution::identity(), 7);
    let observed = noise.accept_sequence(CLEAN);
    assert_eq!(observed, CLEAN);

    let config = DecoderConfig {
        error_rate: 0.0,
        strategy: Strategy::Trigram {
            beam_width: Some(4),
        },
    };
    let decoder = SequenceDecoder::new(&lm, &confusions, &config).unwrap();
    assert_eq!(decoder.decode(&tokens(&observed)).unwrap(), tokens(CLEAN));
}

#[test]
fn transposed_words_are_restored() {
    let transpose = ErrorDistribution::new(0.0, 0.0, 0.0, 1.0, 0.0).unwrap();
    let mut noise = channel(transpose, 1);
    let observed = noise.accept_sequence(CLEAN);
    assert_eq!(observed, "hte act ast");
    assert_eq!(noise.stats().count(ErrorKind::Transposition), 3);

    let lm = NgramTable::from_arpa_str(ARPA).unwrap();
    let confusions: ConfusionTable = [
        ("hte", vec!["the"]),
        ("act", vec!["cat"]),
        ("ast", vec!["sat"]),
    ]
    .into_iter()
    .collect();

    for config in configs() {
        let decoder = SequenceDecoder::new(&lm, &confusions, &config).unwrap();
        assert_eq!(
            decoder.decode(&tokens(&observed)).unwrap(),
            tokens(CLEAN),
            "{config:?}"
        );
    }
}

#[test]
fn substituted_word_is_restored() {
    let substitute = ErrorDistribution::new(0.0, 1.0, 0.0, 0.0, 0.0).unwrap();
    let lm = NgramTable::from_arpa_str(ARPA).unwrap();
    let mut restored = 0;
    for seed in 0..10 {
        let corrupted = channel(substitute, seed).accept_sequence("the");
        assert_eq!(corrupted.len(), 3);
        assert!(corrupted.chars().zip("the".chars()).all(|(a, b)| a != b));
        if corrupted == "cat" || corrupted == "sat" {
            continue;
        }

        let mut confusions = ConfusionTable::new();
        confusions.insert(&corrupted, ["the"]);
        for config in configs() {
            let decoder = SequenceDecoder::new(&lm, &confusions, &config).unwrap();
            let observed = [corrupted.as_str(), "cat", "sat"];
            assert_eq!(decoder.decode(&observed).unwrap(), tokens(CLEAN));
        }
        restored += 1;
    }
    assert!(restored > 0);
}

#[test]
fn batch_matches_sequential_decoding() {
    let lm = NgramTable::from_arpa_str(ARPA).unwrap();
    let confusions = ConfusionTable::from_json_reader(
        r#"{"hte": ["the"], "act": ["cat"], "ast": ["sat"]}"#.as_bytes(),
    )
    .unwrap();
    let sentences: Vec<Vec<String>> = ["hte act ast", "the cat sat", "act", "ast ast hte"]
        .iter()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect();

    for config in configs() {
        let decoder = SequenceDecoder::new(&lm, &confusions, &config).unwrap();
        let batch = decode_batch(&decoder, &sentences);
        for (sentence, result) in sentences.iter().zip(batch) {
            assert_eq!(result.unwrap(), decoder.decode_scored(sentence).unwrap());
        }
    }
}

#[test]
fn tables_load_from_files() {
    let dir = std::env::temp_dir().join(format!("malaprop-round-trip-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let arpa = dir.join("model.arpa");
    let json = dir.join("confusions.json");
    std::fs::write(&arpa, ARPA).unwrap();
    std::fs::write(&json, r#"{"hte": ["the", "hte"]}"#).unwrap();

    let lm = NgramTable::from_arpa_path(&arpa).unwrap();
    let confusions = ConfusionTable::from_json_path(&json).unwrap();
    assert_eq!(lm.counts(), [6, 4, 2]);
    assert_eq!(confusions.get("hte"), ["the"]);

    assert!(NgramTable::from_arpa_path(dir.join("missing.arpa")).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}
