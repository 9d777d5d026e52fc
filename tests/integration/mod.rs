// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use streamsplit::{generate_sentences, generate_sentences_with, SplitterConfig, Tokenizer};
use tempfile::TempDir;

/// Test fixture helper for temporary config, corpus and model files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write a file under the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Directory used as the model store
    pub fn model_dir(&self) -> PathBuf {
        let dir = self.root_path.join("models");
        fs::create_dir_all(&dir).expect("Failed to create model directory");
        dir
    }
}

/// Run fragments through the synchronous adapter with the configured built-in tokenizer
pub fn split_all<S: AsRef<str>>(fragments: &[S], config: SplitterConfig) -> Vec<String> {
    let fragments: Vec<String> = fragments.iter().map(|f| f.as_ref().to_string()).collect();
    generate_sentences(fragments, config)
        .expect("Splitter construction should succeed")
        .collect::<Result<Vec<_>, _>>()
        .expect("Splitting should succeed")
}

/// Same as [`split_all`] with an explicit tokenizer
pub fn split_all_with<S: AsRef<str>>(fragments: &[S], config: SplitterConfig, tokenizer: Tokenizer) -> Vec<String> {
    let fragments: Vec<String> = fragments.iter().map(|f| f.as_ref().to_string()).collect();
    generate_sentences_with(fragments, config, tokenizer)
        .expect("Splitter construction should succeed")
        .collect::<Result<Vec<_>, _>>()
        .expect("Splitting should succeed")
}

/// Break text into fragments of `size` characters, the way a token stream would arrive
pub fn chunk_chars(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size.max(1)).map(|chunk| chunk.iter().collect()).collect()
}

/// Text with all whitespace removed, for loss checks that ignore whitespace normalization
pub fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compare two sentence lists, providing detailed diff on mismatch
pub fn assert_sentences(actual: &[String], expected: &[&str], context: &str) {
    if actual.len() != expected.len() {
        panic!(
            "{}: Sentence count mismatch. Expected {} sentences, got {}\nActual: {:#?}",
            context,
            expected.len(),
            actual.len(),
            actual
        );
    }

    for (i, (actual_sentence, expected_sentence)) in actual.iter().zip(expected.iter()).enumerate() {
        if actual_sentence != expected_sentence {
            panic!(
                "{}: Sentence {} mismatch\nExpected: {}\nActual:   {}",
                context, i, expected_sentence, actual_sentence
            );
        }
    }
}
