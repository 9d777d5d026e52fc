pub mod config;
pub mod error;
pub mod reader;
pub mod sanitize;
pub mod splitter;
pub mod stream;
pub mod tokenizer;

// Re-export main types for convenient access
pub use config::SplitterConfig;
pub use error::{Result, SplitError};
pub use splitter::{merge_short_sentences, SentenceSplitter, Sentences};

// Re-export the calling conventions over the splitter
pub use stream::{
    generate_sentences, generate_sentences_async, generate_sentences_async_with, generate_sentences_with,
    SentenceIter, SentenceStream,
};

pub use reader::{FragmentReader, ReaderConfig};
pub use sanitize::{clean, remove_emojis, remove_links, CleanOptions};
pub use tokenizer::{init_tokenizer, init_tokenizer_blocking, Tokenizer, TokenizerKind, TokenizerOptions};
