// WHY: Two calling conventions over one engine: a plain iterator of fragments and an async Stream
// Both are thin step drivers; neither owns any boundary logic

use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

use crate::config::SplitterConfig;
use crate::error::Result;
use crate::splitter::SentenceSplitter;
use crate::tokenizer::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Source still open
    Streaming,
    /// Source exhausted, draining the buffer
    Flushing,
    Done,
}

/// Outcome of a single engine step
#[derive(Debug)]
enum Step {
    Emit(Result<String>),
    NeedInput,
    Finished,
}

/// Splitter plus the adapter lifecycle; an error ends the sequence
#[derive(Debug)]
struct Engine {
    splitter: SentenceSplitter,
    phase: Phase,
}

impl Engine {
    fn new(splitter: SentenceSplitter) -> Self {
        Self {
            splitter,
            phase: Phase::Streaming,
        }
    }

    fn step(&mut self) -> Step {
        let next = match self.phase {
            Phase::Done => return Step::Finished,
            Phase::Streaming => self.splitter.drive().next(),
            Phase::Flushing => self.splitter.flush().next(),
        };

        match next {
            Some(Ok(sentence)) => Step::Emit(Ok(sentence)),
            Some(Err(e)) => {
                debug!(error = %e, "Sentence stream stopped on error");
                self.phase = Phase::Done;
                Step::Emit(Err(e))
            }
            None if self.phase == Phase::Streaming => Step::NeedInput,
            None => {
                self.phase = Phase::Done;
                Step::Finished
            }
        }
    }

    /// `None` marks the end of the source
    fn feed(&mut self, fragment: Option<String>) {
        match fragment {
            Some(fragment) => self.splitter.ingest(fragment),
            None => self.phase = Phase::Flushing,
        }
    }
}

/// Sentences from a synchronous fragment source
///
/// Pulls one fragment only when the splitter has nothing left to yield.
#[derive(Debug)]
pub struct SentenceIter<I> {
    engine: Engine,
    fragments: I,
}

impl<I> SentenceIter<I> {
    pub fn new(splitter: SentenceSplitter, fragments: I) -> Self {
        Self {
            engine: Engine::new(splitter),
            fragments,
        }
    }

    pub fn splitter(&self) -> &SentenceSplitter {
        &self.engine.splitter
    }
}

impl<I> Iterator for SentenceIter<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.engine.step() {
                Step::Emit(item) => return Some(item),
                Step::Finished => return None,
                Step::NeedInput => {
                    let fragment = self.fragments.next().map(Into::into);
                    self.engine.feed(fragment);
                }
            }
        }
    }
}

/// Sentences from an asynchronous fragment source
///
/// Tokenization runs inline inside `poll_next`; callers that need the runtime
/// free should drive this from a dedicated task.
#[derive(Debug)]
pub struct SentenceStream<S> {
    engine: Engine,
    fragments: S,
}

impl<S> SentenceStream<S> {
    pub fn new(splitter: SentenceSplitter, fragments: S) -> Self {
        Self {
            engine: Engine::new(splitter),
            fragments,
        }
    }

    pub fn splitter(&self) -> &SentenceSplitter {
        &self.engine.splitter
    }
}

impl<S> Stream for SentenceStream<S>
where
    S: Stream + Unpin,
    S::Item: Into<String>,
{
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.engine.step() {
                Step::Emit(item) => return Poll::Ready(Some(item)),
                Step::Finished => return Poll::Ready(None),
                Step::NeedInput => match this.fragments.poll_next_unpin(cx) {
                    Poll::Ready(fragment) => this.engine.feed(fragment.map(Into::into)),
                    Poll::Pending => return Poll::Pending,
                },
            }
        }
    }
}

/// Split a synchronous fragment source using the built-in tokenizer the config names
///
/// Configuration errors are reported here, before any fragment is read.
pub fn generate_sentences<I>(fragments: I, config: SplitterConfig) -> Result<SentenceIter<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let splitter = SentenceSplitter::from_config(config)?;
    Ok(SentenceIter::new(splitter, fragments.into_iter()))
}

/// Split a synchronous fragment source with a caller-supplied tokenizer
pub fn generate_sentences_with<I>(
    fragments: I,
    config: SplitterConfig,
    tokenizer: Tokenizer,
) -> Result<SentenceIter<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let splitter = SentenceSplitter::new(config, tokenizer)?;
    Ok(SentenceIter::new(splitter, fragments.into_iter()))
}

/// Split an asynchronous fragment source using the built-in tokenizer the config names
pub async fn generate_sentences_async<S>(fragments: S, config: SplitterConfig) -> Result<SentenceStream<S>>
where
    S: Stream + Unpin,
    S::Item: Into<String>,
{
    let splitter = SentenceSplitter::from_config_async(config).await?;
    Ok(SentenceStream::new(splitter, fragments))
}

/// Split an asynchronous fragment source with a caller-supplied tokenizer
pub fn generate_sentences_async_with<S>(
    fragments: S,
    config: SplitterConfig,
    tokenizer: Tokenizer,
) -> Result<SentenceStream<S>>
where
    S: Stream + Unpin,
    S::Item: Into<String>,
{
    let splitter = SentenceSplitter::new(config, tokenizer)?;
    Ok(SentenceStream::new(splitter, fragments))
}
