//! Line preprocessors applied before interpretation
//!
//! The interpreter itself understands only bare `<code> <word>...` lines.
//! Slicer output is full of comments, so callers usually run the stream
//! through a [`ProcessorPipeline`] first. Processors never remove lines: a
//! line that becomes empty stays in place as a blank line, so diagnostic
//! line numbers still point at the original file.

use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Trait for per-line text processors
pub trait LineProcessor: Send + Sync {
    /// Get the name/identifier of this processor
    fn name(&self) -> &str;

    /// Get a description of what this processor does
    fn description(&self) -> &str;

    /// Transform one line (without its newline)
    fn process(&self, line: &str) -> String;
}

/// Arc-wrapped processor for thread-safe sharing
pub type LineProcessorHandle = Arc<dyn LineProcessor>;

/// Removes leading and trailing whitespace
#[derive(Debug, Clone, Default)]
pub struct WhitespaceProcessor;

impl WhitespaceProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl LineProcessor for WhitespaceProcessor {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn description(&self) -> &str {
        "Removes leading and trailing whitespace from each line"
    }

    fn process(&self, line: &str) -> String {
        line.trim().to_string()
    }
}

/// Removes G-code comments
///
/// Comments can be:
/// - Parentheses: `G1 X10 (move) Y5`
/// - Semicolon: `G1 X10 ; move to X10`
#[derive(Debug, Clone, Default)]
pub struct CommentProcessor;

impl CommentProcessor {
    pub fn new() -> Self {
        Self
    }

    fn regex() -> Option<&'static Regex> {
        static COMMENT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        COMMENT_REGEX
            .get_or_init(|| Regex::new(r"\([^)]*\)|\(.*$|;.*$").ok())
            .as_ref()
    }
}

impl LineProcessor for CommentProcessor {
    fn name(&self) -> &str {
        "comment"
    }

    fn description(&self) -> &str {
        "Removes G-code comments (parentheses and semicolon style)"
    }

    fn process(&self, line: &str) -> String {
        match Self::regex() {
            Some(regex) => regex.replace_all(line, "").to_string(),
            None => match line.find(';') {
                Some(pos) => line[..pos].to_string(),
                None => line.to_string(),
            },
        }
    }
}

/// Ordered sequence of line processors
#[derive(Clone, Default)]
pub struct ProcessorPipeline {
    processors: Vec<LineProcessorHandle>,
}

impl ProcessorPipeline {
    /// Create an empty pipeline (passes lines through unchanged)
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment removal followed by whitespace trimming
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .register(Arc::new(CommentProcessor::new()))
            .register(Arc::new(WhitespaceProcessor::new()));
        pipeline
    }

    /// Add a processor to the end of the pipeline
    pub fn register(&mut self, processor: LineProcessorHandle) -> &mut Self {
        self.processors.push(processor);
        self
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Names of registered processors, in order
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Run a single line through every processor
    pub fn process_line(&self, line: &str) -> String {
        self.processors
            .iter()
            .fold(line.to_string(), |acc, processor| processor.process(&acc))
    }

    /// Run a whole stream, keeping one output line per input line
    pub fn process_stream(&self, input: &str) -> String {
        if self.processors.is_empty() {
            return input.to_string();
        }
        input
            .lines()
            .map(|line| self.process_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Debug for ProcessorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorPipeline")
            .field("processors", &self.processor_names())
            .finish()
    }
}
