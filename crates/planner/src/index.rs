//! Free-text index backend.

use crate::{
    compiler::{FilterCompiler, QueryBackend},
    operators,
};
use model::{
    error::FilterError,
    filter::{Comparison, LogicalOperator},
    query::{MATCH_ALL, composite::is_term_constraint},
};
use tracing::trace;

/// Renders comparison leaves in Lucene-style syntax; spatial leaves travel in the
/// predicate chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexQueryRenderer;

pub type IndexCompiler = FilterCompiler<IndexQueryRenderer>;

impl IndexCompiler {
    pub fn index() -> Self {
        FilterCompiler::new(IndexQueryRenderer)
    }
}

impl QueryBackend for IndexQueryRenderer {
    type Text = String;

    fn empty_text(&self) -> String {
        String::new()
    }

    fn is_trivial(&self, text: &String) -> bool {
        !is_term_constraint(text)
    }

    fn comparison(&self, comparison: &Comparison) -> Result<String, FilterError> {
        let text = operators::index::render(comparison)?;
        trace!("Rendered {} as '{text}'", comparison.operator);
        Ok(text)
    }

    fn group(&self, operator: LogicalOperator, operands: Vec<String>) -> String {
        if operands.is_empty() {
            return String::new();
        }
        let separator = format!(" {} ", operator.keyword());
        format!("({})", operands.join(&separator))
    }

    fn render(&self, text: String) -> String {
        text
    }

    fn match_all(&self) -> Option<&'static str> {
        Some(MATCH_ALL)
    }
}
