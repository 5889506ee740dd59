use scraper::Html;
use tracing::debug;

type Probe<'s, T> = Box<dyn Fn(&Html) -> Option<T> + 's>;

/// Ordered list of independent lookups for one field. Evaluated left to
/// right; the first strategy that yields a value wins.
pub struct StrategyChain<'s, T> {
    field: &'static str,
    strategies: Vec<(String, Probe<'s, T>)>,
}

impl<'s, T> StrategyChain<'s, T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    pub fn then(
        mut self,
        name: impl Into<String>,
        probe: impl Fn(&Html) -> Option<T> + 's,
    ) -> Self {
        self.strategies.push((name.into(), Box::new(probe)));
        self
    }

    pub fn first(&self, document: &Html) -> Option<T> {
        for (name, probe) in &self.strategies {
            if let Some(value) = probe(document) {
                debug!(field = self.field, strategy = %name, "strategy matched");
                return Some(value);
            }
        }
        debug!(field = self.field, tried = self.strategies.len(), "strategy chain exhausted");
        None
    }
}
