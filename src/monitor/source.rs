use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tokio::sync::mpsc;

/// Markers of the problem statement container. A batch that adds one of
/// these means the page body was replaced in place.
static QUESTION_CONTAINER: Lazy<Option<Selector>> = Lazy::new(|| {
    Selector::parse(
        r#"[data-cy="question-title"], [data-track-load="description_content"], [class*="question"], [id*="question"]"#,
    )
    .ok()
});

/// One batch of DOM mutation notifications, scoped to the document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Outer HTML of each added subtree.
    pub added: Vec<String>,
}

impl ChangeBatch {
    pub fn new(added: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            added: added.into_iter().map(Into::into).collect(),
        }
    }

    /// True when an added subtree is, or contains, a question container.
    pub fn is_significant(&self) -> bool {
        let Some(selector) = QUESTION_CONTAINER.as_ref() else {
            return false;
        };
        self.added.iter().any(|fragment| {
            Html::parse_fragment(fragment)
                .select(selector)
                .next()
                .is_some()
        })
    }
}

/// Where navigation and mutation signals come from. Implementations decide
/// how changes are detected (pushed mutations, polling, ...); the monitor
/// only consumes batches and asks for the live URL.
pub trait ChangeSource: Send + 'static {
    /// Start delivering batches. Must be called from within a tokio runtime.
    fn subscribe(&mut self) -> mpsc::Receiver<ChangeBatch>;

    /// Stop delivering batches; the receiver returned by `subscribe` ends.
    fn unsubscribe(&mut self);

    /// The page URL as of now.
    fn current_url(&self) -> String;
}
