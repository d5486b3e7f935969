use crate::dispatcher::UiDispatcher;
use crate::errors::{RedDeerError, RedDeerResult};
use crate::matchers::{describe_all, Matcher};
use crate::platforms::DisplayEngine;
use crate::selector::Selector;
use crate::widget::Widget;
use tracing::{debug, instrument};

/// Locates live widgets under one or more root containers.
///
/// Every call walks the live tree again on the UI thread; nothing is cached
/// between calls because the toolkit mutates the tree at will.
#[derive(Clone)]
pub struct WidgetResolver {
    dispatcher: UiDispatcher,
}

impl WidgetResolver {
    pub fn new(dispatcher: UiDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Direct children of `parent` in toolkit order.
    #[instrument(level = "debug", skip(self, parent), fields(parent = %parent.describe()))]
    pub fn children(&self, parent: &Widget) -> RedDeerResult<Vec<Widget>> {
        let parent = parent.clone();
        self.dispatcher
            .run_on_ui_thread(move || parent.raw().children())
    }

    /// The `index`-th (0-based) descendant of `roots` satisfying every matcher.
    #[instrument(level = "debug", skip(self, roots, matchers))]
    pub fn resolve(
        &self,
        roots: &[Widget],
        matchers: &[Matcher],
        index: usize,
    ) -> RedDeerResult<Widget> {
        let roots = roots.to_vec();
        let matchers = matchers.to_vec();
        self.dispatcher
            .run_on_ui_thread(move || nth_match(&roots, &matchers, index))
    }

    /// Every descendant of `roots` satisfying every matcher, in traversal order.
    #[instrument(level = "debug", skip(self, roots, matchers))]
    pub fn resolve_all(&self, roots: &[Widget], matchers: &[Matcher]) -> RedDeerResult<Vec<Widget>> {
        let roots = roots.to_vec();
        let matchers = matchers.to_vec();
        self.dispatcher
            .run_on_ui_thread(move || collect_matches(&roots, &matchers, None))
    }

    /// Resolves a selector. Without an explicit root the active shell is
    /// searched, or every open shell when none is active.
    #[instrument(level = "debug", skip(self), fields(selector = %selector))]
    pub fn find(&self, selector: &Selector) -> RedDeerResult<Widget> {
        let engine = self.dispatcher.engine().clone();
        let selector = selector.clone();
        self.dispatcher.run_on_ui_thread(move || {
            let roots = roots_for(&selector, engine.as_ref())?;
            nth_match(&roots, selector.matchers(), selector.index())
        })
    }

    /// All widgets a selector's matchers accept, ignoring its index.
    #[instrument(level = "debug", skip(self), fields(selector = %selector))]
    pub fn find_all(&self, selector: &Selector) -> RedDeerResult<Vec<Widget>> {
        let engine = self.dispatcher.engine().clone();
        let selector = selector.clone();
        self.dispatcher.run_on_ui_thread(move || {
            let roots = roots_for(&selector, engine.as_ref())?;
            collect_matches(&roots, selector.matchers(), None)
        })
    }
}

/// Search roots for `selector`. UI thread only.
pub(crate) fn roots_for(
    selector: &Selector,
    engine: &dyn DisplayEngine,
) -> RedDeerResult<Vec<Widget>> {
    if let Some(root) = selector.root() {
        return Ok(vec![root.clone()]);
    }
    if let Some(active) = engine.active_shell()? {
        return Ok(vec![active]);
    }
    let shells = engine.shells()?;
    if shells.is_empty() {
        return Err(RedDeerError::WidgetNotFound(
            "no shell is open to search in".to_string(),
        ));
    }
    Ok(shells)
}

/// Depth-first, pre-order walk over the descendants of `roots` in child
/// order, keeping widgets every matcher accepts. Stops once `limit` matches
/// were collected. UI thread only.
pub fn collect_matches(
    roots: &[Widget],
    matchers: &[Matcher],
    limit: Option<usize>,
) -> RedDeerResult<Vec<Widget>> {
    let mut found = Vec::new();
    let mut stack: Vec<Widget> = Vec::new();
    for root in roots.iter().rev() {
        stack.extend(root.raw().children()?.into_iter().rev());
    }
    while let Some(widget) = stack.pop() {
        if Matcher::all_match(matchers, &widget)? {
            found.push(widget.clone());
            if limit.is_some_and(|limit| found.len() >= limit) {
                break;
            }
        }
        stack.extend(widget.raw().children()?.into_iter().rev());
    }
    Ok(found)
}

fn nth_match(roots: &[Widget], matchers: &[Matcher], index: usize) -> RedDeerResult<Widget> {
    let mut found = collect_matches(roots, matchers, index.checked_add(1))?;
    debug!(
        matches = found.len(),
        index, "resolved candidates for {}",
        describe_all(matchers)
    );
    if found.len() <= index {
        return Err(RedDeerError::WidgetNotFound(format!(
            "no widget with index {index} matching [{}]: {} match(es) found under {} root(s)",
            describe_all(matchers),
            found.len(),
            roots.len()
        )));
    }
    Ok(found.swap_remove(index))
}
