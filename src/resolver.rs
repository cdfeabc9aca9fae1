//! Heuristic discovery of the title and body editors on a page.
//!
//! Nothing here is cached: every call re-reads the page, because the host
//! editor may re-render between calls.

use regex::Regex;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::classify::{
    is_visible, placeholder_text, resolve_editable_target, visible_editable_targets,
};
use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::page::{Marker, Page, Selector};

/// Outcome of one detection attempt. Either side may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<N> {
    pub title: Option<N>,
    pub body: Option<N>,
    /// Nodes matching the editable selector group, hidden ones included.
    pub editables: usize,
}

/// Both editors, known to be distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct Targets<N> {
    pub title: N,
    pub body: N,
}

impl<N: PartialEq> Resolution<N> {
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.body.is_some()
    }

    /// Check the resolution before writing anything. A single node found as
    /// both title and body is an ambiguous page, never a partial success.
    pub fn into_targets(self) -> Result<Targets<N>> {
        let editables = self.editables;
        match (self.title, self.body) {
            (Some(title), Some(body)) if title == body => Err(Error::TargetConflict),
            (None, _) => Err(Error::NoTitleTarget { editables }),
            (_, None) => Err(Error::NoBodyTarget { editables }),
            (Some(title), Some(body)) => Ok(Targets { title, body }),
        }
    }
}

/// Selectors with title semantics, highest priority first.
pub fn title_selectors() -> Vec<Selector> {
    vec![
        Selector::marked(Marker::ContentEditable).attr_contains("data-placeholder", "Title"),
        Selector::marked(Marker::ContentEditable).attr_contains("aria-label", "Title"),
        Selector::marked(Marker::TextboxRole).attr_contains("aria-label", "Title"),
        Selector::default().attr_contains("data-placeholder", "Title"),
        Selector::tag("h1"),
    ]
}

fn re_strong_body_intent() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)tell your story").expect("body intent regex"))
}

fn re_body_vocabulary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)story|editor|body|post").expect("body vocabulary regex"))
}

fn sort_by_top<P: Page>(page: &P, nodes: &mut [P::Node]) {
    // Stable, so equal tops keep document order
    nodes.sort_by(|a, b| {
        page.bounding_box(a)
            .top
            .total_cmp(&page.bounding_box(b).top)
    });
}

/// The title editor: the first selector with a visible match wins, else the
/// topmost visible editable on the page.
pub fn find_title_target<P: Page>(page: &P) -> Option<P::Node> {
    for selector in title_selectors() {
        let found = page
            .query_all(&selector)
            .into_iter()
            .filter(|node| is_visible(page, node))
            .find_map(|node| resolve_editable_target(page, &node));
        if let Some(target) = found {
            log::debug!("Title editor matched {selector}: {target:?}");
            return Some(target);
        }
    }

    let mut editables = visible_editable_targets(page);
    sort_by_top(page, &mut editables);
    let topmost = editables.into_iter().next();
    if let Some(target) = &topmost {
        log::debug!("Title editor from topmost editable: {target:?}");
    }
    topmost
}

/// Score one body candidate; higher is more likely the draft body.
pub fn score_body_candidate<P: Page>(
    page: &P,
    node: &P::Node,
    title_bottom: Option<f64>,
    config: &ResolverConfig,
) -> i32 {
    let label = placeholder_text(page, node);
    let mut score = 0;

    if re_strong_body_intent().is_match(&label) {
        score += 10;
    }
    if re_body_vocabulary().is_match(&label) {
        score += 4;
    }
    if page.text_content(node).trim().chars().count() < config.short_text_len {
        score += 1;
    }
    if let Some(bottom) = title_bottom {
        if page.bounding_box(node).top > bottom {
            score += 3;
        }
    }

    score
}

/// The body editor: best-scoring visible editable other than `title`.
pub fn find_body_target<P: Page>(
    page: &P,
    title: Option<&P::Node>,
    config: &ResolverConfig,
) -> Option<P::Node> {
    let title_bottom = title.map(|t| page.bounding_box(t).bottom());
    let mut candidates = visible_editable_targets(page);

    let mut best: Option<(i32, &P::Node)> = None;
    for node in candidates.iter().filter(|n| Some(*n) != title) {
        let score = score_body_candidate(page, node, title_bottom, config);
        log::trace!("Body candidate {node:?} scored {score}");
        // Strictly greater, so ties go to the first candidate
        if best.is_none_or(|(top_score, _)| score > top_score) {
            best = Some((score, node));
        }
    }

    if let Some((score, node)) = best {
        log::debug!("Body editor {node:?} with score {score}");
        return Some(node.clone());
    }

    // The first editable by position is assumed to be the title region
    sort_by_top(page, &mut candidates);
    candidates.into_iter().nth(1)
}

/// One detection attempt over the current page.
pub fn resolve<P: Page>(page: &P, config: &ResolverConfig) -> Resolution<P::Node> {
    let title = find_title_target(page);
    let mut body = find_body_target(page, title.as_ref(), config);

    // A lone editable is both candidates, which into_targets reports as a conflict
    if body.is_none() {
        if let Some(only) = &title {
            if visible_editable_targets(page).as_slice() == std::slice::from_ref(only) {
                log::debug!("Only one editable on the page: {only:?}");
                body = Some(only.clone());
            }
        }
    }

    Resolution {
        title,
        body,
        editables: page.query_any(&Selector::editable()).len(),
    }
}

/// Poll until both editors are found or the timeout elapses, then return
/// whatever was found. Callers must handle missing targets.
pub fn wait_for_editors<P: Page>(page: &mut P, config: &ResolverConfig) -> Resolution<P::Node> {
    let started = Instant::now();
    // None if the platform clock cannot represent the deadline
    let deadline = started.checked_add(config.timeout());
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        let resolution = resolve(page, config);
        if resolution.is_complete() {
            log::debug!(
                "Editors found after {attempts} attempt(s) in {:?}",
                started.elapsed()
            );
            return resolution;
        }

        let now = Instant::now();
        let remaining = match deadline {
            Some(deadline) if now >= deadline => break,
            Some(deadline) => deadline - now,
            None => config.poll_interval(),
        };
        page.pause(config.poll_interval().min(remaining));
    }

    // Deadline reached: one last look
    let resolution = resolve(page, config);
    if !resolution.is_complete() {
        log::warn!(
            "Editor detection timed out after {attempts} attempt(s) (title found: {}, body found: {})",
            resolution.title.is_some(),
            resolution.body.is_some()
        );
    }
    resolution
}

/// [`wait_for_editors`] with default polling and the given timeout.
pub fn wait_for_editors_within<P: Page>(page: &mut P, timeout: Duration) -> Resolution<P::Node> {
    wait_for_editors(page, &ResolverConfig::default().with_timeout(timeout))
}
