// Pure projection from application state to what the screen shows
//
// Nothing here touches the terminal. The renderer in `ui` draws a ViewModel,
// and the whole thing is rebuilt after every change.
use crate::sparkline::render_sparkline;
use hindex_core::{compute_h_index, ApplicationState};

pub const TITLE: &str = "Online H-Index Calculator";
pub const TAGLINE: &str =
    "Compute and explore your publication H-index locally (data never leaves this machine).";
pub const EMPTY_MESSAGE: &str = "No articles yet. Press \"a\" to add one.";
pub const TITLE_PLACEHOLDER: &str = "Title (optional)";

/// One editable row in the article table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// 1-based position, as displayed
    pub number: usize,
    pub title: String,
    pub citations: u64,
}

impl RowView {
    /// Title text for display, placeholder when blank
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            TITLE_PLACEHOLDER
        } else {
            &self.title
        }
    }
}

/// One bar of the citation chart, in sorted order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarView {
    pub citations: u64,
    /// Part of the h-core, drawn in the accent color
    pub contributing: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub tabs: Vec<String>,
    pub active_tab: usize,
    pub rows: Vec<RowView>,
    pub h_index: usize,
    pub article_label: String,
    pub bars: Vec<BarView>,
    /// Value the chart scales against
    pub chart_max: u64,
    pub sparkline: String,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn active_name(&self) -> &str {
        self.tabs
            .get(self.active_tab)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Build the view model for the active collection
pub fn project(state: &ApplicationState, chart_floor: u64) -> ViewModel {
    let active = state.active();
    let tabs: Vec<String> = state.names().into_iter().map(String::from).collect();
    let active_tab = tabs
        .iter()
        .position(|name| name == state.current())
        .unwrap_or(0);

    let rows = active
        .articles
        .iter()
        .enumerate()
        .map(|(i, article)| RowView {
            number: i + 1,
            title: article.title.clone(),
            citations: article.citations,
        })
        .collect();

    let hindex = compute_h_index(&active.citations());
    let bars = hindex
        .sorted
        .iter()
        .enumerate()
        .map(|(rank, &citations)| BarView {
            citations,
            contributing: hindex.contributes(rank),
            tooltip: plural(citations as usize, "citation"),
        })
        .collect();

    let chart_max = hindex
        .sorted
        .first()
        .copied()
        .unwrap_or(0)
        .max(chart_floor);

    ViewModel {
        tabs,
        active_tab,
        rows,
        h_index: hindex.h,
        article_label: plural(active.articles.len(), "article"),
        bars,
        chart_max,
        sparkline: render_sparkline(&hindex.sorted),
    }
}

/// "1 article", "3 articles"
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
