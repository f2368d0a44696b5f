use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pools revealed per "show more".
pub const PAGE_STEP: usize = 9;

/// Which half of the dashboard is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "full", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Core,
    Liquidity,
}

/// Ordering applied to the filtered pools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "full", derive(clap::ValueEnum))]
pub enum SortMode {
    /// Keep feed order.
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "highestAPY")]
    HighestApy,
    #[serde(rename = "lowestAPY")]
    LowestApy,
    #[serde(rename = "highestLiquidity")]
    HighestLiquidity,
    #[serde(rename = "lowestLiquidity")]
    LowestLiquidity,
}

/// Everything the user can change on the page.
///
/// Transitions return a new state; the pipeline reads it and never holds
/// state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewState {
    pub tab: Tab,
    pub search: String,
    /// `None` shows every chain.
    pub chain: Option<String>,
    pub sort: SortMode,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            tab: Tab::Core,
            search: String::new(),
            chain: None,
            sort: SortMode::Default,
            page_size: PAGE_STEP,
        }
    }
}

impl ViewState {
    pub fn with_tab(self, tab: Tab) -> Self {
        ViewState { tab, ..self }
    }

    /// New search text. Page size is kept.
    pub fn with_search(self, search: impl Into<String>) -> Self {
        ViewState {
            search: search.into(),
            ..self
        }
    }

    /// New sort mode. Page size is kept.
    pub fn with_sort(self, sort: SortMode) -> Self {
        ViewState { sort, ..self }
    }

    /// New chain filter. Resets the page to its first window. An empty
    /// string means "all chains".
    pub fn with_chain(self, chain: Option<String>) -> Self {
        ViewState {
            chain: chain.filter(|c| !c.is_empty()),
            page_size: PAGE_STEP,
            ..self
        }
    }

    pub fn show_more(self) -> Self {
        ViewState {
            page_size: self.page_size.saturating_add(PAGE_STEP),
            ..self
        }
    }

    /// Apply a UI action.
    pub fn apply(self, action: ViewAction) -> Self {
        match action {
            ViewAction::SelectTab(tab) => self.with_tab(tab),
            ViewAction::Search(text) => self.with_search(text),
            ViewAction::Sort(mode) => self.with_sort(mode),
            ViewAction::FilterChain(chain) => self.with_chain(chain),
            ViewAction::ShowMore => self.show_more(),
        }
    }
}

/// A single user interaction, as sent by a view controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ViewAction {
    SelectTab(Tab),
    Search(String),
    Sort(SortMode),
    FilterChain(Option<String>),
    ShowMore,
}
