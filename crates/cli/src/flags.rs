use clap::ValueEnum;
use verse_protocol::SearchMode;

#[derive(Copy, Clone, Default, ValueEnum)]
pub(crate) enum SearchModeFlag {
    #[default]
    And,
    Compact,
}

impl SearchModeFlag {
    pub(crate) const fn as_domain(self) -> SearchMode {
        match self {
            SearchModeFlag::And => SearchMode::And,
            SearchModeFlag::Compact => SearchMode::Compact,
        }
    }
}
