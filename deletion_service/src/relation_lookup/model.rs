use core_types::ConsequenceRecord;

pub const NOT_USED_MESSAGE: &str = "Not used by any other object.";

/// What the expanded region of a row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsequenceSummary {
    NotUsed,
    /// One `"<name> (<action label>)"` line per record, in fetch order.
    UsedBy(Vec<String>),
}

impl ConsequenceSummary {
    pub fn from_records(records: &[ConsequenceRecord]) -> Self {
        if records.is_empty() {
            ConsequenceSummary::NotUsed
        } else {
            ConsequenceSummary::UsedBy(records.iter().map(ToString::to_string).collect())
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            ConsequenceSummary::NotUsed => vec![NOT_USED_MESSAGE.to_string()],
            ConsequenceSummary::UsedBy(items) => items.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    Collapsed,
    Loading,
    Loaded(ConsequenceSummary),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    pub value: String,
    pub class: Option<String>,
}

impl TableCell {
    /// Placeholder for a column the row's metadata did not produce.
    pub fn gap() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub detail: RowState,
}

/// Snapshot of the whole table. Never paginated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    pub expandable: bool,
}
