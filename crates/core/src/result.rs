use crate::Row;

/// Normalized rows of a statement that produced a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub num_rows: u64,
    /// First row, or an empty row when the set is empty.
    pub row: Row,
    pub rows: Vec<Row>,
}

impl ResultSet {
    #[must_use]
    pub fn new(num_rows: u64, rows: Vec<Row>) -> Self {
        let row = rows.first().cloned().unwrap_or_default();
        Self {
            num_rows,
            row,
            rows,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for ResultSet {
    fn from(rows: Vec<Row>) -> Self {
        let num_rows = rows.len() as u64;
        Self::new(num_rows, rows)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rows(ResultSet),
    /// The statement succeeded without producing a result set.
    Done,
}

impl Outcome {
    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            Self::Rows(result) => Some(result),
            Self::Done => None,
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            Self::Rows(result) => Some(result),
            Self::Done => None,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
