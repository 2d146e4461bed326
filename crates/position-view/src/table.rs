//! The filter -> sort -> summarise pipeline.

use chrono_tz::Tz;
use realtime::Error;
use serde::{Deserialize, Serialize};

use crate::display::DisplayRow;
use crate::filter::{Filters, filter};
use crate::position::Position;
use crate::sort::{SortConfig, sort};
use crate::summary::Summary;

/// Filter and sort settings for one evaluation of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Filters,
    pub sort: SortConfig,
}

impl Query {
    /// Evaluate the pipeline over `records`.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [Position]) -> Table<'a> {
        let filtered = filter(records, &self.filters);
        let summary = Summary::of(&filtered);
        let records = sort(filtered, &self.sort);
        Table { records, summary }
    }
}

/// Query string form of a [`Query`]; every parameter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub tipo: Option<String>,
    pub ignicao: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl TryFrom<QueryParams> for Query {
    type Error = Error;

    fn try_from(params: QueryParams) -> Result<Self, Self::Error> {
        let mut query = Self::default();

        if let Some(tipo) = params.tipo {
            query.filters.tipo = tipo.parse()?;
        }
        if let Some(ignicao) = params.ignicao {
            query.filters.ignicao = ignicao.parse()?;
        }
        if let Some(key) = params.sort {
            query.sort.key = Some(key.parse()?);
        }
        if let Some(direction) = params.direction {
            query.sort.direction = direction.parse()?;
        }

        Ok(query)
    }
}

/// Filtered, sorted records and their summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<'a> {
    pub records: Vec<&'a Position>,
    pub summary: Summary,
}

impl Table<'_> {
    /// Zero records passed the filters. Not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Format every row for display.
    #[must_use]
    pub fn render(&self, zone: Tz) -> RenderedTable {
        RenderedTable {
            summary: self.summary,
            rows: self.records.iter().map(|r| DisplayRow::new(r, zone)).collect(),
        }
    }
}

/// Display-ready table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTable {
    pub summary: Summary,
    pub rows: Vec<DisplayRow>,
}
