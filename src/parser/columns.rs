//! Header resolution for the match log

use crate::config::ColumnMapping;
use crate::error::FightEloError;
use crate::types::FightCounters;
use crate::utils::parse_counter;
use csv::StringRecord;

/// Positions of one side's counter columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideColumns {
    pub knockdowns: Option<usize>,
    pub strikes: Option<usize>,
    pub takedowns: Option<usize>,
    pub submissions: Option<usize>,
}

impl SideColumns {
    /// Read this side's counters from a row; absent columns read as zero
    pub fn read(&self, raw: &StringRecord) -> FightCounters {
        let value = |position: Option<usize>| {
            parse_counter(position.and_then(|p| raw.get(p)).unwrap_or(""))
        };

        FightCounters {
            knockdowns: value(self.knockdowns),
            strikes_landed: value(self.strikes),
            takedowns: value(self.takedowns),
            submission_attempts: value(self.submissions),
        }
    }
}

/// Positions of the mapped columns inside one particular log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub competitor_a: usize,
    pub competitor_b: usize,
    pub outcome: usize,
    pub event: Option<usize>,
    pub side_a: SideColumns,
    pub side_b: SideColumns,
}

impl ColumnIndex {
    /// Resolve the mapping against a header row
    ///
    /// Identity and outcome columns are mandatory; everything else is optional.
    pub fn resolve(headers: &StringRecord, mapping: &ColumnMapping) -> Result<Self, FightEloError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| FightEloError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            competitor_a: require(&mapping.competitor_a)?,
            competitor_b: require(&mapping.competitor_b)?,
            outcome: require(&mapping.outcome)?,
            event: find(&mapping.event),
            side_a: SideColumns {
                knockdowns: find(&mapping.knockdowns_a),
                strikes: find(&mapping.strikes_a),
                takedowns: find(&mapping.takedowns_a),
                submissions: find(&mapping.submissions_a),
            },
            side_b: SideColumns {
                knockdowns: find(&mapping.knockdowns_b),
                strikes: find(&mapping.strikes_b),
                takedowns: find(&mapping.takedowns_b),
                submissions: find(&mapping.submissions_b),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_layout() {
        let headers = StringRecord::from(vec![
            "event",
            "event_url",
            "fighter_1_result",
            "fighter_1_name",
            "fighter_2_name",
            "fighter_1_knockdowns_number",
            "fighter_2_knockdowns_number",
        ]);

        let index = ColumnIndex::resolve(&headers, &ColumnMapping::default()).unwrap();
        assert_eq!(index.outcome, 2);
        assert_eq!(index.competitor_a, 3);
        assert_eq!(index.competitor_b, 4);
        assert_eq!(index.event, Some(0));
        assert_eq!(index.side_a.knockdowns, Some(5));
        assert_eq!(index.side_b.knockdowns, Some(6));
        assert_eq!(index.side_a.strikes, None);
    }

    #[test]
    fn test_header_with_byte_order_mark() {
        let headers = StringRecord::from(vec![
            "\u{feff}fighter_1_name",
            "fighter_2_name",
            "fighter_1_result",
        ]);
        let index = ColumnIndex::resolve(&headers, &ColumnMapping::default()).unwrap();
        assert_eq!(index.competitor_a, 0);
    }

    #[test]
    fn test_missing_required_column() {
        let headers = StringRecord::from(vec!["fighter_1_name", "fighter_1_result"]);
        let err = ColumnIndex::resolve(&headers, &ColumnMapping::default()).unwrap_err();
        assert_eq!(
            err,
            FightEloError::MissingColumn {
                column: "fighter_2_name".to_string()
            }
        );
    }

    #[test]
    fn test_custom_mapping() {
        let mapping = ColumnMapping {
            competitor_a: "red".to_string(),
            competitor_b: "blue".to_string(),
            outcome: "result".to_string(),
            ..ColumnMapping::default()
        };
        let headers = StringRecord::from(vec!["result", "blue", "red"]);
        let index = ColumnIndex::resolve(&headers, &mapping).unwrap();
        assert_eq!((index.competitor_a, index.competitor_b, index.outcome), (2, 1, 0));
        assert_eq!(index.event, None);
        assert_eq!(index.side_b, SideColumns::default());
    }

    #[test]
    fn test_side_columns_read() {
        let side = SideColumns {
            knockdowns: Some(0),
            strikes: Some(1),
            takedowns: Some(5),
            submissions: None,
        };
        let raw = StringRecord::from(vec!["2", "--"]);
        let counters = side.read(&raw);
        assert_eq!(counters.knockdowns, 2);
        assert_eq!(counters.strikes_landed, 0);
        assert_eq!(counters.takedowns, 0);
        assert_eq!(counters.submission_attempts, 0);
    }
}
