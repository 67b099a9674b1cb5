use super::error::DataError;
use super::model::{CellValue, DerivedRecord, Record, ACCOMMODATION};
use crate::config::{AccommodationPolicy, PipelineConfig, ZeroVisitorsPolicy};

// ---------------------------------------------------------------------------
// Loader/Normalizer: binary coercion + revenue-per-visitor ratio
// ---------------------------------------------------------------------------

/// Turn raw records into derived records, one for one, in input order.
pub fn normalize(
    records: Vec<Record>,
    config: &PipelineConfig,
) -> Result<Vec<DerivedRecord>, DataError> {
    let mut unrecognized = 0usize;
    let mut zero_visitors = 0usize;

    let derived = records
        .into_iter()
        .enumerate()
        .map(|(row, record)| {
            let accommodation_available = match coerce_accommodation(&record.accommodation) {
                Some(flag) => Some(flag),
                None => match config.accommodation {
                    AccommodationPolicy::Strict => {
                        return Err(DataError::UnrecognizedCategoricalValue {
                            row,
                            column: ACCOMMODATION.to_string(),
                            value: record.accommodation.to_string(),
                        });
                    }
                    AccommodationPolicy::TreatAsMissing => {
                        unrecognized += 1;
                        None
                    }
                },
            };

            let revenue_per_visitor = if record.visitors == 0.0 {
                match config.zero_visitors {
                    ZeroVisitorsPolicy::Fail => return Err(DataError::DivisionUndefined { row }),
                    ZeroVisitorsPolicy::Missing => {
                        zero_visitors += 1;
                        None
                    }
                }
            } else {
                Some(record.revenue / record.visitors)
            };

            Ok(DerivedRecord {
                record,
                accommodation_available,
                revenue_per_visitor,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if unrecognized > 0 {
        log::warn!(
            "{unrecognized} rows have an unrecognized {ACCOMMODATION} value; treated as missing"
        );
    }
    if zero_visitors > 0 {
        log::warn!(
            "{zero_visitors} rows have zero visitors; revenue per visitor treated as missing"
        );
    }

    Ok(derived)
}

/// `"Yes"` → true, `"No"` → false, anything else → `None`.
fn coerce_accommodation(value: &CellValue) -> Option<bool> {
    match value {
        CellValue::String(s) if s == "Yes" => Some(true),
        CellValue::String(s) if s == "No" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(visitors: f64, revenue: f64, accommodation: &str) -> Record {
        Record {
            country: "US".into(),
            category: "Beach".into(),
            visitors,
            revenue,
            rating: 4.0,
            accommodation: CellValue::String(accommodation.into()),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn revenue_per_visitor_is_revenue_over_visitors() {
        let rows = vec![record(100.0, 5000.0, "Yes"), record(50.0, 3000.0, "No")];
        let derived = normalize(rows, &PipelineConfig::default()).unwrap();

        assert_eq!(derived.len(), 2);
        assert_eq!(derived[0].revenue_per_visitor, Some(50.0));
        assert_eq!(derived[1].revenue_per_visitor, Some(60.0));
        assert_eq!(derived[0].accommodation_available, Some(true));
        assert_eq!(derived[1].accommodation_available, Some(false));
    }

    #[test]
    fn strict_policy_rejects_unknown_accommodation() {
        let rows = vec![record(10.0, 10.0, "Yes"), record(10.0, 10.0, "Maybe")];
        let err = normalize(rows, &PipelineConfig::default()).unwrap_err();

        assert_eq!(
            err,
            DataError::UnrecognizedCategoricalValue {
                row: 1,
                column: "Accommodation_Available".into(),
                value: "Maybe".into(),
            }
        );
    }

    #[test]
    fn lenient_policy_keeps_unknown_accommodation_as_missing() {
        let rows = vec![record(10.0, 10.0, "yes"), record(10.0, 10.0, "No")];
        let derived = normalize(rows, &PipelineConfig::lenient()).unwrap();

        assert_eq!(derived[0].accommodation_available, None);
        assert_eq!(derived[1].accommodation_available, Some(false));
    }

    #[test]
    fn zero_visitors_becomes_missing_by_default() {
        let derived =
            normalize(vec![record(0.0, 10.0, "Yes")], &PipelineConfig::default()).unwrap();
        assert_eq!(derived[0].revenue_per_visitor, None);
    }

    #[test]
    fn zero_visitors_fails_when_configured() {
        let config = PipelineConfig {
            zero_visitors: ZeroVisitorsPolicy::Fail,
            ..PipelineConfig::default()
        };
        let rows = vec![record(5.0, 10.0, "Yes"), record(0.0, 10.0, "Yes")];
        assert_eq!(
            normalize(rows, &config).unwrap_err(),
            DataError::DivisionUndefined { row: 1 }
        );
    }
}
