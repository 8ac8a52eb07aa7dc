use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One published value of a historical series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Dated unit values for one currency, in the order the provider published them.
///
/// The provider emits ascending dates; the sequence is never re-sorted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalSeries {
    points: Vec<SeriesPoint>,
}

impl HistoricalSeries {
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The last published point.
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Value published exactly on `date`, if any.
    pub fn value_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.points
            .iter()
            .find(|point| point.date == date)
            .map(|point| point.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }
}

impl IntoIterator for HistoricalSeries {
    type Item = SeriesPoint;
    type IntoIter = std::vec::IntoIter<SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    #[test]
    fn test_series_keeps_document_order() {
        let series = HistoricalSeries::new(vec![
            SeriesPoint {
                date: date(13),
                value: dec!(73.5),
            },
            SeriesPoint {
                date: date(12),
                value: dec!(73.9),
            },
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().map(|p| p.date), Some(date(12)));
        assert_eq!(series.value_on(date(13)), Some(dec!(73.5)));
        assert_eq!(series.value_on(date(14)), None);
    }

    #[test]
    fn test_empty_series() {
        let series = HistoricalSeries::default();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }
}
