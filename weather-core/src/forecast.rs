//! Forecast sequences, their statistics and the reduction to daily summaries.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, ops::Deref};

use crate::model::Observation;

/// An ordered sequence of observations, as returned by the forecast endpoint.
///
/// Nothing here depends on the order of the observations; grouping is derived
/// from each observation's own calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forecast(Vec<Observation>);

impl Forecast {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self(observations)
    }

    pub fn into_inner(self) -> Vec<Observation> {
        self.0
    }

    /// Reduce the forecast to one summary per calendar day, ascending by day.
    ///
    /// Each summary carries the highest `temperature_max`, the lowest
    /// `temperature_min` and the mean `temperature` and `humidity` of its day.
    /// Its `date` is midnight of that day, rendered in the offset of the first
    /// observation of the whole forecast, even when later observations carry
    /// a different offset.
    pub fn daily(&self) -> Forecast {
        let Some(first) = self.0.first() else {
            return Forecast::default();
        };
        let offset = *first.date.offset();

        self.by_day()
            .into_iter()
            .map(|(day, hourly)| Observation {
                date: midnight(day, offset),
                temperature: hourly.average_temperature(),
                temperature_min: hourly.minimum_temperature(),
                temperature_max: hourly.maximum_temperature(),
                humidity: hourly.average_humidity(),
            })
            .collect()
    }

    /// Group observations by calendar day in their own offset.
    ///
    /// Days come out in ascending order; members keep their input order.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Forecast> {
        let mut days: BTreeMap<NaiveDate, Forecast> = BTreeMap::new();
        for observation in &self.0 {
            days.entry(day_key(observation)).or_default().0.push(*observation);
        }
        days
    }

    /// Highest `temperature_max`, or negative infinity when empty.
    pub fn maximum_temperature(&self) -> f64 {
        self.0.iter().map(|o| o.temperature_max).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest `temperature_min`, or positive infinity when empty.
    pub fn minimum_temperature(&self) -> f64 {
        self.0.iter().map(|o| o.temperature_min).fold(f64::INFINITY, f64::min)
    }

    /// Mean of `temperature`. NaN when empty.
    pub fn average_temperature(&self) -> f64 {
        let sum: f64 = self.0.iter().map(|o| o.temperature).sum();
        sum / self.0.len() as f64
    }

    /// Mean of `humidity`. NaN when empty.
    pub fn average_humidity(&self) -> f64 {
        let sum: f64 = self.0.iter().map(|o| o.humidity).sum();
        sum / self.0.len() as f64
    }
}

/// Calendar day of the observation in its own offset.
pub fn day_key(observation: &Observation) -> NaiveDate {
    observation.date.date_naive()
}

fn midnight(day: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = day.and_time(NaiveTime::MIN);
    let utc = local - Duration::seconds(offset.local_minus_utc().into());
    offset.from_utc_datetime(&utc)
}

impl Deref for Forecast {
    type Target = [Observation];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Observation>> for Forecast {
    fn from(observations: Vec<Observation>) -> Self {
        Self(observations)
    }
}

impl FromIterator<Observation> for Forecast {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Forecast {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Forecast {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn obs(date: &str, temperature: f64, min: f64, max: f64, humidity: f64) -> Observation {
        Observation {
            date: DateTime::parse_from_rfc3339(date).expect("valid RFC 3339 date"),
            temperature,
            temperature_min: min,
            temperature_max: max,
            humidity,
        }
    }

    fn at(date: &str) -> Observation {
        obs(date, 60.0, 50.0, 70.0, 40.0)
    }

    fn sample() -> Forecast {
        Forecast::new(vec![
            obs("2024-01-01T03:00:00-05:00", 61.0, 55.0, 66.0, 80.0),
            obs("2024-01-01T15:00:00-05:00", 72.0, 60.0, 77.0, 45.0),
            obs("2024-01-02T00:00:00-05:00", 50.0, 44.0, 52.0, 90.0),
            obs("2024-01-02T21:00:00-05:00", 48.0, 41.0, 49.0, 95.0),
            obs("2024-01-03T12:00:00-05:00", 58.0, 57.0, 59.0, 60.0),
        ])
    }

    #[test]
    fn daily_of_empty_forecast_is_empty() {
        assert!(Forecast::default().daily().is_empty());
    }

    #[test]
    fn single_day_yields_one_summary() {
        let forecast = Forecast::new(vec![
            at("2024-03-10T00:00:00+00:00"),
            at("2024-03-10T12:00:00+00:00"),
            at("2024-03-10T23:59:59+00:00"),
        ]);

        let daily = forecast.daily();

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, DateTime::parse_from_rfc3339("2024-03-10T00:00:00+00:00").unwrap());
    }

    #[test]
    fn daily_is_sorted_regardless_of_input_order() {
        let forecast = Forecast::new(vec![
            at("2024-01-03T09:00:00+00:00"),
            at("2024-01-01T09:00:00+00:00"),
            at("2024-01-02T09:00:00+00:00"),
        ]);

        let days: Vec<NaiveDate> = forecast.daily().iter().map(|s| s.date.date_naive()).collect();

        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn summary_takes_extremes_of_min_and_max_fields() {
        let forecast = Forecast::new(vec![
            obs("2024-06-01T06:00:00+00:00", 60.0, 50.0, 70.0, 40.0),
            obs("2024-06-01T12:00:00+00:00", 99.0, 48.0, 75.0, 40.0),
            obs("2024-06-01T18:00:00+00:00", 10.0, 55.0, 68.0, 40.0),
        ]);

        let daily = forecast.daily();

        assert_eq!(daily[0].temperature_max, 75.0);
        assert_eq!(daily[0].temperature_min, 48.0);
    }

    #[test]
    fn summary_averages_temperature_and_humidity() {
        let forecast = Forecast::new(vec![
            obs("2024-06-01T06:00:00+00:00", 60.0, 0.0, 0.0, 40.0),
            obs("2024-06-01T18:00:00+00:00", 70.0, 0.0, 0.0, 60.0),
        ]);

        let daily = forecast.daily();

        assert_eq!(daily[0].temperature, 65.0);
        assert_eq!(daily[0].humidity, 50.0);
    }

    #[test]
    fn summaries_are_computed_per_day() {
        let daily = sample().daily();

        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].temperature_max, 77.0);
        assert_eq!(daily[0].temperature_min, 55.0);
        assert_eq!(daily[0].temperature, 66.5);
        assert_eq!(daily[0].humidity, 62.5);
        assert_eq!(daily[1].temperature_max, 52.0);
        assert_eq!(daily[1].temperature_min, 41.0);
        assert_eq!(daily[1].temperature, 49.0);
        assert_eq!(daily[2].humidity, 60.0);
    }

    #[test]
    fn day_is_taken_in_the_observation_offset() {
        // 23:30 in New York is already the next day in UTC.
        let forecast = Forecast::new(vec![
            at("2024-01-01T23:30:00-05:00"),
            at("2024-01-02T00:30:00-05:00"),
        ]);

        let days: Vec<NaiveDate> = forecast.by_day().into_keys().collect();

        assert_eq!(
            days,
            vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()]
        );
    }

    #[test]
    fn summaries_use_the_first_observation_offset() {
        let forecast = Forecast::new(vec![
            at("2024-01-01T10:00:00+02:00"),
            at("2024-01-02T10:00:00-05:00"),
        ]);

        let daily = forecast.daily();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(daily.len(), 2);
        assert_eq!(*daily[1].date.offset(), plus_two);
        assert_eq!(daily[1].date, DateTime::parse_from_rfc3339("2024-01-02T00:00:00+02:00").unwrap());
    }

    #[test]
    fn buckets_partition_the_forecast() {
        let forecast = sample();
        let days = forecast.by_day();

        let total: usize = days.values().map(|d| d.len()).sum();
        assert_eq!(total, forecast.len());

        for (day, members) in &days {
            assert!(!members.is_empty());
            assert!(members.iter().all(|o| day_key(o) == *day));
        }
    }

    #[test]
    fn buckets_keep_input_order() {
        let forecast = Forecast::new(vec![
            obs("2024-01-01T18:00:00+00:00", 3.0, 0.0, 0.0, 0.0),
            obs("2024-01-02T18:00:00+00:00", 9.0, 0.0, 0.0, 0.0),
            obs("2024-01-01T06:00:00+00:00", 1.0, 0.0, 0.0, 0.0),
        ]);

        let days = forecast.by_day();
        let first = days.values().next().unwrap();
        let temps: Vec<f64> = first.iter().map(|o| o.temperature).collect();

        assert_eq!(temps, vec![3.0, 1.0]);
    }

    #[test]
    fn summary_count_matches_distinct_days() {
        let forecast = sample();
        let distinct: HashSet<NaiveDate> = forecast.iter().map(day_key).collect();

        assert_eq!(forecast.daily().len(), distinct.len());
    }

    #[test]
    fn duplicate_timestamps_are_kept() {
        let forecast = Forecast::new(vec![
            obs("2024-01-01T12:00:00+00:00", 10.0, 0.0, 0.0, 0.0),
            obs("2024-01-01T12:00:00+00:00", 20.0, 0.0, 0.0, 0.0),
        ]);

        assert_eq!(forecast.by_day().values().next().unwrap().len(), 2);
        assert_eq!(forecast.daily()[0].temperature, 15.0);
    }

    #[test]
    fn daily_is_idempotent() {
        let daily = sample().daily();

        assert_eq!(daily.daily(), daily);
    }

    #[test]
    fn daily_does_not_modify_input() {
        let forecast = sample();
        let before = forecast.clone();

        let _ = forecast.daily();

        assert_eq!(forecast, before);
    }

    #[test]
    fn reducers_return_sentinels_on_empty_forecast() {
        let empty = Forecast::default();

        assert_eq!(empty.maximum_temperature(), f64::NEG_INFINITY);
        assert_eq!(empty.minimum_temperature(), f64::INFINITY);
        assert!(empty.average_temperature().is_nan());
        assert!(empty.average_humidity().is_nan());
    }

    #[test]
    fn reducers_work_on_whole_forecast() {
        let forecast = sample();

        assert_eq!(forecast.maximum_temperature(), 77.0);
        assert_eq!(forecast.minimum_temperature(), 41.0);
        assert_eq!(forecast.average_temperature(), 57.8);
        assert_eq!(forecast.average_humidity(), 74.0);
    }
}
