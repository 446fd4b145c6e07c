use chrono::{DateTime, Utc};
use quakecore::{EarthquakeRecord, QuakeList};
use serde::{Deserialize, Serialize};

const LOCATION_SEPARATOR: &str = " of ";
const NEAR_THE: &str = "Near the";

/// Display-ready projection of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub index: usize,
    pub magnitude: String,
    pub location_offset: String,
    pub primary_location: String,
    pub date: String,
    pub time: String,
    pub detail_url: String,
}

/// What the display layer receives for the current list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListingModel {
    pub entries: Vec<ListingEntry>,
}

impl ListingModel {
    pub fn from_list(list: &QuakeList) -> Self {
        Self {
            entries: list
                .iter()
                .enumerate()
                .map(|(index, record)| ListingEntry::from_record(index, record))
                .collect(),
        }
    }

    pub fn render_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:>3}  {:>4}  {:<22} {:<40} {} {}",
                    entry.index,
                    entry.magnitude,
                    entry.location_offset,
                    entry.primary_location,
                    entry.date,
                    entry.time
                )
            })
            .collect()
    }
}

impl ListingEntry {
    pub fn from_record(index: usize, record: &EarthquakeRecord) -> Self {
        let (location_offset, primary_location) = split_location(record.location());
        let (date, time) = format_timestamp(record.time_epoch_millis());
        Self {
            index,
            magnitude: format!("{:.1}", record.magnitude()),
            location_offset,
            primary_location,
            date,
            time,
            detail_url: record.detail_url().to_string(),
        }
    }
}

/// Splits `"10km SW of Testville"` into `("10km SW of", "Testville")`.
fn split_location(place: &str) -> (String, String) {
    match place.split_once(LOCATION_SEPARATOR) {
        Some((offset, primary)) => (format!("{offset} of"), primary.to_string()),
        None => (NEAR_THE.to_string(), place.to_string()),
    }
}

fn format_timestamp(millis: i64) -> (String, String) {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(moment) => (
            moment.format("%b %-d, %Y").to_string(),
            moment.format("%-I:%M %p").to_string(),
        ),
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_splits_offset_from_place() {
        let record = EarthquakeRecord::new(
            6.5,
            "10km SW of Testville",
            1609459200000,
            "https://example.com/eq/1",
        );
        let entry = ListingEntry::from_record(0, &record);
        assert_eq!(entry.location_offset, "10km SW of");
        assert_eq!(entry.primary_location, "Testville");
        assert_eq!(entry.magnitude, "6.5");
        assert_eq!(entry.date, "Jan 1, 2021");
        assert_eq!(entry.time, "12:00 AM");
    }

    #[test]
    fn place_without_offset_is_near_the() {
        let record = EarthquakeRecord::new(7.0, "Pacific-Antarctic Ridge", 0, "https://x");
        let entry = ListingEntry::from_record(3, &record);
        assert_eq!(entry.location_offset, "Near the");
        assert_eq!(entry.primary_location, "Pacific-Antarctic Ridge");
        assert_eq!(entry.magnitude, "7.0");
        assert_eq!(entry.index, 3);
    }

    #[test]
    fn model_keeps_list_order() {
        let mut list = QuakeList::new();
        list.replace_all(vec![
            EarthquakeRecord::new(6.1, "b", 0, "https://b"),
            EarthquakeRecord::new(6.9, "a", 0, "https://a"),
        ]);
        let model = ListingModel::from_list(&list);
        let urls: Vec<_> = model.entries.iter().map(|e| e.detail_url.as_str()).collect();
        assert_eq!(urls, vec!["https://b", "https://a"]);
        assert_eq!(model.render_lines().len(), 2);
    }
}
