use crate::feed::EarthquakeRecord;

/// Records currently on display.
///
/// Owned by the presentation side. The only mutation is [`QuakeList::replace_all`],
/// called once a load has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuakeList {
    records: Vec<EarthquakeRecord>,
}

impl QuakeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, records: Vec<EarthquakeRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EarthquakeRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EarthquakeRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[EarthquakeRecord] {
        &self.records
    }

    /// URL to open when the record at `index` is selected.
    pub fn detail_url(&self, index: usize) -> Option<&str> {
        self.get(index).map(EarthquakeRecord::detail_url)
    }
}
