use crate::core::patterns::PatternTable;

pub struct LocationResolver {
    table: PatternTable,
}

impl LocationResolver {
    pub fn new(table: PatternTable) -> Self {
        Self { table }
    }

    /// First district whose matcher occurs anywhere in `text`, or `None`.
    pub fn resolve(&self, text: &str) -> Option<&str> {
        let district = self
            .table
            .entries()
            .iter()
            .find(|entry| entry.matches(text))
            .map(|entry| entry.district.as_str());

        tracing::debug!("Resolved {:?} to {:?}", text, district);
        district
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }
}
