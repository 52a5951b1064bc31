use crate::domain::model::Row;
use crate::utils::error::Result;

/// Read side of the listings relation.
pub trait ListingSource {
    /// Rows where `key` equals `value`, projected onto `columns` in that order.
    fn query(&self, key: &str, value: &str, columns: &[&str]) -> Result<Vec<Row>>;
}

pub trait ConfigProvider {
    fn store_path(&self) -> &str;
    fn top_n(&self) -> usize;
    fn loop_mode(&self) -> bool;
    fn exit_words(&self) -> &[String];
}
