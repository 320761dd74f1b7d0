/// Opaque shard identifier used by shard stores.
/// Examples: `2016a`, `batch_07`
pub type ShardId = String;
/// Raw record field name.
/// Examples: `budget`, `genre`, `released`
pub type FieldName = String;
/// One category string inside a list-valued field.
/// Examples: `Action`, `English`, `Warner Bros.`
pub type CategoryName = String;
/// Feature matrix column name.
/// Examples: `budget`, `genre=Drama`, `country=France`
pub type ColumnName = String;
/// Numeric prediction target extracted from a record.
pub type Label = f64;
