// Test module organization
pub mod test_accel;
pub mod test_api;
pub mod test_matcher;
pub mod test_ranges;
pub mod test_schema;
pub mod test_unicode;
