
/// Backend DTO decoding and validation tests
pub mod dto_tests;
