pub mod models;
pub mod utils;

// Data model shared by the engine library and the dashboard binary.
// Everything here is plain data: parsing and reshaping live in `engine::data`.
