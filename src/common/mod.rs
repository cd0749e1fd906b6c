// Helpers shared by every normalizer
pub mod time_format;
