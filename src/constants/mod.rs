pub mod durations;
pub mod embeds;
