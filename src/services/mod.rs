pub mod audio;
pub mod collocations;
pub mod deck_builder;
pub mod failure_writer;
pub mod html_renderer;
pub mod meanings;
pub mod synonyms;

pub use audio::AudioDownloader;
pub use collocations::CollocationScraper;
pub use deck_builder::{DeckBuilder, DeckSummary};
pub use failure_writer::FailureWriter;
pub use html_renderer::render_card;
pub use meanings::MeaningScraper;
pub use synonyms::SynonymScraper;
