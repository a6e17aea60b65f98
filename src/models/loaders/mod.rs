pub mod csv_loader;

pub use csv_loader::{load_card_rows, load_word_list, CardWriter};
