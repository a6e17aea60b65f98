pub mod card;
pub mod loaders;
pub mod tag;
pub mod word;

pub use card::{CardModel, CardRow};
pub use loaders::{load_card_rows, load_word_list, CardWriter};
pub use tag::{derive_tags, WordTag};
pub use word::{Collocation, DictionarySection, Meaning, Sense, Synonym, WordData, WordEntry};
