pub mod autocomplete;

pub use autocomplete::Autocomplete;
