pub mod postgrest;

pub use postgrest::PostgrestStore;
