pub mod genre_cache;

pub use genre_cache::GenreCache;
