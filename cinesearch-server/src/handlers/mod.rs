pub mod genres;
pub mod health;
pub mod movies;
