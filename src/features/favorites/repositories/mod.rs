mod favorite_city_repository;

pub use favorite_city_repository::{FavoriteCityRepository, PgFavoriteCityRepository};
