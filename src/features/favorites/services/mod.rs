mod favorite_city_service;

pub use favorite_city_service::FavoriteCityService;
