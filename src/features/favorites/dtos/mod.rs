mod favorite_city_dto;

pub use favorite_city_dto::*;
