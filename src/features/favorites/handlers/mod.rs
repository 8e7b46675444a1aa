pub mod favorite_city_handler;
