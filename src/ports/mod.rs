pub mod geocoder;
