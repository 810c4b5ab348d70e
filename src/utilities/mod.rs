pub mod building;
pub mod car_status;
pub mod config;
pub mod debug;
pub mod direction;
pub mod error;
pub mod events;
pub mod request;
pub mod request_queues;
