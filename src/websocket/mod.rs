pub mod gateway;
pub mod handler;
pub mod hub;
pub mod message;
pub mod session;

pub use gateway::{Gateway, RoomInfo};
pub use hub::Hub;
pub use message::{ClientEvent, ServerEvent};
pub use session::Session;
