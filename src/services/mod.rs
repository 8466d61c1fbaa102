//! Business logic services for the ReWear backend

pub mod item_service;
pub mod points_service;
pub mod swap_service;

pub use item_service::ItemService;
pub use points_service::PointsService;
pub use swap_service::SwapService;
