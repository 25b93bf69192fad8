//! 商品管理

pub mod field;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
