// realco-core/src/ports/mod.rs

pub mod warehouse;

pub use warehouse::{
    ConnectParams, ExecuteOptions, SqlRow, WarehouseConnection, WarehouseDriver,
    WarehouseSession, WarehouseStatement,
};
