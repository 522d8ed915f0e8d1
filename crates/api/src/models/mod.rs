//! Domain models for the catalog API.
//!
//! Each resource gets a read model (what handlers serialize back to
//! clients, camelCase on the wire to match the public API) plus explicit
//! `Create*Input`/`Update*Input` request structs validated at the boundary.

pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use order::{
    CreateOrderInput, Order, OrderDetail, OrderItemDetail, OrderItemInput, OrderUser,
    UpdateOrderStatusInput,
};
pub use product::{
    CreateProductInput, Product, ProductNameDescription, ProductWithCategory, UpdateProductInput,
};
pub use user::{LoginInput, LoginResponse, RegisterUserInput, User};
