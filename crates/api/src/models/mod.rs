//! Domain models serialised to JSON responses.
//!
//! Models derive `sqlx::FromRow` where they map one-to-one onto a query's
//! column list. Nested response shapes (an order with its items, a loyalty
//! product with its product) are plain `Serialize` structs assembled in the
//! repositories.
//!
//! All JSON output is camelCase.

pub mod catalog;
pub mod coupon;
pub mod loyalty;
pub mod misc;
pub mod order;
pub mod procurement;
pub mod user;

pub use catalog::{Category, CategoryWithCount, CategoryWithProducts, Product};
pub use coupon::Coupon;
pub use loyalty::{
    LoyaltyProduct, LoyaltyProductWithProduct, LoyaltyRedemption, LoyaltySettings,
    RedemptionWithDetails,
};
pub use misc::{BankAccount, DeliveryZone, Message, ProductRecipe, SiteSettings, SupportInfo};
pub use order::{Order, OrderItemWithProduct, OrderWithItems};
pub use procurement::{Procurement, ProcurementItemWithProduct, ProcurementWithItems};
pub use user::{User, UserWithOrderCount};
