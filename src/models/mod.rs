mod cart;
mod checkout;
mod product;
mod user;

pub use cart::*;
pub use checkout::*;
pub use product::*;
pub use user::*;
