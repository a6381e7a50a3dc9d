//! SeaORM entity definitions for the garment trading domain.

pub mod bill;
pub mod bill_item;
pub mod bill_payment;
pub mod city;
pub mod inward;
pub mod inward_item;
pub mod item;
pub mod party;
pub mod state;
pub mod user;
pub mod vendor;
pub mod vendor_payment;
