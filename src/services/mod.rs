//! Typed per-resource services. Each service owns a handle to the connection
//! pool and exposes the operations its handler needs; totals and due amounts
//! are computed here, never trusted from the client.

pub mod inwards;
pub mod items;
pub mod locations;
pub mod outwards;
pub mod parties;
pub mod payments;
pub mod reports;
pub mod vendors;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

/// A quantity/price pair referencing a catalog item. Shared by inward and
/// outward bills.
#[derive(Debug, Clone)]
pub struct LineItemInput {
    pub item_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

/// Sum of `quantity * price` across line items.
pub fn line_items_total(items: &[LineItemInput]) -> Decimal {
    items
        .iter()
        .map(|line| Decimal::from(line.quantity) * line.price)
        .sum()
}

/// Aggregates the per-resource services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub vendors: vendors::VendorService,
    pub parties: parties::PartyService,
    pub items: items::ItemService,
    pub inwards: inwards::InwardService,
    pub outwards: outwards::OutwardService,
    pub payments: payments::PaymentService,
    pub locations: locations::LocationService,
    pub reports: reports::ReportService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            vendors: vendors::VendorService::new(db.clone()),
            parties: parties::PartyService::new(db.clone()),
            items: items::ItemService::new(db.clone()),
            inwards: inwards::InwardService::new(db.clone()),
            outwards: outwards::OutwardService::new(db.clone()),
            payments: payments::PaymentService::new(db.clone()),
            locations: locations::LocationService::new(db.clone()),
            reports: reports::ReportService::new(db),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: i32, price: Decimal) -> LineItemInput {
        LineItemInput {
            item_id: Uuid::new_v4(),
            quantity,
            price,
        }
    }

    #[test]
    fn total_is_sum_of_quantity_times_price() {
        let items = vec![
            line(2, dec!(100.50)),
            line(1, dec!(49.50)),
            line(3, dec!(10)),
        ];
        assert_eq!(line_items_total(&items), dec!(280.50));
    }

    #[test]
    fn empty_line_items_sum_to_zero() {
        assert_eq!(line_items_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_reflects_row_changes() {
        let mut items = vec![line(2, dec!(150)), line(1, dec!(200))];
        assert_eq!(line_items_total(&items), dec!(500));

        // editing a row recomputes the total
        items[0].quantity = 5;
        assert_eq!(line_items_total(&items), dec!(950));

        items.pop();
        assert_eq!(line_items_total(&items), dec!(750));
    }
}
