//! A single purchase: money from a person to an industry, product stock
//! down by the quantity bought.

use mercat_types::{Industry, IndustryId, Person, PersonId, ProblemId, Resource, ResourceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// The buyer.
    pub person: PersonId,
    /// The seller.
    pub industry: IndustryId,
    /// The product bought.
    pub product: ResourceId,
    /// The need the purchase addressed.
    pub problem: ProblemId,
    /// Units bought.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total_cost: Decimal,
}

/// Execute a purchase of `quantity` units of `product` at `unit_price`.
///
/// Returns the total cost. Nothing changes unless every check passes.
///
/// # Errors
///
/// Returns [`MarketError::NotProduced`] when the industry does not list the
/// product as an output, [`MarketError::OutOfStock`] or
/// [`MarketError::InsufficientFunds`] when the trade cannot be covered, and
/// [`MarketError::InvalidAmount`] for a negative quantity or price.
pub fn execute_purchase(
    person: &mut Person,
    industry: &mut Industry,
    product: &mut Resource,
    quantity: Decimal,
    unit_price: Decimal,
) -> Result<Decimal, MarketError> {
    if quantity < Decimal::ZERO {
        return Err(MarketError::InvalidAmount {
            field: "quantity",
            value: quantity,
        });
    }
    if unit_price < Decimal::ZERO {
        return Err(MarketError::InvalidAmount {
            field: "unit price",
            value: unit_price,
        });
    }
    if !industry.outputs.contains(&product.id) {
        return Err(MarketError::NotProduced {
            industry: industry.name.clone(),
            product: product.name.clone(),
        });
    }
    if product.quantity < quantity {
        return Err(MarketError::OutOfStock {
            product: product.name.clone(),
            requested: quantity,
            available: product.quantity,
        });
    }

    let cost = quantity
        .checked_mul(unit_price)
        .ok_or(MarketError::ArithmeticOverflow)?;
    if person.money < cost {
        return Err(MarketError::InsufficientFunds {
            buyer: person.name.clone(),
            cost,
            available: person.money,
        });
    }

    let buyer_after = person
        .money
        .checked_sub(cost)
        .ok_or(MarketError::ArithmeticOverflow)?;
    let seller_after = industry
        .money
        .checked_add(cost)
        .ok_or(MarketError::ArithmeticOverflow)?;
    let stock_after = product
        .quantity
        .checked_sub(quantity)
        .ok_or(MarketError::ArithmeticOverflow)?;

    person.money = buyer_after;
    industry.money = seller_after;
    product.quantity = stock_after;
    Ok(cost)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mercat_types::{NewIndustry, NewPerson, NewResource};
    use rust_decimal_macros::dec;

    use super::*;

    fn setup(money: Decimal, stock: Decimal) -> (Person, Industry, Resource) {
        let person = Person::new(
            PersonId(1),
            NewPerson {
                name: "Person-1".to_owned(),
                money,
                labor_hours: dec!(8),
                segments: Vec::new(),
            },
        );
        let industry = Industry::new(
            IndustryId(1),
            NewIndustry {
                name: "Agriculture".to_owned(),
                labor_needed: 4,
                initial_capital: dec!(1000),
                solved_problems: vec![ProblemId(1)],
                inputs: Vec::new(),
                outputs: vec![ResourceId(1)],
            },
        );
        let mut product = Resource::new(ResourceId(1), NewResource::product("Food", "kg"));
        product.quantity = stock;
        (person, industry, product)
    }

    #[test]
    fn purchase_moves_money_and_stock() {
        let (mut person, mut industry, mut product) = setup(dec!(100), dec!(1));

        let cost = execute_purchase(&mut person, &mut industry, &mut product, dec!(1), dec!(50));

        assert_eq!(cost.ok(), Some(dec!(50)));
        assert_eq!(person.money, dec!(50));
        assert_eq!(industry.money, dec!(1050));
        assert_eq!(product.quantity, Decimal::ZERO);
    }

    #[test]
    fn second_purchase_fails_for_stock() {
        let (mut person, mut industry, mut product) = setup(dec!(100), dec!(1));
        execute_purchase(&mut person, &mut industry, &mut product, dec!(1), dec!(50)).unwrap();

        let again = execute_purchase(&mut person, &mut industry, &mut product, dec!(1), dec!(50));

        assert!(matches!(again, Err(MarketError::OutOfStock { .. })));
        assert_eq!(person.money, dec!(50));
        assert_eq!(industry.money, dec!(1050));
    }

    #[test]
    fn poor_buyer_is_rejected() {
        let (mut person, mut industry, mut product) = setup(dec!(49.99), dec!(5));

        let result = execute_purchase(&mut person, &mut industry, &mut product, dec!(1), dec!(50));

        assert!(result.as_ref().is_err_and(MarketError::is_rejection));
        assert_eq!(product.quantity, dec!(5));
        assert_eq!(person.money, dec!(49.99));
    }

    #[test]
    fn foreign_product_is_rejected() {
        let (mut person, mut industry, _) = setup(dec!(100), dec!(5));
        let mut other = Resource::new(ResourceId(2), NewResource::product("Wellness", "visits"));
        other.quantity = dec!(5);

        let result = execute_purchase(&mut person, &mut industry, &mut other, dec!(1), dec!(50));

        assert!(matches!(result, Err(MarketError::NotProduced { .. })));
        assert!(!result.as_ref().is_err_and(MarketError::is_rejection));
    }
}
