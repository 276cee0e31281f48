// src/client/cart.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    order::{CreateOrderPayload, OrderItemInput},
    product::Product,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * self.quantity
    }
}

/// Carrinho do comprador, mantido no cliente até o pedido ser enviado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona uma unidade. Produto repetido só aumenta a quantidade.
    pub fn add(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += Decimal::ONE,
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity: Decimal::ONE,
            }),
        }
    }

    /// Quantidade zero (ou negativa) remove a linha.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: Decimal) {
        if quantity <= Decimal::ZERO {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn to_order(&self, payment_method: Option<String>, delivery_address: Option<String>) -> CreateOrderPayload {
        CreateOrderPayload {
            items: self
                .lines
                .iter()
                .map(|l| OrderItemInput {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
            payment_method,
            delivery_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{order::order_total, product::ProductStatus};
    use chrono::Utc;

    fn product(name: &str, price: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            farmer_id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            category: None,
            price: Decimal::from(price),
            quantity: Decimal::from(50),
            unit: "kg".into(),
            harvest_date: None,
            photo_url: None,
            status: ProductStatus::Disponivel,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn adding_the_same_product_twice_bumps_the_quantity() {
        let milho = product("Milho", 25);
        let mut cart = Cart::new();
        cart.add(&milho);
        cart.add(&milho);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, Decimal::from(2));
        assert_eq!(cart.total(), Decimal::from(50));
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let feijao = product("Feijão", 40);
        let mut cart = Cart::new();
        cart.add(&feijao);
        cart.set_quantity(feijao.id, Decimal::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn order_payload_keeps_prices_and_total() {
        let milho = product("Milho", 25);
        let tomate = product("Tomate", 60);
        let mut cart = Cart::new();
        cart.add(&milho);
        cart.add(&tomate);
        cart.set_quantity(milho.id, Decimal::from(4));

        let order = cart.to_order(Some("mpesa".into()), Some("Beira".into()));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order_total(&order.items), Decimal::from(160));
        assert_eq!(order_total(&order.items), cart.total());
    }
}
