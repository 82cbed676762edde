//! [`ActorEntity`] implementation for [`Product`].

use super::ProductError;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn validated_name(name: &str) -> Result<String, ProductError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ProductError::ValidationError(
            "product name must not be blank".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validated_price(price: Decimal) -> Result<Decimal, ProductError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ProductError::ValidationError(format!(
            "price must not be negative, got {price}"
        )));
    }
    Ok(price)
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: validated_name(&params.name)?,
            description: params.description,
            price: validated_price(params.price)?,
        })
    }

    /// Applies a partial update. Every field is validated before any is written.
    async fn on_update(
        &mut self,
        update: ProductUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        let name = update.name.as_deref().map(validated_name).transpose()?;
        let price = update.price.map(validated_price).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        Ok(())
    }
}
