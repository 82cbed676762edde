//! [`ActorEntity`] implementation for [`Account`].

use super::AccountError;
use crate::model::{Account, AccountCreate, AccountId, AccountUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

fn validated_name(name: String) -> Result<String, AccountError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AccountError::ValidationError(
            "account name must not be blank".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl ActorEntity for Account {
    type Id = AccountId;
    type Create = AccountCreate;
    type Update = AccountUpdate;
    type Context = ();
    type Error = AccountError;

    fn from_create_params(id: AccountId, params: AccountCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: validated_name(params.name)?,
        })
    }

    async fn on_update(
        &mut self,
        update: AccountUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        self.name = validated_name(update.name)?;
        Ok(())
    }
}
