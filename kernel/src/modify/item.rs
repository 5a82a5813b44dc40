use crate::entity::Item;
use crate::KernelError;

#[async_trait::async_trait]
pub trait ItemModifier<Connection: Send>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        item: &Item,
    ) -> error_stack::Result<(), KernelError>;

    async fn update(
        &self,
        con: &mut Connection,
        item: &Item,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnItemModifier<Connection: Send>: 'static + Sync + Send {
    type ItemModifier: ItemModifier<Connection>;
    fn item_modifier(&self) -> &Self::ItemModifier;
}
