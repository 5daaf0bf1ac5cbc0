use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use url::Url;
use uuid::Uuid;

use crate::filtering::{SearchRequest, SearchResult, build_condition};

/// Applies a partial update onto a stored record.
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge operation fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// Builds a new record belonging to `owner`.
pub trait IntoOwnedActiveModel<ActiveModelType> {
    fn into_owned_active_model(self, owner: Uuid) -> ActiveModelType;
}

/// A user-owned collection with CRUD and search over it.
///
/// Every operation is scoped to the owning user: a record that belongs to someone else is
/// reported exactly like one that does not exist.
#[async_trait]
pub trait CRUDResource: Sized + Send + Sync
where
    Self::EntityType: EntityTrait + Sync,
    Self::ActiveModelType: ActiveModelTrait + ActiveModelBehavior + Send + Sync,
    <Self::EntityType as EntityTrait>::Model: Sync + IntoActiveModel<Self::ActiveModelType>,
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + Copy + std::fmt::Debug + Send + Sync;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>;
    type CreateModel: IntoOwnedActiveModel<Self::ActiveModelType> + Send;
    type UpdateModel: MergeIntoActiveModel<Self::ActiveModelType> + Send + Sync;

    const ID_COLUMN: Self::ColumnType;
    const OWNER_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    /// API name of the column results are ordered by when the client does not say
    const DEFAULT_ORDER_FIELD: &'static str;

    /// Count and fetch one page of the owner's records matching `condition`.
    ///
    /// Both queries run in one transaction so the total always describes the rows returned.
    async fn get_page(
        db: &DatabaseConnection,
        owner: Uuid,
        condition: Condition,
        order_column: Self::ColumnType,
        order_direction: Order,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Self>, u64), DbErr> {
        let condition = Condition::all()
            .add(Self::OWNER_COLUMN.eq(owner))
            .add(condition);

        let txn = db.begin().await?;
        let total = Self::EntityType::find()
            .filter(condition.clone())
            .count(&txn)
            .await?;
        // Past the last row; OFFSET may not even fit the backend's integer type
        let models = if offset >= total {
            Vec::new()
        } else {
            Self::EntityType::find()
                .filter(condition)
                .order_by(order_column, order_direction)
                .order_by(Self::ID_COLUMN, Order::Asc)
                .offset(offset)
                .limit(limit)
                .all(&txn)
                .await?
        };
        txn.commit().await?;

        tracing::debug!(
            resource = Self::RESOURCE_NAME_PLURAL,
            total,
            returned = models.len(),
            offset,
            "Fetched page"
        );
        Ok((models.into_iter().map(Self::from).collect(), total))
    }

    /// Run a validated search over the owner's records and wrap the page in its envelope.
    ///
    /// `url` is the request URL the navigation links are derived from.
    async fn search(
        db: &DatabaseConnection,
        owner: Uuid,
        request: &SearchRequest,
        url: &Url,
    ) -> Result<SearchResult<Self>, DbErr> {
        let condition = build_condition(
            &request.filter,
            &Self::filterable_columns(),
            &Self::fulltext_searchable_columns(),
            request.search.as_deref(),
        );
        let (order_column, order_direction) = request
            .order_by
            .resolve(&Self::sortable_columns(), Self::default_order_column());

        let (rows, total) = Self::get_page(
            db,
            owner,
            condition,
            order_column,
            order_direction,
            request.offset(),
            request.size,
        )
        .await?;

        Ok(SearchResult::new(rows, request.page, request.size, total, url))
    }

    async fn get_one(db: &DatabaseConnection, owner: Uuid, id: Uuid) -> Result<Self, DbErr> {
        Self::find_owned(db, owner, id).await.map(Self::from)
    }

    async fn create(
        db: &DatabaseConnection,
        owner: Uuid,
        create_model: Self::CreateModel,
    ) -> Result<Self, DbErr> {
        let active_model = create_model.into_owned_active_model(owner);
        let model = active_model.insert(db).await?;
        Ok(Self::from(model))
    }

    async fn update(
        db: &DatabaseConnection,
        owner: Uuid,
        id: Uuid,
        update_model: Self::UpdateModel,
    ) -> Result<Self, DbErr> {
        let model = Self::find_owned(db, owner, id).await?;
        let existing: Self::ActiveModelType = model.into_active_model();
        let updated = update_model.merge_into_activemodel(existing)?.update(db).await?;
        Ok(Self::from(updated))
    }

    /// Delete one of the owner's records, handing back what was removed.
    async fn delete(db: &DatabaseConnection, owner: Uuid, id: Uuid) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        let model = Self::find_owned(&txn, owner, id).await?;
        Self::EntityType::delete_many()
            .filter(Self::ID_COLUMN.eq(id))
            .filter(Self::OWNER_COLUMN.eq(owner))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(Self::from(model))
    }

    /// Load a record by id, treating records of other owners as missing.
    async fn find_owned<C>(
        db: &C,
        owner: Uuid,
        id: Uuid,
    ) -> Result<<Self::EntityType as EntityTrait>::Model, DbErr>
    where
        C: ConnectionTrait + Sync,
    {
        Self::EntityType::find()
            .filter(Self::ID_COLUMN.eq(id))
            .filter(Self::OWNER_COLUMN.eq(owner))
            .one(db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("{} not found", Self::RESOURCE_NAME_SINGULAR))
            })
    }

    /// Columns clients may order by, keyed by their API name
    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Columns clients may filter on, keyed by their API name
    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Text columns the free-text `search` parameter looks in.
    /// Default is empty - no fields are searched.
    #[must_use]
    fn fulltext_searchable_columns() -> Vec<Self::ColumnType> {
        vec![]
    }

    #[must_use]
    fn default_order_column() -> Self::ColumnType {
        Self::sortable_columns()
            .into_iter()
            .find(|(name, _)| *name == Self::DEFAULT_ORDER_FIELD)
            .map_or(Self::ID_COLUMN, |(_, column)| column)
    }

    #[must_use]
    fn filter_fields() -> Vec<&'static str> {
        Self::filterable_columns().into_iter().map(|(name, _)| name).collect()
    }

    #[must_use]
    fn order_fields() -> Vec<&'static str> {
        Self::sortable_columns().into_iter().map(|(name, _)| name).collect()
    }
}
