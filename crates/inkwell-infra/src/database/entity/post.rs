//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::Post;
use inkwell_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub excerpt: Option<String>,
    pub status: String,
    pub views: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post. Category and status are stored
/// as their lowercase names; anything else is a corrupt row.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let category = model
            .category
            .parse()
            .map_err(|_| corrupt(model.id, "category", &model.category))?;
        let status = model
            .status
            .parse()
            .map_err(|_| corrupt(model.id, "status", &model.status))?;

        Ok(Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            category,
            slug: model.slug,
            excerpt: model.excerpt,
            status,
            views: u64::try_from(model.views).unwrap_or(0),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            content: Set(post.content),
            category: Set(post.category.as_str().to_string()),
            slug: Set(post.slug),
            excerpt: Set(post.excerpt),
            status: Set(post.status.as_str().to_string()),
            views: Set(i64::try_from(post.views).unwrap_or(i64::MAX)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

fn corrupt(id: Uuid, column: &str, value: &str) -> RepoError {
    RepoError::Query(format!(
        "post {} has unrecognized {} '{}'",
        id, column, value
    ))
}
