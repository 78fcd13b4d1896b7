use api_types::user::{UserNew, UserSearch, UserUpdate};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, Audit, EngineError, Page, PageRequest, ResultEngine, RoleName, User,
    query::{contains_ignore_case, search_term},
    users,
};

use super::{
    Engine, normalize_optional_text, normalize_required_name, page_of, unique_violation, with_tx,
};

const ORDER_FIELDS: &[(&str, users::Column)] = &[
    ("name", users::Column::Name),
    ("email", users::Column::Email),
    ("phone", users::Column::Phone),
    ("roleName", users::Column::RoleName),
    ("createdAt", users::Column::CreatedAt),
    ("updatedAt", users::Column::UpdatedAt),
];

/// Longest accepted password, in characters.
const MAX_PASSWORD_LEN: usize = 100;

fn hash_password(password: &str) -> ResultEngine<String> {
    if password.is_empty() {
        return Err(EngineError::InvalidInput(
            "password must not be empty".to_string(),
        ));
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(EngineError::InvalidInput(format!(
            "password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EngineError::PasswordHash(e.to_string()))
}

fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    if email.is_empty() {
        return Err(EngineError::InvalidInput(
            "email must not be empty".to_string(),
        ));
    }
    Ok(email)
}

/// Only a super admin can hand out the super admin role.
fn ensure_can_grant(actor: &Actor, role: RoleName) -> ResultEngine<()> {
    if role == RoleName::SuperAdmin && actor.role != RoleName::SuperAdmin {
        return Err(EngineError::Forbidden(
            "only a super admin can grant SUPER_ADMIN_ROLE".to_string(),
        ));
    }
    Ok(())
}

/// Only a super admin can change or remove a super admin account.
fn ensure_can_manage(actor: &Actor, target: &User) -> ResultEngine<()> {
    if target.role == RoleName::SuperAdmin && actor.role != RoleName::SuperAdmin {
        tracing::warn!(user_id = %target.audit.id, actor = %actor.user_id, "super admin change rejected");
        return Err(EngineError::Forbidden(
            "only a super admin can change a super admin".to_string(),
        ));
    }
    Ok(())
}

fn user_keys(user: &User) -> [(&str, Option<&str>); 2] {
    [
        ("email", Some(user.email.as_str())),
        ("phone", user.phone.as_deref()),
    ]
}

impl Engine {
    /// All active users, most recently updated first.
    pub async fn users(&self) -> ResultEngine<Vec<User>> {
        users::Entity::find()
            .filter(users::Column::IsActive.eq(true))
            .order_by_desc(users::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    pub async fn users_page(
        &self,
        search: &UserSearch,
        request: &PageRequest,
    ) -> ResultEngine<Page<User>> {
        let condition = Condition::all()
            .add(users::Column::IsActive.eq(true))
            .add_option(
                search_term(search.name.as_deref())
                    .map(|s| contains_ignore_case(users::Entity, users::Column::Name, s)),
            )
            .add_option(
                search_term(search.email.as_deref())
                    .map(|s| contains_ignore_case(users::Entity, users::Column::Email, s)),
            )
            .add_option(
                search_term(search.phone.as_deref())
                    .map(|s| contains_ignore_case(users::Entity, users::Column::Phone, s)),
            )
            .add_option(
                search
                    .role_name
                    .map(|role| users::Column::RoleName.eq(RoleName::from(role).as_str())),
            );
        let order = request.order_column(ORDER_FIELDS, users::Column::UpdatedAt);
        let (rows, count) = page_of::<users::Entity, _>(&self.database, condition, request, order).await?;
        Ok(Page {
            data: rows
                .into_iter()
                .map(User::try_from)
                .collect::<ResultEngine<_>>()?,
            count,
            page: request.page,
            limit: request.limit,
        })
    }

    pub async fn user(&self, id: Uuid) -> ResultEngine<User> {
        User::try_from(self.require_user(&self.database, id).await?)
    }

    /// Creates a user. The role defaults to `EDITOR_ROLE`.
    pub async fn new_user(&self, input: &UserNew, actor: &Actor) -> ResultEngine<User> {
        let role = input.role_name.map(RoleName::from).unwrap_or_default();
        ensure_can_grant(actor, role)?;
        let user = User {
            audit: Audit::new(actor),
            name: normalize_required_name(&input.name, "user")?,
            email: normalize_email(&input.email)?,
            phone: normalize_optional_text(input.phone.as_deref()),
            role,
            password_hash: hash_password(&input.password)?,
        };

        with_tx!(self, |db_tx| {
            self.ensure_unique_user(&db_tx, &user).await?;
            let model: users::ActiveModel = (&user).into();
            model
                .insert(&db_tx)
                .await
                .map_err(|err| unique_violation(err, &user_keys(&user)))?;
            tracing::info!(user_id = %user.audit.id, role = user.role.as_str(), "user created");
            Ok(user)
        })
    }

    /// Applies the fields present in `input`. A new password is re-hashed.
    pub async fn update_user(
        &self,
        id: Uuid,
        input: &UserUpdate,
        actor: &Actor,
    ) -> ResultEngine<User> {
        if let Some(role) = input.role_name {
            ensure_can_grant(actor, role.into())?;
        }
        let password_hash = input.password.as_deref().map(hash_password).transpose()?;

        with_tx!(self, |db_tx| {
            let mut user = User::try_from(self.require_user(&db_tx, id).await?)?;
            ensure_can_manage(actor, &user)?;
            if let Some(name) = &input.name {
                user.name = normalize_required_name(name, "user")?;
            }
            if let Some(email) = &input.email {
                user.email = normalize_email(email)?;
            }
            if let Some(phone) = &input.phone {
                user.phone = normalize_optional_text(Some(phone));
            }
            if let Some(role) = input.role_name {
                user.role = role.into();
            }
            if let Some(hash) = password_hash {
                user.password_hash = hash;
            }
            user.audit.touch(actor);

            self.ensure_unique_user(&db_tx, &user).await?;
            let model: users::ActiveModel = (&user).into();
            model
                .update(&db_tx)
                .await
                .map_err(|err| unique_violation(err, &user_keys(&user)))?;
            Ok(user)
        })
    }

    /// Soft-deletes a user.
    pub async fn remove_user(&self, id: Uuid, actor: &Actor) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let mut user = User::try_from(self.require_user(&db_tx, id).await?)?;
            ensure_can_manage(actor, &user)?;
            user.audit.deactivate(actor);
            let model: users::ActiveModel = (&user).into();
            model.update(&db_tx).await?;
            tracing::info!(user_id = %id, "user deactivated");
            Ok(true)
        })
    }

    /// Checks credentials. `login` is an email when it contains `@`,
    /// otherwise a phone number. Inactive users cannot log in.
    pub async fn authenticate(&self, login: &str, password: &str) -> ResultEngine<User> {
        let login = login.trim();
        let column_filter = if login.contains('@') {
            users::Column::Email.eq(login.to_lowercase())
        } else {
            users::Column::Phone.eq(login)
        };
        let model = users::Entity::find()
            .filter(column_filter)
            .filter(users::Column::IsActive.eq(true))
            .one(&self.database)
            .await?;

        match model {
            Some(model) if verify_password(&model.password, password) => User::try_from(model),
            _ => {
                tracing::debug!("rejected credentials");
                Err(EngineError::Unauthorized("invalid credentials".to_string()))
            }
        }
    }

    /// Replaces the password of the active user with `email`.
    pub async fn set_user_password(
        &self,
        email: &str,
        password: &str,
        actor: &Actor,
    ) -> ResultEngine<()> {
        let email = normalize_email(email)?;
        let password_hash = hash_password(password)?;
        with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .filter(users::Column::IsActive.eq(true))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("User Not Found!!".to_string()))?;
            let mut user = User::try_from(model)?;
            ensure_can_manage(actor, &user)?;
            user.password_hash = password_hash;
            user.audit.touch(actor);
            let model: users::ActiveModel = (&user).into();
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Email and phone are unique across every row, soft-deleted ones included.
    async fn ensure_unique_user<C: ConnectionTrait>(&self, db: &C, user: &User) -> ResultEngine<()> {
        let id = user.audit.id.to_string();
        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(user.email.clone()))
            .filter(users::Column::Id.ne(id.clone()))
            .one(db)
            .await?
            .is_some();
        if email_taken {
            return Err(EngineError::ExistingKey(user.email.clone()));
        }
        if let Some(phone) = &user.phone {
            let phone_taken = users::Entity::find()
                .filter(users::Column::Phone.eq(phone.clone()))
                .filter(users::Column::Id.ne(id))
                .one(db)
                .await?
                .is_some();
            if phone_taken {
                return Err(EngineError::ExistingKey(phone.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "s3cret"));
        assert!(!verify_password(&hash, "secret"));
        assert!(!verify_password("not-a-hash", "s3cret"));
    }

    #[test]
    fn passwords_longer_than_the_limit_are_rejected() {
        let long = "x".repeat(MAX_PASSWORD_LEN + 1);
        assert!(matches!(
            hash_password(&long),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(hash_password(&"é".repeat(MAX_PASSWORD_LEN)).is_ok());
    }

    #[test]
    fn admins_cannot_grant_super_admin() {
        let admin = Actor {
            user_id: "a".to_string(),
            role: RoleName::Admin,
        };
        assert!(matches!(
            ensure_can_grant(&admin, RoleName::SuperAdmin),
            Err(EngineError::Forbidden(_))
        ));
        assert!(ensure_can_grant(&admin, RoleName::Editor).is_ok());
        assert!(ensure_can_grant(&Actor::system(), RoleName::SuperAdmin).is_ok());
    }
}
