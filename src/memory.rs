//! In-memory repositories used by unit and router tests.

use std::sync::{Arc, Mutex};

use axum::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    forms::{
        domain::{group_by_owner, Form, OwnerProfile, UserWithForm, UserWithForms},
        repo::FormRepository,
    },
    users::{
        domain::{Role, User},
        repo::UserRepository,
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    forms: Vec<Form>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn seed_user(&self, user: User) -> User {
        self.tables.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn admin_count(&self) -> usize {
        let t = self.tables.lock().unwrap();
        t.users.iter().filter(|u| u.role == Role::Admin).count()
    }

    fn owner_of(t: &Tables, user_id: Uuid) -> Result<OwnerProfile, AppError> {
        t.users
            .iter()
            .find(|u| u.id == user_id)
            .map(OwnerProfile::from)
            .ok_or(AppError::UserNotFound)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::UserAlreadyExists);
        }
        if user.role == Role::Admin && t.users.iter().any(|u| u.role == Role::Admin) {
            return Err(AppError::Internal(anyhow::anyhow!("users_single_admin violated")));
        }
        t.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let t = self.tables.lock().unwrap();
        t.users.iter().find(|u| u.id == id).cloned().ok_or(AppError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        let t = self.tables.lock().unwrap();
        t.users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AppError::UserNotFound)
    }

    async fn find_admin(&self) -> Result<User, AppError> {
        let t = self.tables.lock().unwrap();
        t.users
            .iter()
            .find(|u| u.role == Role::Admin)
            .cloned()
            .ok_or(AppError::UserNotFound)
    }

    async fn find_all_by_role(&self, roles: &[Role]) -> Result<Vec<User>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().filter(|u| roles.contains(&u.role)).cloned().collect())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<User, AppError> {
        let mut t = self.tables.lock().unwrap();
        let user = t
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        user.is_active = is_active;
        Ok(user.clone())
    }

    async fn is_active(&self, id: Uuid) -> Result<bool, AppError> {
        let t = self.tables.lock().unwrap();
        t.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.is_active)
            .ok_or(AppError::UserNotFound)
    }
}

#[async_trait]
impl FormRepository for MemoryStore {
    async fn create(&self, form: &Form) -> Result<(), AppError> {
        self.tables.lock().unwrap().forms.push(form.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Form, AppError> {
        let t = self.tables.lock().unwrap();
        t.forms.iter().find(|f| f.id == id).cloned().ok_or(AppError::FormNotFound)
    }

    async fn find_by_id_with_user(&self, id: Uuid) -> Result<UserWithForm, AppError> {
        let t = self.tables.lock().unwrap();
        let form = t.forms.iter().find(|f| f.id == id).cloned().ok_or(AppError::FormNotFound)?;
        let user = Self::owner_of(&t, form.user_id)?;
        Ok(UserWithForm { user, form })
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Form>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.forms.iter().filter(|f| f.user_id == user_id).cloned().collect())
    }

    async fn find_all_with_users(&self) -> Result<Vec<UserWithForms>, AppError> {
        let t = self.tables.lock().unwrap();
        let pairs = t
            .forms
            .iter()
            .map(|f| Ok((Self::owner_of(&t, f.user_id)?, f.clone())))
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(group_by_owner(pairs))
    }

    async fn update_status(&self, form: &Form) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        let stored = t
            .forms
            .iter_mut()
            .find(|f| f.id == form.id)
            .ok_or(AppError::FormNotFound)?;
        stored.status = form.status;
        stored.approved_at = form.approved_at;
        Ok(())
    }
}
