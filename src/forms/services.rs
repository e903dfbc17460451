//! Form workflow and role-scoped visibility.
//!
//! Staff (HR, admin) see every form together with its owner; employees see
//! only forms they own. Status transitions carry no ownership check and are
//! reachable only through staff routes.

use tracing::{info, warn};
use uuid::Uuid;

use super::{
    domain::{Form, FormStatus},
    dto::{FormCreateRequest, FormList, FormView},
    repo::FormRepository,
};
use crate::{auth::extractors::RequestContext, error::AppError, users::domain::Role};

pub async fn create_form(
    forms: &dyn FormRepository,
    ctx: RequestContext,
    req: FormCreateRequest,
) -> Result<Form, AppError> {
    if ctx.role != Role::Employee {
        return Err(AppError::forbidden("only employees can submit forms"));
    }
    req.validate()?;

    let description = req.description.filter(|d| !d.trim().is_empty());
    let form = Form::new(
        ctx.user_id,
        req.title.trim().to_string(),
        description,
        req.start_date,
        req.end_date,
    );
    forms.create(&form).await?;

    info!(form_id = %form.id, user_id = %ctx.user_id, "form created");
    Ok(form)
}

/// Employees get `Forbidden` for a form that exists but is not theirs, and
/// `FormNotFound` for one that does not exist.
pub async fn get_form(
    forms: &dyn FormRepository,
    ctx: RequestContext,
    form_id: Uuid,
) -> Result<FormView, AppError> {
    match ctx.role {
        Role::Hr | Role::Admin => Ok(FormView::WithOwner(
            forms.find_by_id_with_user(form_id).await?,
        )),
        Role::Employee => {
            let form = forms.find_by_id(form_id).await?;
            if form.user_id != ctx.user_id {
                warn!(form_id = %form_id, user_id = %ctx.user_id, "form belongs to another user");
                return Err(AppError::forbidden("access denied"));
            }
            Ok(FormView::Own(form))
        }
    }
}

pub async fn list_forms(
    forms: &dyn FormRepository,
    ctx: RequestContext,
) -> Result<FormList, AppError> {
    match ctx.role {
        Role::Hr | Role::Admin => Ok(FormList::Grouped(forms.find_all_with_users().await?)),
        Role::Employee => Ok(FormList::Own(forms.find_by_user_id(ctx.user_id).await?)),
    }
}

/// Moves `form_id` to `status` and stamps `approved_at`. Concurrent updates
/// of the same form are last-write-wins.
pub async fn update_form_status(
    forms: &dyn FormRepository,
    ctx: RequestContext,
    form_id: Uuid,
    status: FormStatus,
) -> Result<Form, AppError> {
    let mut form = forms.find_by_id(form_id).await?;
    let previous = form.status;
    form.update_status(status);
    forms.update_status(&form).await?;

    info!(
        form_id = %form.id,
        by = %ctx.user_id,
        from = %previous,
        to = %form.status,
        "form status updated"
    );
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, memory::MemoryStore, users::domain::User};

    fn ctx(user: &User) -> RequestContext {
        RequestContext {
            user_id: user.id,
            role: user.role,
        }
    }

    fn request(title: &str) -> FormCreateRequest {
        FormCreateRequest {
            title: title.into(),
            description: None,
            start_date: None,
            end_date: None,
        }
    }

    async fn seeded() -> (MemoryStore, User, User, User) {
        let store = MemoryStore::default();
        let a = store.seed_user(User::new_employee(
            "Ann".into(), "A".into(), "Eng".into(), "ann@x.com".into(), "h".into(),
        ));
        let b = store.seed_user(User::new_employee(
            "Bob".into(), "B".into(), "Ops".into(), "bob@x.com".into(), "h".into(),
        ));
        let mut hr = User::new_hr("Hal".into(), "R".into(), "HR".into(), "hal@x.com".into(), "h".into());
        hr.is_active = true;
        let hr = store.seed_user(hr);
        (store, a, b, hr)
    }

    #[tokio::test]
    async fn created_forms_are_pending_and_owned_by_caller() {
        let (store, a, _, _) = seeded().await;
        let form = create_form(&store, ctx(&a), request("Leave")).await.unwrap();
        assert_eq!(form.user_id, a.id);
        assert_eq!(form.status, FormStatus::Pending);
        assert!(form.approved_at.is_none());
        assert_eq!(store.find_by_id(form.id).await.unwrap(), form);
    }

    #[tokio::test]
    async fn only_employees_create_forms() {
        let (store, _, _, hr) = seeded().await;
        let err = create_form(&store, ctx(&hr), request("Leave")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn employee_cannot_read_anothers_form() {
        let (store, a, b, _) = seeded().await;
        let form = create_form(&store, ctx(&a), request("Leave")).await.unwrap();

        let err = get_form(&store, ctx(&b), form.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let missing = get_form(&store, ctx(&b), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(missing, AppError::FormNotFound));

        match get_form(&store, ctx(&a), form.id).await.unwrap() {
            FormView::Own(f) => assert_eq!(f.id, form.id),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn staff_read_any_form_with_owner() {
        let (store, a, _, hr) = seeded().await;
        let form = create_form(&store, ctx(&a), request("Leave")).await.unwrap();

        let admin = store.seed_user(User::new_admin("root@x.com".into(), "h".into()));

        for staff in [&hr, &admin] {
            match get_form(&store, ctx(staff), form.id).await.unwrap() {
                FormView::WithOwner(v) => {
                    assert_eq!(v.form.id, form.id);
                    assert_eq!(v.user.id, a.id);
                    assert_eq!(v.user.email, "ann@x.com");
                }
                other => panic!("unexpected view for {:?}: {other:?}", staff.role),
            }
        }

        let err = get_form(&store, ctx(&admin), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::FormNotFound));
    }

    #[tokio::test]
    async fn listing_is_scoped_by_role() {
        let (store, a, b, hr) = seeded().await;
        create_form(&store, ctx(&a), request("Leave")).await.unwrap();
        create_form(&store, ctx(&a), request("Trip")).await.unwrap();
        create_form(&store, ctx(&b), request("Laptop")).await.unwrap();

        match list_forms(&store, ctx(&a)).await.unwrap() {
            FormList::Own(forms) => {
                assert_eq!(forms.len(), 2);
                assert!(forms.iter().all(|f| f.user_id == a.id));
            }
            other => panic!("unexpected list {other:?}"),
        }

        let admin = store.seed_user(User::new_admin("root@x.com".into(), "h".into()));

        for staff in [&hr, &admin] {
            match list_forms(&store, ctx(staff)).await.unwrap() {
                FormList::Grouped(groups) => {
                    assert_eq!(groups.len(), 2);
                    assert_eq!(groups[0].user.id, a.id);
                    assert_eq!(groups.iter().map(|g| g.forms.len()).sum::<usize>(), 3);
                }
                other => panic!("unexpected list for {:?}: {other:?}", staff.role),
            }
        }
    }

    #[tokio::test]
    async fn employee_without_forms_gets_empty_list() {
        let (store, a, _, _) = seeded().await;
        let json = serde_json::to_string(&list_forms(&store, ctx(&a)).await.unwrap()).unwrap();
        assert_eq!(json, "[]");
    }

    #[tokio::test]
    async fn status_update_stamps_approval_both_ways() {
        let (store, a, _, hr) = seeded().await;
        let form = create_form(&store, ctx(&a), request("Leave")).await.unwrap();

        let approved = update_form_status(&store, ctx(&hr), form.id, FormStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, FormStatus::Approved);
        assert!(approved.approved_at.is_some());

        let reverted = update_form_status(&store, ctx(&hr), form.id, FormStatus::Pending)
            .await
            .unwrap();
        assert_eq!(reverted.status, FormStatus::Pending);
        assert!(reverted.approved_at.is_some());
        assert!(reverted.approved_at >= approved.approved_at);

        let stored = store.find_by_id(form.id).await.unwrap();
        assert_eq!(stored.approved_at, reverted.approved_at);
    }

    #[tokio::test]
    async fn status_update_of_unknown_form_is_not_found() {
        let (store, _, _, hr) = seeded().await;
        let err = update_form_status(&store, ctx(&hr), Uuid::new_v4(), FormStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FormNotFound));
    }

    #[tokio::test]
    async fn racing_status_updates_are_last_write_wins() {
        let (store, a, _, _) = seeded().await;
        let form = create_form(&store, ctx(&a), request("Leave")).await.unwrap();

        // both writers read the pending form before either writes
        let mut first = store.find_by_id(form.id).await.unwrap();
        let mut second = store.find_by_id(form.id).await.unwrap();
        first.update_status(FormStatus::Approved);
        second.update_status(FormStatus::Pending);
        store.update_status(&first).await.unwrap();
        store.update_status(&second).await.unwrap();

        let stored = store.find_by_id(form.id).await.unwrap();
        assert_eq!(stored.status, FormStatus::Pending);
    }
}
