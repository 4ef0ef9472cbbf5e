use super::*;
use crate::net::types::User;

fn signed_in(role: Role) -> AuthState {
    AuthState {
        is_authenticated: true,
        user: Some(User {
            id: "u-1".to_owned(),
            email: "a@b.com".to_owned(),
            full_name: "Ada".to_owned(),
            role,
        }),
        is_loading: false,
        error: None,
        session: None,
    }
}

const HOME: Navigation = Navigation::Redirect { to: "/", replace: true };

// =============================================================
// Table
// =============================================================

#[test]
fn every_page_round_trips_through_its_path() {
    for page in Page::ALL {
        assert_eq!(Page::from_path(page.path()), Some(page));
    }
}

#[test]
fn allow_lists_match_route_table() {
    assert_eq!(Page::Login.allowed_roles(), None);
    assert_eq!(
        Page::FieldWorker.allowed_roles(),
        Some(&[Role::CsiFieldWorker, Role::ThfcProductionOperator, Role::ProductionOperator][..])
    );
    for page in [Page::AdminDashboard, Page::AdminUsers, Page::AdminCrates, Page::AdminLogs, Page::AdminSettings] {
        assert_eq!(page.allowed_roles(), Some(&[Role::ZohoAdmin][..]), "{page:?}");
    }
    assert_eq!(Page::Dispatch.allowed_roles(), Some(&[Role::DispatchCoordinator][..]));
}

#[test]
fn only_secondary_admin_pages_are_lazy() {
    let lazy: Vec<Page> = Page::ALL.into_iter().filter(|p| p.is_lazy()).collect();
    assert_eq!(lazy, vec![Page::AdminCrates, Page::AdminLogs, Page::AdminSettings]);
}

#[test]
fn every_role_home_is_a_page_it_can_reach() {
    for role in Role::ALL {
        assert!(matches!(navigate(&signed_in(role), role.home_path()), Navigation::Render(_)), "{role}");
    }
}

// =============================================================
// navigate
// =============================================================

#[test]
fn unknown_path_redirects_home() {
    assert_eq!(navigate(&signed_in(Role::ZohoAdmin), "/unknown"), HOME);
    assert_eq!(navigate(&AuthState::default(), "/admin/unknown"), HOME);
}

#[test]
fn login_page_is_public() {
    assert_eq!(navigate(&AuthState::default(), "/"), Navigation::Render(Page::Login));
    assert_eq!(navigate(&AuthState::default(), ""), Navigation::Render(Page::Login));
}

#[test]
fn trailing_slash_and_query_are_ignored() {
    let admin = signed_in(Role::ZohoAdmin);
    assert_eq!(navigate(&admin, "/admin/users/"), Navigation::Render(Page::AdminUsers));
    assert_eq!(navigate(&admin, "/admin/logs?page=2#top"), Navigation::Render(Page::AdminLogs));
}

#[test]
fn guarded_page_rejects_wrong_role() {
    assert_eq!(navigate(&signed_in(Role::DispatchCoordinator), "/admin"), HOME);
    assert_eq!(navigate(&signed_in(Role::ZohoAdmin), "/dispatch"), HOME);
    assert_eq!(navigate(&signed_in(Role::CsiFieldWorker), "/admin/settings"), HOME);
}

#[test]
fn guarded_page_rejects_anonymous() {
    assert_eq!(navigate(&AuthState::default(), "/field-worker"), HOME);
}
