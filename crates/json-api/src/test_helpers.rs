//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use botica_app::{
    auth::{MockSessionsService, models::CurrentUser},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CartLine, CartView},
        },
        products::{
            MockProductsService,
            models::{CommentUuid, Product, ProductComment, ProductUuid},
        },
        users::{
            MockUsersService,
            models::{User, UserRole, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) fn test_user() -> CurrentUser {
    CurrentUser {
        uuid: TEST_USER_UUID,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        role: UserRole::User,
    }
}

pub(crate) fn test_admin() -> CurrentUser {
    CurrentUser {
        role: UserRole::Admin,
        ..test_user()
    }
}

/// Stand-in for the session middleware: always injects the test user.
#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_user(test_user());
    ctrl.call_next(req, depot, res).await;
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();
    products.expect_add_comment().never();

    products
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_remove_item().never();
    carts.expect_set_item_quantity().never();

    carts
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_register().never();
    users.expect_verify_credentials().never();
    users.expect_get_user().never();
    users.expect_list_users().never();
    users.expect_begin_password_reset().never();
    users.expect_reset_password().never();

    users
}

fn strict_sessions_mock() -> MockSessionsService {
    let mut sessions = MockSessionsService::new();

    sessions.expect_create_session().never();
    sessions.expect_resolve_session().never();
    sessions.expect_destroy_session().never();

    sessions
}

fn make_state(
    products: MockProductsService,
    carts: MockCartsService,
    users: MockUsersService,
    sessions: MockSessionsService,
) -> Arc<State> {
    Arc::new(State::new(AppContext {
        products: Arc::new(products),
        carts: Arc::new(carts),
        users: Arc::new(users),
        sessions: Arc::new(sessions),
    }))
}

/// Route backed by a products mock; everything else is strict.
pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    let state = make_state(
        products,
        strict_carts_mock(),
        strict_users_mock(),
        strict_sessions_mock(),
    );

    Service::new(Router::new().hoop(inject(state)).push(route))
}

/// Route backed by a carts mock, with the test user pre-injected.
pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    let state = make_state(
        strict_products_mock(),
        carts,
        strict_users_mock(),
        strict_sessions_mock(),
    );

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_user)
            .push(route),
    )
}

/// Route backed by a users mock; everything else is strict.
pub(crate) fn users_service(users: MockUsersService, route: Router) -> Service {
    let state = make_state(
        strict_products_mock(),
        strict_carts_mock(),
        users,
        strict_sessions_mock(),
    );

    Service::new(Router::new().hoop(inject(state)).push(route))
}

/// Route backed by a users mock, with the test user pre-injected.
pub(crate) fn users_protected_service(users: MockUsersService, route: Router) -> Service {
    let state = make_state(
        strict_products_mock(),
        strict_carts_mock(),
        users,
        strict_sessions_mock(),
    );

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_user)
            .push(route),
    )
}

/// Route backed by users and sessions mocks (register/login flows).
pub(crate) fn users_session_service(
    users: MockUsersService,
    sessions: MockSessionsService,
    route: Router,
) -> Service {
    let state = make_state(strict_products_mock(), strict_carts_mock(), users, sessions);

    Service::new(Router::new().hoop(inject(state)).push(route))
}

/// Route backed by a sessions mock; everything else is strict.
pub(crate) fn sessions_service(sessions: MockSessionsService, route: Router) -> Service {
    let state = make_state(
        strict_products_mock(),
        strict_carts_mock(),
        strict_users_mock(),
        sessions,
    );

    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        name: "Paracetamol 500mg".to_string(),
        description: "For aches and pains".to_string(),
        unit_price: 2500,
        image_url: None,
        discount_percent: 0,
        unit: "box".to_string(),
        comments: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_comment(body: &str) -> ProductComment {
    ProductComment {
        uuid: CommentUuid::new(),
        author_name: "An".to_string(),
        phone: None,
        body: body.to_string(),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart_view(lines: &[(&str, u32)]) -> CartView {
    CartView::from_lines(
        lines
            .iter()
            .map(|(name, quantity)| CartLine {
                product_uuid: ProductUuid::new(),
                name: (*name).to_string(),
                unit_price: 2500,
                image_url: None,
                quantity: *quantity,
            })
            .collect(),
    )
}

pub(crate) fn make_user(name: &str, email: &str) -> User {
    User {
        uuid: UserUuid::from_uuid(Uuid::nil()),
        name: name.to_string(),
        email: email.to_string(),
        role: UserRole::User,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
