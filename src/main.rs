#![allow(non_snake_case)]
use dioxus::prelude::*;

mod db;
mod models;
mod rate_limit;
#[cfg(feature = "server")]
mod schema;
mod utils;

#[cfg(feature = "server")]
use dioxus::logger::tracing::info;

use models::{ActiveCar, CarModel, Customer, ExpenseWithCar, UserCarWithModel};

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Home {},

    #[route("/login")]
    LoginPage {},

    #[route("/register")]
    RegisterPage {},

    #[route("/dashboard")]
    DashboardPage {},
}

fn main() {
    dioxus::logger::initialize_default();

    #[cfg(feature = "server")]
    {
        if let Err(e) = dotenvy::dotenv() {
            info!("no .env file loaded: {e}");
        }

        db::run_migrations();

        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async move {
                let port = std::env::var("PORT").unwrap_or("8080".to_string());
                let addr = format!("0.0.0.0:{port}");
                info!("listening on {addr}");
                let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

                tokio::spawn(async {
                    let mut tick =
                        tokio::time::interval(std::time::Duration::from_secs(600));
                    loop {
                        tick.tick().await;
                        rate_limit::cleanup_old_entries(std::time::Duration::from_secs(3600));
                    }
                });

                let app = axum::Router::new()
                    .serve_dioxus_application(ServeConfigBuilder::new(), App)
                    .route("/api/health", axum::routing::get(api::health));

                axum::serve(listener, app).await.unwrap();
            });
    }

    launch(App);
}

fn App() -> Element {
    // Session identity, trusted verbatim from the login server function
    use_context_provider(|| Signal::new(None::<Customer>));

    rsx! {
        link { rel: "stylesheet", href: asset!("/assets/style.css") }
        Router::<Route> {}
    }
}

#[cfg(feature = "server")]
mod api {
    use axum::response::IntoResponse;

    // Liveness probe that also exercises the pool
    pub async fn health() -> impl IntoResponse {
        use crate::schema::car_model::dsl::*;
        use diesel::prelude::*;

        let mut conn = crate::db::connection();
        match car_model.count().get_result::<i64>(&mut conn) {
            Ok(n) => format!("OK: {n} catalog models"),
            Err(e) => format!("Error: {e}"),
        }
    }
}

/// Every user-scoped server function goes through this check before touching
/// the store. The client holds whatever token login handed it.
#[cfg(feature = "server")]
fn verify_session(
    conn: &mut diesel::SqliteConnection,
    customer_id_val: i32,
    token_str: &str,
) -> Result<(), ServerFnError> {
    use crate::schema::customer;
    use diesel::prelude::*;
    use dioxus::logger::tracing::warn;

    let stored: Option<String> = customer::table
        .find(customer_id_val)
        .select(customer::session_token)
        .first(conn)
        .map_err(|_| ServerFnError::new("Account not found"))?;

    match stored {
        Some(token) if token == token_str => Ok(()),
        _ => {
            warn!("rejected request with a stale session for customer {customer_id_val}");
            Err(ServerFnError::new("Unauthorized (invalid session)"))
        }
    }
}

#[server]
async fn register_user(login_str: String, pass_str: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::models::NewCustomer;
        use crate::schema::customer::dsl::*;
        use bcrypt::{hash, DEFAULT_COST};
        use diesel::prelude::*;

        if login_str.trim().is_empty() || pass_str.is_empty() {
            return Err(ServerFnError::new("Login and password are required"));
        }

        let mut conn = db::connection();
        let count = customer
            .filter(login.eq(&login_str))
            .count()
            .get_result::<i64>(&mut conn)
            .unwrap_or(0);
        if count > 0 {
            return Err(ServerFnError::new("This login is already taken"));
        }

        let pass_str_clone = pass_str.clone();
        let hashed_pass = tokio::task::spawn_blocking(move || hash(&pass_str_clone, DEFAULT_COST))
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        let new_user = NewCustomer {
            login: &login_str,
            password: &hashed_pass,
            salt: "bcrypt",
        };

        diesel::insert_into(customer)
            .values(&new_user)
            .execute(&mut conn)
            .map_err(|e| ServerFnError::new(e.to_string()))?;
    }
    Ok(())
}

#[server]
async fn login_user(login_str: String, pass_str: String) -> Result<Customer, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::rate_limit::check_rate_limit;
        use std::time::Duration;

        // 20 attempts per account per minute
        let rate_key = format!("login_{}", login_str);
        if !check_rate_limit(&rate_key, 20, Duration::from_secs(60)) {
            return Err(ServerFnError::new(
                "Too many login attempts. Try again in a minute.",
            ));
        }
        use crate::schema::customer::dsl::*;
        use bcrypt::verify;
        use diesel::prelude::*;

        let mut conn = db::connection();
        let user_data = customer
            .filter(login.eq(&login_str))
            .select((id, login, password))
            .first::<(i32, String, String)>(&mut conn)
            .optional()
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        if let Some((u_id, u_login, u_pass_hash)) = user_data {
            let pass_str_clone = pass_str.clone();
            let u_pass_hash_clone = u_pass_hash.clone();
            let is_valid = tokio::task::spawn_blocking(move || {
                verify(&pass_str_clone, &u_pass_hash_clone).unwrap_or(false)
            })
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;

            if is_valid {
                let mut buf = [0u8; 32];
                getrandom::fill(&mut buf).unwrap_or(());
                let token: String = buf.iter().map(|b| format!("{:02x}", b)).collect();

                diesel::update(customer.find(u_id))
                    .set(session_token.eq(&token))
                    .execute(&mut conn)
                    .map_err(|e| ServerFnError::new(e.to_string()))?;

                return Ok(Customer {
                    id: u_id,
                    login: u_login,
                    session_token: Some(token),
                });
            }
        }
        return Err(ServerFnError::new("Wrong login or password"));
    }
    #[cfg(not(feature = "server"))]
    Err(ServerFnError::new("Server only"))
}

#[server]
async fn list_car_models() -> Result<Vec<CarModel>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::rate_limit::check_rate_limit;
        use std::time::Duration;

        if !check_rate_limit("catalog_global", 120, Duration::from_secs(60)) {
            return Err(ServerFnError::new("Too many requests. Try again later."));
        }
        use crate::schema::car_model::dsl::*;
        use diesel::prelude::*;

        let mut conn = db::connection();
        let list = car_model
            .order(make.asc())
            .select(CarModel::as_select())
            .load::<CarModel>(&mut conn)
            .map_err(|e| ServerFnError::new(e.to_string()))?;
        Ok(list)
    }
    #[cfg(not(feature = "server"))]
    Err(ServerFnError::new("Server only"))
}

#[server]
async fn list_user_cars(
    customer_id: i32,
    token: String,
) -> Result<Vec<UserCarWithModel>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::models::UserCar;
        use crate::schema::{car_model, user_car};
        use diesel::prelude::*;

        let mut conn = db::connection();
        verify_session(&mut conn, customer_id, &token)?;

        let rows: Vec<(UserCar, CarModel)> = user_car::table
            .inner_join(car_model::table)
            .filter(user_car::customer_id.eq(customer_id))
            .order(user_car::id.asc())
            .load(&mut conn)
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        let list = rows
            .into_iter()
            .map(|(car, model)| UserCarWithModel {
                id: car.id,
                custom_name: car.custom_name,
                make: model.make,
                model: model.model,
                year: model.year,
                efficiency_city: model.efficiency_city,
                efficiency_highway: model.efficiency_highway,
            })
            .collect();
        Ok(list)
    }
    #[cfg(not(feature = "server"))]
    Err(ServerFnError::new("Server only"))
}

#[server]
async fn add_user_car(
    customer_id: i32,
    car_model_id: i32,
    custom_name: Option<String>,
    token: String,
) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::models::NewUserCar;
        use crate::schema::{car_model, user_car};
        use diesel::prelude::*;

        let mut conn = db::connection();
        verify_session(&mut conn, customer_id, &token)?;

        // A registered car must point at a catalog entry
        let known: i64 = car_model::table
            .find(car_model_id)
            .count()
            .get_result(&mut conn)
            .unwrap_or(0);
        if known == 0 {
            return Err(ServerFnError::new("Unknown car model"));
        }

        let new_car = NewUserCar {
            customer_id,
            car_model_id,
            custom_name: custom_name.as_deref(),
        };

        diesel::insert_into(user_car::table)
            .values(&new_car)
            .execute(&mut conn)
            .map_err(|e| ServerFnError::new(e.to_string()))?;
    }
    Ok(())
}

#[server]
async fn delete_user_car(car_id: i32, customer_id: i32, token: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::schema::user_car;
        use diesel::prelude::*;

        let mut conn = db::connection();
        verify_session(&mut conn, customer_id, &token)?;

        diesel::delete(
            user_car::table
                .filter(user_car::id.eq(car_id))
                .filter(user_car::customer_id.eq(customer_id)),
        )
        .execute(&mut conn)
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    }
    Ok(())
}

#[server]
async fn list_expenses(
    customer_id: i32,
    token: String,
) -> Result<Vec<ExpenseWithCar>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::models::{FuelExpense, UserCar};
        use crate::schema::{car_model, fuel_expense, user_car};
        use diesel::prelude::*;

        let mut conn = db::connection();
        verify_session(&mut conn, customer_id, &token)?;

        let rows: Vec<(FuelExpense, (UserCar, CarModel))> = fuel_expense::table
            .inner_join(user_car::table.inner_join(car_model::table))
            .filter(fuel_expense::customer_id.eq(customer_id))
            .order(fuel_expense::expense_date.desc())
            .load(&mut conn)
            .map_err(|e| ServerFnError::new(e.to_string()))?;

        let list = rows
            .into_iter()
            .map(|(exp, (car, model))| ExpenseWithCar {
                id: exp.id,
                distance: exp.distance,
                fuel_amount: exp.fuel_amount,
                fuel_price_per_unit: exp.fuel_price_per_unit,
                total_cost: exp.total_cost,
                notes: exp.notes,
                expense_date: exp.expense_date,
                car_make: model.make,
                car_model: model.model,
                car_custom_name: car.custom_name,
            })
            .collect();
        Ok(list)
    }
    #[cfg(not(feature = "server"))]
    Err(ServerFnError::new("Server only"))
}

#[server]
async fn add_expense(
    customer_id: i32,
    user_car_id: i32,
    distance: f64,
    fuel_amount: f64,
    fuel_price_per_unit: f64,
    notes: Option<String>,
    token: String,
) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::models::NewFuelExpense;
        use crate::schema::{fuel_expense, user_car};
        use diesel::prelude::*;

        let mut conn = db::connection();
        verify_session(&mut conn, customer_id, &token)?;

        if !(distance.is_finite() && fuel_amount.is_finite() && fuel_price_per_unit.is_finite()) {
            return Err(ServerFnError::new("Invalid numeric input"));
        }

        // An expense may only reference a car this customer owns
        let owned: i64 = user_car::table
            .filter(user_car::id.eq(user_car_id))
            .filter(user_car::customer_id.eq(customer_id))
            .count()
            .get_result(&mut conn)
            .unwrap_or(0);
        if owned == 0 {
            return Err(ServerFnError::new("Unknown vehicle"));
        }

        // The derived total is fixed at write time and never recomputed
        let record = NewFuelExpense {
            customer_id,
            user_car_id,
            distance,
            fuel_amount,
            fuel_price_per_unit,
            total_cost: utils::expense_total_cost(fuel_amount, fuel_price_per_unit),
            notes: notes.as_deref(),
            expense_date: chrono::Utc::now().naive_utc(),
        };

        diesel::insert_into(fuel_expense::table)
            .values(&record)
            .execute(&mut conn)
            .map_err(|e| ServerFnError::new(e.to_string()))?;
    }
    Ok(())
}

#[server]
async fn delete_expense(
    expense_id: i32,
    customer_id: i32,
    token: String,
) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use crate::schema::fuel_expense;
        use diesel::prelude::*;

        let mut conn = db::connection();
        verify_session(&mut conn, customer_id, &token)?;

        diesel::delete(
            fuel_expense::table
                .filter(fuel_expense::id.eq(expense_id))
                .filter(fuel_expense::customer_id.eq(customer_id)),
        )
        .execute(&mut conn)
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    }
    Ok(())
}

// Helper function to clean error messages
fn clean_error_msg(error: String) -> String {
    error
        .replace("error running server function: ", "")
        .replace(" (details: None)", "")
}

#[component]
fn Navbar() -> Element {
    let mut user_state = use_context::<Signal<Option<Customer>>>();
    let nav = use_navigator();

    let handle_logout = move |_| {
        user_state.set(None);
        nav.push(Route::Home {});
    };

    rsx! {
        nav { class: "navbar",
            div { class: "nav-brand",
                Link { to: Route::Home {}, "FuelTrack" }
            }
            div { class: "nav-links",
                if let Some(user) = user_state() {
                    Link { to: Route::DashboardPage {}, class: "nav-item", "Dashboard" }
                    div { class: "user-badge",
                        span { class: "user-name", "{user.login}" }
                    }
                    button { class: "nav-item logout-btn", onclick: handle_logout, "Log out" }
                } else {
                    Link { to: Route::LoginPage {}, class: "nav-item", "Log in" }
                    Link { to: Route::RegisterPage {}, class: "nav-item highlight", "Get Started" }
                }
            }
        }
        Outlet::<Route> {}
    }
}

#[component]
fn Footer() -> Element {
    rsx! {
        footer { class: "footer",
            div { class: "footer-inner",
                div {
                    h3 { "FuelTrack" }
                    p { class: "footer-note", "© 2025 FuelTrack. All rights reserved." }
                }
            }
        }
    }
}

#[component]
fn Home() -> Element {
    let nav = use_navigator();

    let features = [
        (
            "Smart Fuel Calculator",
            "Estimate fuel needs and trip costs before you drive",
        ),
        (
            "Multi-Car Garage",
            "Track expenses for every vehicle you own from one dashboard",
        ),
        (
            "Monthly Spending",
            "See what fuel actually costs you, month by month",
        ),
    ];

    rsx! {
        div { class: "landing",
            div { class: "hero",
                div { class: "hero-badge", "Smart Fuel Management" }
                h1 { "Track Your Fuel Expenses Effortlessly" }
                p { class: "subtitle",
                    "Calculate fuel costs, record purchases and keep every vehicle's spending in one place."
                }
                button {
                    class: "modern-button",
                    onclick: move |_| {
                        nav.push(Route::RegisterPage {});
                    },
                    "Start Tracking Free"
                }
            }
            div { class: "feature-grid",
                for (title , text) in features {
                    div { class: "feature-card", key: "{title}",
                        h3 { "{title}" }
                        p { "{text}" }
                    }
                }
            }
            Footer {}
        }
    }
}

#[component]
fn LoginPage() -> Element {
    let mut login = use_signal(|| "".to_string());
    let mut password = use_signal(|| "".to_string());
    let mut error_msg = use_signal(|| "".to_string());

    let mut user_state = use_context::<Signal<Option<Customer>>>();
    let nav = use_navigator();

    let handle_login = move |_| async move {
        error_msg.set("".to_string());
        match login_user(login(), password()).await {
            Ok(user) => {
                user_state.set(Some(user));
                nav.push(Route::DashboardPage {});
            }
            Err(_) => error_msg.set("Wrong login or password".to_string()),
        }
    };

    rsx! {
        div { class: "page-container",
            div { class: "auth-card",
                h2 { "Log in" }
                div { class: "form-content",
                    input {
                        class: "modern-input",
                        placeholder: "Login",
                        value: "{login}",
                        oninput: move |e| login.set(e.value()),
                    }
                    input {
                        class: "modern-input",
                        type: "password",
                        placeholder: "Password",
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                    if !error_msg().is_empty() {
                        div { class: "error-message", "{error_msg}" }
                    }
                    button { class: "modern-button", onclick: handle_login, "Log in" }
                }
            }
        }
    }
}

#[component]
fn RegisterPage() -> Element {
    let mut login = use_signal(|| "".to_string());
    let mut password = use_signal(|| "".to_string());
    let mut error_msg = use_signal(|| "".to_string());
    let nav = use_navigator();

    let handle_register = move |_| async move {
        error_msg.set("".to_string());
        match register_user(login(), password()).await {
            Ok(_) => {
                nav.push(Route::LoginPage {});
            }
            Err(e) => error_msg.set(clean_error_msg(e.to_string())),
        }
    };

    rsx! {
        div { class: "page-container",
            div { class: "auth-card",
                h2 { "Create an account" }
                div { class: "form-content",
                    input {
                        class: "modern-input",
                        placeholder: "Login",
                        value: "{login}",
                        oninput: move |e| login.set(e.value()),
                    }
                    input {
                        class: "modern-input",
                        type: "password",
                        placeholder: "Password",
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                    if !error_msg().is_empty() {
                        div { class: "error-message", "{error_msg}" }
                    }
                    button { class: "modern-button", onclick: handle_register, "Sign up" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, PartialEq)]
enum DashboardTab {
    Calculator,
    Expenses,
    Cars,
}

#[component]
fn DashboardPage() -> Element {
    let user_state = use_context::<Signal<Option<Customer>>>();
    let nav = use_navigator();
    // The dashboard owns the active-car selection; the tab components reach
    // it through context and it dies with the session.
    use_context_provider(ActiveCar::new);
    let mut tab = use_signal(|| DashboardTab::Calculator);

    let Some(user) = user_state() else {
        nav.push(Route::LoginPage {});
        return rsx! {};
    };

    let tab_class =
        move |t: DashboardTab| if tab() == t { "tab-btn active" } else { "tab-btn" };

    rsx! {
        div { class: "page-container",
            div { class: "content-card dashboard",
                h1 { "FuelTrack" }
                p { class: "subtitle", "Welcome, {user.login}" }
                div { class: "tab-bar",
                    button {
                        class: tab_class(DashboardTab::Calculator),
                        onclick: move |_| tab.set(DashboardTab::Calculator),
                        "Calculator"
                    }
                    button {
                        class: tab_class(DashboardTab::Expenses),
                        onclick: move |_| tab.set(DashboardTab::Expenses),
                        "Expenses"
                    }
                    button {
                        class: tab_class(DashboardTab::Cars),
                        onclick: move |_| tab.set(DashboardTab::Cars),
                        "My Cars"
                    }
                }
                match tab() {
                    DashboardTab::Calculator => rsx! {
                        FuelCalculator {}
                    },
                    DashboardTab::Expenses => rsx! {
                        ExpenseTracker {}
                    },
                    DashboardTab::Cars => rsx! {
                        CarSelector {}
                    },
                }
            }
        }
    }
}

#[component]
fn CarSelector() -> Element {
    let user_state = use_context::<Signal<Option<Customer>>>();
    let mut active_car = use_context::<ActiveCar>();
    let mut is_adding = use_signal(|| false);
    let mut selected_model_id = use_signal(String::new);
    let mut custom_name = use_signal(String::new);
    let mut status_msg = use_signal(String::new);

    let models = use_resource(move || async move { list_car_models().await });
    let mut cars = use_resource(move || async move {
        match user_state() {
            Some(user) => {
                let token = user.session_token.clone().unwrap_or_default();
                list_user_cars(user.id, token).await
            }
            None => Ok(Vec::new()),
        }
    });

    // A failed read leaves the garage empty; whenever a load finishes with
    // nothing active, the first car in list order becomes the selection.
    use_effect(move || match &*cars.read() {
        Some(Ok(list)) => {
            if active_car.id().is_none() {
                if let Some(first) = list.first() {
                    active_car.select(first.clone());
                }
            }
        }
        Some(Err(_)) => status_msg.set("Failed to load your cars".to_string()),
        None => {}
    });

    let handle_add = move |_| async move {
        let Some(user) = user_state() else { return };
        let Ok(model_id) = selected_model_id().parse::<i32>() else {
            status_msg.set("Please select a car model".to_string());
            return;
        };
        let name = custom_name();
        let name = name.trim();
        let name = (!name.is_empty()).then(|| name.to_string());
        let token = user.session_token.clone().unwrap_or_default();
        match add_user_car(user.id, model_id, name, token).await {
            Ok(_) => {
                status_msg.set("Car added".to_string());
                is_adding.set(false);
                selected_model_id.set(String::new());
                custom_name.set(String::new());
                cars.restart();
            }
            Err(e) => status_msg.set(clean_error_msg(e.to_string())),
        }
    };

    let model_options = match &*models.read() {
        Some(Ok(list)) => list.clone(),
        _ => Vec::new(),
    };

    rsx! {
        div { class: "selector-header",
            div {
                h2 { "My Cars" }
                p { class: "subtitle", "Manage your vehicles" }
            }
            button {
                class: "modern-button outline",
                onclick: move |_| {
                    is_adding.set(!is_adding());
                    status_msg.set(String::new());
                },
                if is_adding() { "Cancel" } else { "Add Car" }
            }
        }

        if is_adding() {
            div { class: "form-content",
                label { "Select Car Model" }
                select {
                    class: "modern-input",
                    value: "{selected_model_id}",
                    onchange: move |e| selected_model_id.set(e.value()),
                    option { value: "", "Choose a car model" }
                    for m in model_options {
                        option { key: "{m.id}", value: "{m.id}", "{m.year} {m.make} {m.model}" }
                    }
                }
                label { "Custom Name (optional)" }
                input {
                    class: "modern-input",
                    placeholder: "My daily driver",
                    value: "{custom_name}",
                    oninput: move |e| custom_name.set(e.value()),
                }
                button { class: "modern-button", onclick: handle_add, "Add Car" }
            }
        }

        if !status_msg().is_empty() {
            div { class: "status-msg", "{status_msg}" }
        }

        match &*cars.read() {
            Some(Ok(list)) => rsx! {
                if list.is_empty() {
                    div { class: "empty-state", "No cars added yet" }
                } else {
                    div { class: "car-grid",
                        for car in list {
                            CarCard { key: "{car.id}", car: car.clone(), cars, status_msg }
                        }
                    }
                }
            },
            Some(Err(_)) => rsx! {
                div { class: "empty-state", "No cars added yet" }
            },
            None => rsx! {
                div { class: "loading", "Loading" }
            },
        }
    }
}

#[component]
fn CarCard(
    car: UserCarWithModel,
    cars: Resource<Result<Vec<UserCarWithModel>, ServerFnError>>,
    status_msg: Signal<String>,
) -> Element {
    let user_state = use_context::<Signal<Option<Customer>>>();
    let mut active_car = use_context::<ActiveCar>();
    let mut cars = cars;
    let mut status_msg = status_msg;

    let is_active = active_car.id() == Some(car.id);
    let card_car = car.clone();

    let handle_remove = move |e: Event<MouseData>| {
        e.stop_propagation();
        spawn(async move {
            let Some(user) = user_state() else { return };
            let token = user.session_token.clone().unwrap_or_default();
            match delete_user_car(car.id, user.id, token).await {
                Ok(_) => {
                    status_msg.set("Car removed".to_string());
                    if active_car.id() == Some(car.id) {
                        active_car.clear();
                    }
                    cars.restart();
                }
                Err(e) => status_msg.set(clean_error_msg(e.to_string())),
            }
        });
    };

    rsx! {
        div {
            class: if is_active { "car-item selected" } else { "car-item" },
            onclick: move |_| active_car.select(card_car.clone()),
            div { class: "car-title",
                h3 { "{car.year} {car.make} {car.model}" }
                if is_active {
                    span { class: "active-mark", "✓" }
                }
            }
            if let Some(name) = &car.custom_name {
                p { class: "custom-name", "{name}" }
            }
            div { class: "car-stats",
                p { "City: {car.efficiency_city} MPG" }
                p { "Highway: {car.efficiency_highway} MPG" }
            }
            button { class: "remove-btn", onclick: handle_remove, "Remove" }
        }
    }
}

#[component]
fn ExpenseTracker() -> Element {
    let user_state = use_context::<Signal<Option<Customer>>>();
    let active_car = use_context::<ActiveCar>();
    let mut is_adding = use_signal(|| false);
    let mut distance = use_signal(String::new);
    let mut fuel_amount = use_signal(String::new);
    let mut fuel_price = use_signal(String::new);
    let mut notes = use_signal(String::new);
    let mut status_msg = use_signal(String::new);

    let mut expenses = use_resource(move || async move {
        match user_state() {
            Some(user) => {
                let token = user.session_token.clone().unwrap_or_default();
                list_expenses(user.id, token).await
            }
            None => Ok(Vec::new()),
        }
    });

    use_effect(move || {
        if let Some(Err(_)) = &*expenses.read() {
            status_msg.set("Failed to load expenses".to_string());
        }
    });

    // A failed read degrades to an empty ledger; the monthly figure always
    // reflects the rows currently on screen.
    let ledger = match &*expenses.read() {
        Some(Ok(list)) => list.clone(),
        _ => Vec::new(),
    };
    let month_total = utils::format_money(utils::monthly_total(
        &ledger,
        chrono::Local::now().date_naive(),
    ));

    let handle_add = move |_| async move {
        let Some(user) = user_state() else { return };
        let Some(car_id) = active_car.id() else {
            status_msg.set("Please select a car first".to_string());
            return;
        };
        let parsed = (
            utils::parse_amount(&distance()),
            utils::parse_amount(&fuel_amount()),
            utils::parse_amount(&fuel_price()),
        );
        let (Some(dist), Some(amount), Some(price)) = parsed else {
            status_msg.set("Distance, fuel amount and price must be numbers".to_string());
            return;
        };
        let note = notes();
        let note = note.trim();
        let note = (!note.is_empty()).then(|| note.to_string());
        let token = user.session_token.clone().unwrap_or_default();
        match add_expense(user.id, car_id, dist, amount, price, note, token).await {
            Ok(_) => {
                status_msg.set("Expense added".to_string());
                is_adding.set(false);
                distance.set(String::new());
                fuel_amount.set(String::new());
                fuel_price.set(String::new());
                notes.set(String::new());
                expenses.restart();
            }
            Err(e) => status_msg.set(clean_error_msg(e.to_string())),
        }
    };

    rsx! {
        div { class: "stat-card",
            p { class: "label", "Monthly Total" }
            p { class: "stat-value", "{month_total}" }
        }

        div { class: "selector-header",
            div {
                h2 { "Add Expense" }
                p { class: "subtitle", "Track your fuel purchases" }
            }
            button {
                class: "modern-button outline",
                onclick: move |_| {
                    is_adding.set(!is_adding());
                    status_msg.set(String::new());
                },
                if is_adding() { "Cancel" } else { "Add" }
            }
        }

        if is_adding() {
            div { class: "form-content",
                label { "Distance (miles)" }
                input {
                    class: "modern-input",
                    placeholder: "100",
                    value: "{distance}",
                    oninput: move |e| distance.set(e.value()),
                }
                label { "Fuel Amount (gallons)" }
                input {
                    class: "modern-input",
                    placeholder: "10",
                    value: "{fuel_amount}",
                    oninput: move |e| fuel_amount.set(e.value()),
                }
                label { "Price per Gallon" }
                input {
                    class: "modern-input",
                    placeholder: "3.50",
                    value: "{fuel_price}",
                    oninput: move |e| fuel_price.set(e.value()),
                }
                label { "Notes (optional)" }
                input {
                    class: "modern-input",
                    placeholder: "Road trip",
                    value: "{notes}",
                    oninput: move |e| notes.set(e.value()),
                }
                button { class: "modern-button", onclick: handle_add, "Save Expense" }
            }
        }

        if !status_msg().is_empty() {
            div { class: "status-msg", "{status_msg}" }
        }

        h2 { "Recent Expenses" }
        match &*expenses.read() {
            Some(Ok(list)) => rsx! {
                if list.is_empty() {
                    div { class: "empty-state", "No expenses yet" }
                } else {
                    div { class: "expense-list",
                        for expense in list {
                            ExpenseRow {
                                key: "{expense.id}",
                                expense: expense.clone(),
                                expenses,
                                status_msg,
                            }
                        }
                    }
                }
            },
            Some(Err(_)) => rsx! {
                div { class: "empty-state", "No expenses yet" }
            },
            None => rsx! {
                div { class: "loading", "Loading" }
            },
        }
    }
}

#[component]
fn ExpenseRow(
    expense: ExpenseWithCar,
    expenses: Resource<Result<Vec<ExpenseWithCar>, ServerFnError>>,
    status_msg: Signal<String>,
) -> Element {
    let user_state = use_context::<Signal<Option<Customer>>>();
    let mut expenses = expenses;
    let mut status_msg = status_msg;

    let date_label = expense.expense_date.format("%b %d, %Y").to_string();
    let total_label = utils::format_money(expense.total_cost);

    let handle_delete = move |_| async move {
        let Some(user) = user_state() else { return };
        let token = user.session_token.clone().unwrap_or_default();
        match delete_expense(expense.id, user.id, token).await {
            Ok(_) => {
                status_msg.set("Expense deleted".to_string());
                expenses.restart();
            }
            Err(e) => status_msg.set(clean_error_msg(e.to_string())),
        }
    };

    rsx! {
        div { class: "expense-row",
            div { class: "expense-info",
                p { class: "expense-car", "{expense.car_make} {expense.car_model}" }
                p { class: "expense-meta",
                    "{date_label} • {expense.distance} mi • {expense.fuel_amount} gal"
                }
                if let Some(note) = &expense.notes {
                    p { class: "expense-notes", "{note}" }
                }
            }
            div { class: "expense-actions",
                span { class: "expense-total", "{total_label}" }
                button { class: "remove-btn", onclick: handle_delete, "Delete" }
            }
        }
    }
}

#[component]
fn FuelCalculator() -> Element {
    let active_car = use_context::<ActiveCar>();
    let mut distance = use_signal(String::new);
    let mut fuel_price = use_signal(String::new);
    let mut efficiency = use_signal(String::new);
    let mut result = use_signal(|| None::<utils::TripEstimate>);

    let selected = active_car.get();

    let handle_calculate = move |_| {
        let entered = utils::parse_amount(&efficiency());
        let highway = active_car.get().map(|car| car.efficiency_highway);
        let eff = utils::resolve_efficiency(entered, highway);
        let dist = utils::parse_amount(&distance()).unwrap_or(f64::NAN);
        let price = utils::parse_amount(&fuel_price()).unwrap_or(f64::NAN);
        result.set(utils::estimate_trip(dist, price, eff));
    };

    rsx! {
        h2 { "Fuel & Distance Calculator" }
        p { class: "subtitle", "Estimate fuel costs for your trips" }

        if let Some(car) = &selected {
            div { class: "selected-car",
                p { class: "label", "Selected Car" }
                p { class: "car-name", "{car.year} {car.make} {car.model}" }
                p { class: "car-meta", "{car.efficiency_highway} MPG (Highway)" }
            }
        }

        div { class: "calculator-grid",
            div { class: "form-content",
                label { "Distance (miles)" }
                input {
                    class: "modern-input",
                    placeholder: "100",
                    value: "{distance}",
                    oninput: move |e| distance.set(e.value()),
                }
                label { "Fuel Price (per gallon)" }
                input {
                    class: "modern-input",
                    placeholder: "3.50",
                    value: "{fuel_price}",
                    oninput: move |e| fuel_price.set(e.value()),
                }
                if selected.is_none() {
                    label { "Fuel Efficiency (MPG)" }
                    input {
                        class: "modern-input",
                        placeholder: "30",
                        value: "{efficiency}",
                        oninput: move |e| efficiency.set(e.value()),
                    }
                }
                button { class: "modern-button", onclick: handle_calculate, "Calculate" }
            }

            if let Some(est) = result() {
                div { class: "results-card",
                    h3 { "Results" }
                    div {
                        p { class: "label", "Fuel Needed" }
                        p { class: "result-value", "{est.fuel_needed:.2} gal" }
                    }
                    div {
                        p { class: "label", "Total Cost" }
                        p { class: "result-value", "${est.total_cost:.2}" }
                    }
                }
            }
        }
    }
}
