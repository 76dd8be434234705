#[cfg(feature = "server")]
use crate::schema::*;
use chrono::NaiveDateTime;
#[cfg(feature = "server")]
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg_attr(
    feature = "server",
    derive(Queryable, Selectable),
    diesel(table_name = customer)
)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i32,
    pub login: String,
    pub session_token: Option<String>,
}

#[cfg(feature = "server")]
#[derive(Insertable)]
#[diesel(table_name = customer)]
pub struct NewCustomer<'a> {
    pub login: &'a str,
    pub password: &'a str,
    pub salt: &'a str,
}

#[cfg_attr(
    feature = "server",
    derive(Queryable, Selectable),
    diesel(table_name = car_model)
)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarModel {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub efficiency_city: f64,
    pub efficiency_highway: f64,
}

#[cfg_attr(
    feature = "server",
    derive(Queryable, Selectable),
    diesel(table_name = user_car)
)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserCar {
    pub id: i32,
    pub customer_id: i32,
    pub car_model_id: i32,
    pub custom_name: Option<String>,
}

#[cfg(feature = "server")]
#[derive(Insertable)]
#[diesel(table_name = user_car)]
pub struct NewUserCar<'a> {
    pub customer_id: i32,
    pub car_model_id: i32,
    pub custom_name: Option<&'a str>,
}

#[cfg_attr(
    feature = "server",
    derive(Queryable, Selectable),
    diesel(table_name = fuel_expense)
)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FuelExpense {
    pub id: i32,
    pub customer_id: i32,
    pub user_car_id: i32,
    pub distance: f64,
    pub fuel_amount: f64,
    pub fuel_price_per_unit: f64,
    pub total_cost: f64,
    pub notes: Option<String>,
    pub expense_date: NaiveDateTime,
}

#[cfg(feature = "server")]
#[derive(Insertable)]
#[diesel(table_name = fuel_expense)]
pub struct NewFuelExpense<'a> {
    pub customer_id: i32,
    pub user_car_id: i32,
    pub distance: f64,
    pub fuel_amount: f64,
    pub fuel_price_per_unit: f64,
    pub total_cost: f64,
    pub notes: Option<&'a str>,
    pub expense_date: NaiveDateTime,
}

/// A registered car joined with its catalog entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserCarWithModel {
    pub id: i32,
    pub custom_name: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub efficiency_city: f64,
    pub efficiency_highway: f64,
}

/// A fuel purchase joined with the car it was recorded against.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExpenseWithCar {
    pub id: i32,
    pub distance: f64,
    pub fuel_amount: f64,
    pub fuel_price_per_unit: f64,
    pub total_cost: f64,
    pub notes: Option<String>,
    pub expense_date: NaiveDateTime,
    pub car_make: String,
    pub car_model: String,
    pub car_custom_name: Option<String>,
}

use dioxus::prelude::*;

/// Session-local choice of the car the ledger and calculator work against.
/// Owned by the dashboard, handed to the tab components through context.
/// Never persisted; `select` and `clear` are the only ways to change it.
#[derive(Clone, Copy)]
pub struct ActiveCar(Signal<Option<UserCarWithModel>>);

impl ActiveCar {
    pub fn new() -> Self {
        Self(Signal::new(None))
    }

    pub fn get(&self) -> Option<UserCarWithModel> {
        self.0.read().clone()
    }

    pub fn id(&self) -> Option<i32> {
        self.0.read().as_ref().map(|car| car.id)
    }

    pub fn select(&mut self, car: UserCarWithModel) {
        self.0.set(Some(car));
    }

    pub fn clear(&mut self) {
        self.0.set(None);
    }
}
