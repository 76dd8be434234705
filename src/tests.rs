#[cfg(test)]
mod unit_tests {
    use crate::models::ExpenseWithCar;
    use crate::utils::*;
    use chrono::NaiveDate;

    fn ledger_row(y: i32, m: u32, d: u32, total: f64) -> ExpenseWithCar {
        ExpenseWithCar {
            id: 0,
            distance: 100.0,
            fuel_amount: 10.0,
            fuel_price_per_unit: total / 10.0,
            total_cost: total,
            notes: None,
            expense_date: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            car_make: "Toyota".to_string(),
            car_model: "Corolla".to_string(),
            car_custom_name: None,
        }
    }

    #[test]
    fn test_estimate_with_explicit_efficiency() {
        let est = estimate_trip(100.0, 3.50, 25.0).unwrap();
        assert_eq!(est.fuel_needed, 4.00);
        assert_eq!(est.total_cost, 14.00);
    }

    #[test]
    fn test_estimate_with_default_efficiency() {
        let eff = resolve_efficiency(None, None);
        assert_eq!(eff, DEFAULT_EFFICIENCY);

        let est = estimate_trip(100.0, 3.50, eff).unwrap();
        assert_eq!(est.fuel_needed, 3.33);
        assert_eq!(est.total_cost, 11.67);
    }

    #[test]
    fn test_estimate_uses_active_car_highway_figure() {
        let eff = resolve_efficiency(None, Some(30.0));
        let est = estimate_trip(100.0, 3.50, eff).unwrap();
        assert_eq!(est.fuel_needed, 3.33);
        assert_eq!(est.total_cost, 11.67);
    }

    #[test]
    fn test_explicit_efficiency_wins_over_active_car() {
        assert_eq!(resolve_efficiency(Some(25.0), Some(40.0)), 25.0);
    }

    #[test]
    fn test_unusable_efficiency_entries_fall_through() {
        assert_eq!(resolve_efficiency(Some(0.0), Some(42.0)), 42.0);
        assert_eq!(resolve_efficiency(Some(-5.0), None), DEFAULT_EFFICIENCY);
        assert_eq!(resolve_efficiency(Some(f64::NAN), None), DEFAULT_EFFICIENCY);
    }

    #[test]
    fn test_estimate_rejects_bad_inputs() {
        assert!(estimate_trip(0.0, 3.50, 30.0).is_none());
        assert!(estimate_trip(-10.0, 3.50, 30.0).is_none());
        assert!(estimate_trip(100.0, 0.0, 30.0).is_none());
        assert!(estimate_trip(100.0, f64::NAN, 30.0).is_none());
        assert!(estimate_trip(f64::INFINITY, 3.50, 30.0).is_none());
        assert!(estimate_trip(100.0, 3.50, 0.0).is_none());
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let a = estimate_trip(250.0, 4.19, 33.0);
        let b = estimate_trip(250.0, 4.19, 33.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_expense_total_is_exact_product() {
        assert_eq!(expense_total_cost(10.5, 3.25), 10.5 * 3.25);
        assert_eq!(expense_total_cost(0.0, 3.25), 0.0);
    }

    #[test]
    fn test_monthly_total_filters_by_month_and_year() {
        let records = vec![
            ledger_row(2024, 6, 5, 40.0),
            ledger_row(2024, 7, 1, 25.0),
            ledger_row(2023, 6, 20, 15.0),
        ];
        let june = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(monthly_total(&records, june), 40.0);
    }

    #[test]
    fn test_monthly_total_of_empty_ledger() {
        let june = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(monthly_total(&[], june), 0.0);
    }

    #[test]
    fn test_monthly_total_uses_stored_totals() {
        // The stored column wins even when it disagrees with quantity * price
        let mut row = ledger_row(2024, 6, 5, 99.0);
        row.fuel_amount = 10.0;
        row.fuel_price_per_unit = 3.0;
        let june = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(monthly_total(&[row], june), 99.0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount(" 3.50 "), Some(3.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.333333), 3.33);
        assert_eq!(round2(11.666666), 11.67);
        assert_eq!(round2(14.0), 14.0);
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(format_money(40.0), "$40.00");
        assert_eq!(format_money(3.5), "$3.50");
    }

    // Rate limiting tests
    #[test]
    fn test_rate_limit_allows_within_limit() {
        use crate::rate_limit::check_rate_limit;
        use std::time::Duration;

        let key = "test_key_1";
        assert!(check_rate_limit(key, 5, Duration::from_secs(1)));
        assert!(check_rate_limit(key, 5, Duration::from_secs(1)));
    }

    #[test]
    fn test_rate_limit_blocks_over_limit() {
        use crate::rate_limit::check_rate_limit;
        use std::time::Duration;

        let key = "test_key_2";
        for _ in 0..5 {
            assert!(check_rate_limit(key, 5, Duration::from_secs(10)));
        }
        // the 6th request must be blocked
        assert!(!check_rate_limit(key, 5, Duration::from_secs(10)));
    }

    #[test]
    fn test_rate_limit_resets_after_window() {
        use crate::rate_limit::check_rate_limit;
        use std::thread;
        use std::time::Duration;

        let key = "test_key_3";
        for _ in 0..5 {
            check_rate_limit(key, 5, Duration::from_millis(100));
        }

        thread::sleep(Duration::from_millis(150));

        assert!(check_rate_limit(key, 5, Duration::from_millis(100)));
    }
}

#[cfg(all(test, feature = "server"))]
mod integration_tests {
    use crate::db;
    use crate::models::*;
    use crate::schema::{car_model, customer, fuel_expense, user_car};
    use crate::utils;
    use chrono::NaiveDate;
    use diesel::prelude::*;
    use serial_test::serial;

    fn prepare_database() {
        dotenvy::dotenv().ok();
        if std::env::var("DATABASE_URL").is_err() {
            std::env::set_var("DATABASE_URL", "/tmp/fueltrack_test.db");
        }
        db::run_migrations();
    }

    fn insert_customer(
        conn: &mut SqliteConnection,
        login_val: &str,
    ) -> Result<i32, diesel::result::Error> {
        diesel::insert_into(customer::table)
            .values(&NewCustomer {
                login: login_val,
                password: "hashed_password_123",
                salt: "bcrypt",
            })
            .execute(conn)?;
        customer::table
            .filter(customer::login.eq(login_val))
            .select(customer::id)
            .first(conn)
    }

    fn insert_car(
        conn: &mut SqliteConnection,
        owner: i32,
        model_id: i32,
        name: Option<&str>,
    ) -> Result<i32, diesel::result::Error> {
        diesel::insert_into(user_car::table)
            .values(&NewUserCar {
                customer_id: owner,
                car_model_id: model_id,
                custom_name: name,
            })
            .execute(conn)?;
        user_car::table
            .filter(user_car::customer_id.eq(owner))
            .order(user_car::id.desc())
            .select(user_car::id)
            .first(conn)
    }

    fn seeded_model_id(conn: &mut SqliteConnection) -> Result<i32, diesel::result::Error> {
        car_model::table
            .order(car_model::make.asc())
            .select(car_model::id)
            .first(conn)
    }

    #[test]
    #[serial]
    fn test_catalog_is_seeded_and_sorted_by_make() {
        prepare_database();
        let mut conn = db::connection();

        let makes: Vec<String> = car_model::table
            .order(car_model::make.asc())
            .select(car_model::make)
            .load(&mut conn)
            .expect("catalog query failed");

        assert!(!makes.is_empty(), "migration must seed the catalog");
        assert!(makes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    #[serial]
    fn test_register_car_with_rollback() {
        prepare_database();
        let mut conn = db::connection();

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let owner = insert_customer(conn, "test_garage_user")?;
            let model_id = seeded_model_id(conn)?;
            insert_car(conn, owner, model_id, Some("Daily driver"))?;

            let rows: Vec<(UserCar, CarModel)> = user_car::table
                .inner_join(car_model::table)
                .filter(user_car::customer_id.eq(owner))
                .load(conn)?;

            assert_eq!(rows.len(), 1);
            let (car, model) = &rows[0];
            assert_eq!(car.custom_name.as_deref(), Some("Daily driver"));
            assert_eq!(model.id, model_id);

            Ok(())
        });

        // The transaction rolled back, nothing may remain
        let ghost: i64 = customer::table
            .filter(customer::login.eq("test_garage_user"))
            .count()
            .get_result(&mut conn)
            .expect("count failed");
        assert_eq!(ghost, 0, "database must be clean after rollback");
    }

    #[test]
    #[serial]
    fn test_expense_stores_exact_total() {
        prepare_database();
        let mut conn = db::connection();

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let owner = insert_customer(conn, "test_ledger_user")?;
            let model_id = seeded_model_id(conn)?;
            let car_id = insert_car(conn, owner, model_id, None)?;

            let fuel_amount_val = 10.5;
            let price_val = 3.25;
            diesel::insert_into(fuel_expense::table)
                .values(&NewFuelExpense {
                    customer_id: owner,
                    user_car_id: car_id,
                    distance: 120.0,
                    fuel_amount: fuel_amount_val,
                    fuel_price_per_unit: price_val,
                    total_cost: utils::expense_total_cost(fuel_amount_val, price_val),
                    notes: Some("road trip"),
                    expense_date: NaiveDate::from_ymd_opt(2024, 6, 5)
                        .unwrap()
                        .and_hms_opt(8, 30, 0)
                        .unwrap(),
                })
                .execute(conn)?;

            let stored: FuelExpense = fuel_expense::table
                .filter(fuel_expense::customer_id.eq(owner))
                .select(FuelExpense::as_select())
                .first(conn)?;

            assert_eq!(stored.total_cost, fuel_amount_val * price_val);
            assert_eq!(
                stored.total_cost,
                stored.fuel_amount * stored.fuel_price_per_unit
            );
            assert_eq!(stored.notes.as_deref(), Some("road trip"));

            Ok(())
        });
    }

    #[test]
    #[serial]
    fn test_expense_queries_are_owner_scoped() {
        prepare_database();
        let mut conn = db::connection();

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let alice = insert_customer(conn, "test_owner_alice")?;
            let bob = insert_customer(conn, "test_owner_bob")?;
            let model_id = seeded_model_id(conn)?;
            let alice_car = insert_car(conn, alice, model_id, None)?;
            let bob_car = insert_car(conn, bob, model_id, None)?;

            for (owner, car_id, note) in [(alice, alice_car, "alice"), (bob, bob_car, "bob")] {
                diesel::insert_into(fuel_expense::table)
                    .values(&NewFuelExpense {
                        customer_id: owner,
                        user_car_id: car_id,
                        distance: 50.0,
                        fuel_amount: 5.0,
                        fuel_price_per_unit: 4.0,
                        total_cost: utils::expense_total_cost(5.0, 4.0),
                        notes: Some(note),
                        expense_date: NaiveDate::from_ymd_opt(2024, 6, 5)
                            .unwrap()
                            .and_hms_opt(9, 0, 0)
                            .unwrap(),
                    })
                    .execute(conn)?;
            }

            let rows: Vec<(FuelExpense, (UserCar, CarModel))> = fuel_expense::table
                .inner_join(user_car::table.inner_join(car_model::table))
                .filter(fuel_expense::customer_id.eq(alice))
                .load(conn)?;

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].0.notes.as_deref(), Some("alice"));

            Ok(())
        });
    }

    #[test]
    #[serial]
    fn test_expenses_listed_newest_first() {
        prepare_database();
        let mut conn = db::connection();

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let owner = insert_customer(conn, "test_order_user")?;
            let model_id = seeded_model_id(conn)?;
            let car_id = insert_car(conn, owner, model_id, None)?;

            for (day, note) in [(5, "older"), (20, "newer")] {
                diesel::insert_into(fuel_expense::table)
                    .values(&NewFuelExpense {
                        customer_id: owner,
                        user_car_id: car_id,
                        distance: 50.0,
                        fuel_amount: 5.0,
                        fuel_price_per_unit: 4.0,
                        total_cost: utils::expense_total_cost(5.0, 4.0),
                        notes: Some(note),
                        expense_date: NaiveDate::from_ymd_opt(2024, 6, day)
                            .unwrap()
                            .and_hms_opt(9, 0, 0)
                            .unwrap(),
                    })
                    .execute(conn)?;
            }

            let notes: Vec<Option<String>> = fuel_expense::table
                .filter(fuel_expense::customer_id.eq(owner))
                .order(fuel_expense::expense_date.desc())
                .select(fuel_expense::notes)
                .load(conn)?;

            assert_eq!(notes, vec![Some("newer".into()), Some("older".into())]);

            Ok(())
        });
    }

    #[test]
    #[serial]
    fn test_hostile_custom_name_is_stored_inertly() {
        prepare_database();
        let mut conn = db::connection();

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let owner = insert_customer(conn, "test_injection_user")?;
            let model_id = seeded_model_id(conn)?;
            // Diesel binds parameters, so this is stored as plain text
            let hostile = "x'); DROP TABLE user_car; --";
            let car_id = insert_car(conn, owner, model_id, Some(hostile))?;

            let name: Option<String> = user_car::table
                .find(car_id)
                .select(user_car::custom_name)
                .first(conn)?;
            assert_eq!(name.as_deref(), Some(hostile));

            let count: i64 = user_car::table.count().get_result(conn)?;
            assert!(count > 0, "table must still exist after the attempt");

            Ok(())
        });
    }
}
