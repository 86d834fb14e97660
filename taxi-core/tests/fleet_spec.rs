use speculate2::speculate;

speculate! {
    use std::collections::HashMap;
    use taxi_core::models::*;
    use taxi_core::{resolve_filter, Database, FilterPredicate, PageRequest};

    fn setup_db() -> Database {
        let db = Database::open_memory().expect("Failed to create test database");
        db.migrate().expect("Failed to migrate test database");
        db
    }

    fn create_manufacturer(db: &Database, name: &str, country: &str) -> Manufacturer {
        db.create_manufacturer(ManufacturerInput::new(name, country))
            .expect("Failed to create manufacturer")
    }

    fn create_driver(db: &Database, username: &str, license_number: &str) -> Driver {
        db.create_driver(
            CreateDriverInput::new(username, "StrongPass123!", license_number).with_name("Test", "User"),
        )
        .expect("Failed to create driver")
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    describe "string representations" {
        it "renders a manufacturer as name and country" {
            let manufacturer = Manufacturer { id: 1, name: "Toyota".into(), country: "Japan".into() };
            assert_eq!(manufacturer.to_string(), "Toyota Japan");
        }

        it "renders a driver as username and full name" {
            let db = setup_db();
            let driver = create_driver(&db, "testuser", "ABC12345");
            assert_eq!(driver.to_string(), "testuser (Test User)");
        }

        it "renders a car as its model" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let car = db.create_car(CarInput::new("Corolla", toyota.id)).unwrap();
            assert_eq!(car.to_string(), "Corolla");
        }
    }

    describe "resource paths" {
        it "derives detail paths from kind and id" {
            let db = setup_db();
            let driver = create_driver(&db, "testuser", "ABC12345");
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let car = db.create_car(CarInput::new("Corolla", toyota.id)).unwrap();

            assert_eq!(driver.resource_path(), format!("/drivers/{}/", driver.id));
            assert_eq!(car.resource_path(), format!("/cars/{}/", car.id));
            assert_eq!(toyota.resource_path(), format!("/manufacturers/{}/", toyota.id));
            assert_eq!(Driver::list_path(), "/drivers/");
        }
    }

    describe "drivers" {
        it "stores a hashed password that authenticates" {
            let db = setup_db();
            let driver = create_driver(&db, "testuser", "ABC12345");
            assert_eq!(driver.license_number, "ABC12345");

            let stored: String = db
                .with_connection(|conn| {
                    Ok(conn.query_row("SELECT password_hash FROM driver WHERE id = ?1", [driver.id], |row| row.get(0))?)
                })
                .unwrap();
            assert_ne!(stored, "StrongPass123!");

            let authenticated = db.authenticate("testuser", "StrongPass123!").unwrap();
            assert_eq!(authenticated.map(|d| d.id), Some(driver.id));
            assert!(db.authenticate("testuser", "wrong-password").unwrap().is_none());
            assert!(db.authenticate("nobody", "StrongPass123!").unwrap().is_none());
        }

        it "rejects a duplicate license number at the storage layer" {
            let db = setup_db();
            create_driver(&db, "testuser1", "ABC12345");

            let err = db
                .create_driver(CreateDriverInput::new("testuser2", "StrongPass123!", "ABC12345"))
                .unwrap_err();
            assert!(err.is_constraint_violation());
            assert!(err.validation_errors().is_none());
            assert_eq!(db.count_drivers().unwrap(), 1);
        }

        it "rejects a duplicate username at the storage layer" {
            let db = setup_db();
            create_driver(&db, "testuser", "ABC12345");
            let err = db
                .create_driver(CreateDriverInput::new("testuser", "StrongPass123!", "XYZ54321"))
                .unwrap_err();
            assert!(err.is_constraint_violation());
        }

        it "reports a malformed license number per field before persisting" {
            let db = setup_db();
            let err = db
                .create_driver(CreateDriverInput::new("testuser", "StrongPass123!", "INVALID"))
                .unwrap_err();
            let errors = err.validation_errors().expect("expected validation errors");
            assert!(errors.contains("license_number"));
            assert_eq!(db.count_drivers().unwrap(), 0);
        }

        it "collects every failing field" {
            let db = setup_db();
            let mut input = CreateDriverInput::new("", "StrongPass123!", "abc12345");
            input.password2 = "Different123!".into();

            let err = db.create_driver(input).unwrap_err();
            let errors = err.validation_errors().unwrap();
            let fields: Vec<&str> = errors.fields().collect();
            assert_eq!(fields, ["license_number", "password2", "username"]);
        }

        it "updates the license number with the same validation" {
            let db = setup_db();
            let driver = create_driver(&db, "testuser", "ABC12345");

            let updated = db.update_driver_license(driver.id, UpdateLicenseInput::new("XYZ54321")).unwrap();
            assert_eq!(updated.license_number, "XYZ54321");

            let err = db.update_driver_license(driver.id, UpdateLicenseInput::new("XYZ5432")).unwrap_err();
            assert!(err.validation_errors().unwrap().contains("license_number"));
            assert_eq!(db.get_driver(driver.id).unwrap().unwrap().license_number, "XYZ54321");
        }

        it "rejects a license update that collides with another driver" {
            let db = setup_db();
            create_driver(&db, "first", "ABC12345");
            let second = create_driver(&db, "second", "XYZ54321");

            let err = db.update_driver_license(second.id, UpdateLicenseInput::new("ABC12345")).unwrap_err();
            assert!(err.is_constraint_violation());
        }

        it "reports unknown drivers as not found" {
            let db = setup_db();
            assert!(db.get_driver(42).unwrap().is_none());
            assert!(db.update_driver_license(42, UpdateLicenseInput::new("ABC12345")).unwrap_err().is_not_found());
            assert!(db.delete_driver(42).unwrap_err().is_not_found());
        }
    }

    describe "cars" {
        it "requires an existing manufacturer" {
            let db = setup_db();
            let err = db.create_car(CarInput::new("Corolla", 99)).unwrap_err();
            assert!(err.validation_errors().unwrap().contains("manufacturer"));

            let err = db.create_car(CarInput { model: "Corolla".into(), ..Default::default() }).unwrap_err();
            assert!(err.validation_errors().unwrap().contains("manufacturer"));
            assert_eq!(db.count_cars().unwrap(), 0);
        }

        it "rejects unknown driver ids" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let err = db.create_car(CarInput::new("Corolla", toyota.id).with_drivers([7])).unwrap_err();
            assert!(err.validation_errors().unwrap().contains("drivers"));
            assert_eq!(db.count_cars().unwrap(), 0);
        }

        it "replaces assigned drivers on update" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let alice = create_driver(&db, "alice", "ABC12345");
            let bob = create_driver(&db, "bob", "XYZ54321");

            let car = db
                .create_car(CarInput::new("Corolla", toyota.id).with_drivers([bob.id, alice.id, bob.id]))
                .unwrap();
            let detail = db.get_car_detail(car.id).unwrap().unwrap();
            let names: Vec<&str> = detail.drivers.iter().map(|d| d.username.as_str()).collect();
            assert_eq!(names, ["alice", "bob"]);
            assert_eq!(detail.manufacturer, toyota);

            db.update_car(car.id, CarInput::new("Camry", toyota.id).with_drivers([bob.id])).unwrap();
            let detail = db.get_car_detail(car.id).unwrap().unwrap();
            assert_eq!(detail.car.model, "Camry");
            assert!(detail.is_assigned_to(bob.id));
            assert!(!detail.is_assigned_to(alice.id));
        }

        it "lists the driver's cars with their manufacturers" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let honda = create_manufacturer(&db, "Honda", "Japan");
            let driver = create_driver(&db, "testuser", "ABC12345");
            db.create_car(CarInput::new("Corolla", toyota.id).with_drivers([driver.id])).unwrap();
            db.create_car(CarInput::new("Accord", honda.id).with_drivers([driver.id])).unwrap();
            db.create_car(CarInput::new("Civic", honda.id)).unwrap();

            let detail = db.get_driver_detail(driver.id).unwrap().unwrap();
            let cars: Vec<String> = detail
                .cars
                .iter()
                .map(|c| format!("{} by {}", c.car, c.manufacturer.name))
                .collect();
            assert_eq!(cars, ["Accord by Honda", "Corolla by Toyota"]);
        }

        it "is deleted with its manufacturer" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let driver = create_driver(&db, "testuser", "ABC12345");
            let car = db.create_car(CarInput::new("Corolla", toyota.id).with_drivers([driver.id])).unwrap();

            db.delete_manufacturer(toyota.id).unwrap();
            assert!(db.get_car(car.id).unwrap().is_none());
            assert!(db.get_driver_detail(driver.id).unwrap().unwrap().cars.is_empty());
        }
    }

    describe "manufacturers" {
        it "validates required fields" {
            let db = setup_db();
            let err = db.create_manufacturer(ManufacturerInput::new("  ", "")).unwrap_err();
            let errors = err.validation_errors().unwrap();
            assert!(errors.contains("name"));
            assert!(errors.contains("country"));
        }

        it "lists every manufacturer by name for car forms" {
            let db = setup_db();
            create_manufacturer(&db, "Toyota", "Japan");
            create_manufacturer(&db, "Honda", "Japan");
            let names: Vec<String> = db.all_manufacturers().unwrap().into_iter().map(|m| m.name).collect();
            assert_eq!(names, ["Honda", "Toyota"]);
        }

        it "allows duplicate names" {
            let db = setup_db();
            create_manufacturer(&db, "Toyota", "Japan");
            create_manufacturer(&db, "Toyota", "USA");
            assert_eq!(db.count_manufacturers().unwrap(), 2);
        }

        it "updates in place" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let updated = db.update_manufacturer(toyota.id, ManufacturerInput::new("Toyota", "Nippon")).unwrap();
            assert_eq!(updated.to_string(), "Toyota Nippon");
            assert_eq!(db.get_manufacturer(toyota.id).unwrap(), Some(updated));
            assert!(db.update_manufacturer(999, ManufacturerInput::new("A", "B")).unwrap_err().is_not_found());
        }
    }

    describe "search filters" {
        it "matches exactly the manufacturers containing the query" {
            let db = setup_db();
            create_manufacturer(&db, "Toyota", "Japan");
            create_manufacturer(&db, "Honda", "Japan");

            let (filter, echo) = resolve_filter(&query(&[("name", "Toy")]), "name");
            assert_eq!(echo, "Toy");
            let page = db.list_manufacturers(&filter, PageRequest::first()).unwrap();
            let names: Vec<&str> = page.items.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, ["Toyota"]);
        }

        it "ignores case" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            db.create_car(CarInput::new("Corolla", toyota.id)).unwrap();
            db.create_car(CarInput::new("Camry", toyota.id)).unwrap();

            let (filter, _) = resolve_filter(&query(&[("model", "coRO")]), "model");
            let page = db.list_cars(&filter, PageRequest::first()).unwrap();
            assert_eq!(page.total, 1);
            assert_eq!(page.items[0].car.model, "Corolla");
            assert_eq!(page.items[0].manufacturer.name, "Toyota");
        }

        it "returns everything without a query" {
            let db = setup_db();
            create_driver(&db, "alice", "ABC12345");
            create_driver(&db, "bob", "XYZ54321");

            let (filter, echo) = resolve_filter(&HashMap::new(), "username");
            assert!(filter.is_identity());
            assert_eq!(echo, "");
            assert_eq!(db.list_drivers(&filter, PageRequest::first()).unwrap().total, 2);
        }

        it "treats LIKE wildcards literally" {
            let db = setup_db();
            create_manufacturer(&db, "Toyota", "Japan");
            let (filter, _) = resolve_filter(&query(&[("name", "%")]), "name");
            assert_eq!(db.list_manufacturers(&filter, PageRequest::first()).unwrap().total, 0);
        }

        it "refuses a predicate built for another field" {
            let db = setup_db();
            let filter = FilterPredicate::contains("country", "Japan");
            assert!(db.list_manufacturers(&filter, PageRequest::first()).unwrap_err().validation_errors().is_some());
        }
    }

    describe "pagination" {
        it "splits lists into pages of five" {
            let db = setup_db();
            for i in 0..11 {
                create_manufacturer(&db, &format!("Manufacturer {:02}", i), "Country");
            }

            let first = db.list_manufacturers(&FilterPredicate::All, PageRequest::first()).unwrap();
            assert_eq!(first.items.len(), 5);
            assert_eq!(first.num_pages, 3);
            assert!(first.has_next);
            assert_eq!(first.items[0].name, "Manufacturer 00");

            let last = db.list_manufacturers(&FilterPredicate::All, PageRequest::Last).unwrap();
            assert_eq!(last.items.len(), 1);
            assert_eq!(last.items[0].name, "Manufacturer 10");

            let err = db.list_manufacturers(&FilterPredicate::All, PageRequest::Number(4)).unwrap_err();
            assert!(err.is_not_found());
        }

        it "honours a custom page size" {
            let db = setup_db().with_page_size(2);
            for name in ["a", "b", "c"] {
                create_driver(&db, name, &format!("{}BC12345", name.to_uppercase()));
            }
            let page = db.list_drivers(&FilterPredicate::All, PageRequest::Number(2)).unwrap();
            assert_eq!(page.items.len(), 1);
            assert_eq!(page.items[0].username, "c");
        }
    }

    describe "assignment toggle" {
        it "assigns then unassigns" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let car = db.create_car(CarInput::new("Corolla", toyota.id)).unwrap();
            let driver = create_driver(&db, "testuser", "ABC12345");

            assert_eq!(db.assignment_state(driver.id, car.id).unwrap(), AssignmentState::Unassigned);
            assert_eq!(db.toggle_assignment(driver.id, car.id).unwrap(), AssignmentState::Assigned);
            assert!(db.get_car_detail(car.id).unwrap().unwrap().is_assigned_to(driver.id));

            assert_eq!(db.toggle_assignment(driver.id, car.id).unwrap(), AssignmentState::Unassigned);
            assert_eq!(db.assignment_state(driver.id, car.id).unwrap(), AssignmentState::Unassigned);
            assert!(db.get_car_detail(car.id).unwrap().unwrap().drivers.is_empty());
        }

        it "only touches the acting driver's pair" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let alice = create_driver(&db, "alice", "ABC12345");
            let bob = create_driver(&db, "bob", "XYZ54321");
            let car = db.create_car(CarInput::new("Corolla", toyota.id).with_drivers([bob.id])).unwrap();

            assert!(db.toggle_assignment(alice.id, car.id).unwrap().is_assigned());
            let detail = db.get_car_detail(car.id).unwrap().unwrap();
            assert!(detail.is_assigned_to(alice.id));
            assert!(detail.is_assigned_to(bob.id));
        }

        it "fails for a missing car" {
            let db = setup_db();
            let driver = create_driver(&db, "testuser", "ABC12345");
            let err = db.toggle_assignment(driver.id, 404).unwrap_err();
            assert!(matches!(err, taxi_core::Error::NotFound { kind: taxi_core::EntityKind::Car, .. }));
        }

        it "fails for a missing driver" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            let car = db.create_car(CarInput::new("Corolla", toyota.id)).unwrap();
            let err = db.toggle_assignment(404, car.id).unwrap_err();
            assert!(matches!(err, taxi_core::Error::NotFound { kind: taxi_core::EntityKind::Driver, .. }));
        }
    }

    describe "sessions" {
        it "counts visits per session" {
            let db = setup_db();
            let driver = create_driver(&db, "testuser", "ABC12345");
            let first = db.create_session(driver.id).unwrap();
            let second = db.create_session(driver.id).unwrap();
            assert_eq!(first.num_visits, 0);

            assert_eq!(db.record_visit(first.token).unwrap(), 1);
            assert_eq!(db.record_visit(first.token).unwrap(), 2);
            assert_eq!(db.record_visit(second.token).unwrap(), 1);
            assert_eq!(db.get_session(first.token).unwrap().unwrap().num_visits, 2);
        }

        it "ends on logout and with the driver" {
            let db = setup_db();
            let driver = create_driver(&db, "testuser", "ABC12345");
            let session = db.create_session(driver.id).unwrap();
            assert!(db.delete_session(session.token).unwrap());
            assert!(!db.delete_session(session.token).unwrap());
            assert!(db.record_visit(session.token).unwrap_err().is_not_found());

            let session = db.create_session(driver.id).unwrap();
            db.delete_driver(driver.id).unwrap();
            assert!(db.get_session(session.token).unwrap().is_none());
        }
    }

    describe "fleet summary" {
        it "counts each kind of entity" {
            let db = setup_db();
            let toyota = create_manufacturer(&db, "Toyota", "Japan");
            db.create_car(CarInput::new("Corolla", toyota.id)).unwrap();
            create_driver(&db, "testuser", "ABC12345");

            let summary = db.fleet_summary().unwrap();
            assert_eq!(summary, FleetSummary { num_drivers: 1, num_cars: 1, num_manufacturers: 1 });
        }
    }

    describe "file-backed database" {
        it "persists across reopen" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("taxi.db");
            {
                let db = Database::open(&path).unwrap();
                db.migrate().unwrap();
                create_manufacturer(&db, "Toyota", "Japan");
            }

            let db = Database::open(&path).unwrap();
            db.migrate().unwrap();
            assert_eq!(db.count_manufacturers().unwrap(), 1);
        }
    }
}
